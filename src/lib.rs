pub mod autopilot;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod nav_log;
pub mod navigator;
pub mod pathfinding;
pub mod recorder;

pub use autopilot::{Autopilot, AutopilotState};
pub use config::NavConfig;
pub use error::{ConfigError, LayoutError, NavError};
pub use geometry::{Obstacle, Point};
pub use grid::{Cell, GridIndex};
pub use layout::MazeLayout;
pub use navigator::{MarkerState, Navigator};
pub use pathfinding::{longest_route_approx, shortest_route, Route, RouteKind};
pub use recorder::TrajectoryRecorder;
