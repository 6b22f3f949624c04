use crate::autopilot::Autopilot;
use crate::config::NavConfig;
use crate::error::NavError;
use crate::geometry::Point;
use crate::grid::GridIndex;
use crate::layout::MazeLayout;
use crate::nav_log::{NavEvent, NavLog};
use crate::pathfinding::{longest_route_approx, shortest_route, ProgressMarker, Route, RouteKind};
use crate::recorder::TrajectoryRecorder;
use log::{debug, info, warn};

/// A level progress marker and whether the agent has passed it
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerState {
    pub marker: ProgressMarker,
    pub reached: bool,
}

/// Frame-driven navigation for one agent in one maze level.
///
/// Owns the grid index, the trajectory history and the autopilot session.
/// Call `tick` before moving the agent and `observe` after.
pub struct Navigator {
    config: NavConfig,
    grid: GridIndex,
    goal: Point,
    recorder: TrajectoryRecorder,
    autopilot: Autopilot,
    markers: Vec<MarkerState>,
    log: NavLog,
}

impl Navigator {
    pub fn new(config: NavConfig, layout: &MazeLayout, goal: Point) -> Self {
        let grid = GridIndex::build(
            &layout.obstacles,
            layout.world_width,
            layout.world_height,
            config.grid.cell_size,
        );
        let recorder = TrajectoryRecorder::new(config.recorder.sample_spacing, config.recorder.max_points);

        Navigator {
            config,
            grid,
            goal,
            recorder,
            autopilot: Autopilot::new(),
            markers: Vec::new(),
            log: NavLog::new(),
        }
    }

    /// Replace the grid index after the obstacle layout changed
    pub fn rebuild(&mut self, layout: &MazeLayout) {
        self.grid = GridIndex::build(
            &layout.obstacles,
            layout.world_width,
            layout.world_height,
            self.config.grid.cell_size,
        );
    }

    pub fn set_goal(&mut self, goal: Point) {
        self.goal = goal;
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridIndex {
        &self.grid
    }

    pub fn recorder(&self) -> &TrajectoryRecorder {
        &self.recorder
    }

    pub fn autopilot(&self) -> &Autopilot {
        &self.autopilot
    }

    pub fn log(&self) -> &NavLog {
        &self.log
    }

    pub fn markers(&self) -> &[MarkerState] {
        &self.markers
    }

    /// Place progress markers along the shortest route from `start` to the goal.
    ///
    /// Replaces any earlier markers. Returns how many were placed; a short or
    /// missing route places none.
    pub fn place_markers(&mut self, start: Point) -> usize {
        self.markers = shortest_route(&self.grid, start, self.goal)
            .progress_markers()
            .into_iter()
            .map(|marker| MarkerState { marker, reached: false })
            .collect();
        debug!("Placed {} progress markers", self.markers.len());
        self.markers.len()
    }

    /// Compute a route of the given kind from the agent's position without activating it
    pub fn plan(&self, kind: RouteKind, agent_center: Point) -> Route {
        match kind {
            RouteKind::Shortest => shortest_route(&self.grid, agent_center, self.goal),
            RouteKind::Longest => longest_route_approx(&self.grid, agent_center),
            RouteKind::Retrace => self.recorder.backtrack(agent_center, true),
        }
    }

    /// Plan a route and hand it to the autopilot.
    ///
    /// Returns the number of waypoints on success. `NavError::NoRoute` means
    /// nothing was activated and any running session continues.
    pub fn request_route(&mut self, kind: RouteKind, agent_center: Point) -> Result<usize, NavError> {
        let route = self.plan(kind, agent_center);
        let waypoints = route.len();

        if !self.autopilot.activate(route) {
            warn!("No usable {} route from ({}, {})", kind, agent_center.x, agent_center.y);
            self.log.log(NavEvent::Rejected { kind });
            return Err(NavError::NoRoute { kind });
        }

        info!("Following {} route with {} waypoints", kind, waypoints);
        self.log.log(NavEvent::RouteActivated { kind, waypoints });
        Ok(waypoints)
    }

    /// Steering direction for this frame, if the autopilot is driving
    pub fn tick(&mut self, agent_center: Point, manual_input: bool) -> Option<Point> {
        let active = self.autopilot.kind();
        let steer = self
            .autopilot
            .tick(agent_center, self.config.arrival_threshold(), manual_input);

        if let (Some(kind), false) = (active, self.autopilot.is_following()) {
            if manual_input {
                info!("Manual input cancelled {} route", kind);
                self.log.log(NavEvent::Cancelled { kind });
            } else {
                info!("Arrived at end of {} route", kind);
                self.log.log(NavEvent::Arrived { kind });
            }
        }

        steer
    }

    /// Feed the agent's post-movement position into the trajectory history.
    ///
    /// Returns the labels of progress markers reached for the first time.
    pub fn observe(&mut self, agent_center: Point) -> Vec<String> {
        self.recorder.record(agent_center);

        let radius = self.config.progress.marker_radius;
        let mut reached = Vec::new();
        for state in self.markers.iter_mut().filter(|s| !s.reached) {
            if state.marker.position.distance(&agent_center) < radius {
                state.reached = true;
                info!("Reached progress marker {}", state.marker.label);
                self.log.log(NavEvent::MarkerReached {
                    label: state.marker.label.clone(),
                });
                reached.push(state.marker.label.clone());
            }
        }
        reached
    }

    /// Move a point agent at `autopilot.agent_speed` per frame until the
    /// autopilot lets go, and return the frames simulated.
    ///
    /// A session still running after `max_frames` is stopped and reported as
    /// `NavError::FrameLimit`.
    pub fn drive(&mut self, position: &mut Point, max_frames: usize) -> Result<usize, NavError> {
        let speed = self.config.autopilot.agent_speed;
        for frame in 0..max_frames {
            match self.tick(*position, false) {
                Some(steer) => {
                    position.x += steer.x * speed;
                    position.y += steer.y * speed;
                    self.observe(*position);
                }
                None => return Ok(frame),
            }
        }

        match self.autopilot.kind() {
            Some(kind) => {
                warn!(
                    "Gave up on {} route after {} frames at ({:.1}, {:.1})",
                    kind, max_frames, position.x, position.y
                );
                self.stop();
                Err(NavError::FrameLimit { kind, frames: max_frames })
            }
            None => Ok(max_frames),
        }
    }

    /// Start a fresh history at `agent_center` (level start or restart)
    pub fn reset_trajectory(&mut self, agent_center: Point) {
        self.recorder.reset();
        self.recorder.record(agent_center);
    }

    /// End any session without manual input (level completed or failed)
    pub fn stop(&mut self) {
        if let Some(kind) = self.autopilot.kind() {
            self.autopilot.cancel();
            self.log.log(NavEvent::Stopped { kind });
        }
    }
}
