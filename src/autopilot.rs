use crate::geometry::Point;
use crate::pathfinding::{Route, RouteKind};
use log::{debug, trace};

/// Autopilot state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutopilotState {
    Idle,
    Following,
}

/// The route being followed and the index of the waypoint currently steered toward
#[derive(Clone, Debug)]
pub struct Session {
    pub route: Route,
    pub cursor: usize,
}

/// Per-tick route follower.
///
/// Holds at most one session. Emits a unit steering vector each tick until
/// the last waypoint is reached or manual input cancels the session.
#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    session: Option<Session>,
}

impl Autopilot {
    pub fn new() -> Self {
        Autopilot { session: None }
    }

    pub fn state(&self) -> AutopilotState {
        match self.session {
            Some(_) => AutopilotState::Following,
            None => AutopilotState::Idle,
        }
    }

    pub fn is_following(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Kind of the route being followed, if any
    pub fn kind(&self) -> Option<RouteKind> {
        self.session.as_ref().map(|s| s.route.kind())
    }

    /// Start following `route`, replacing any current session.
    ///
    /// Routes with fewer than 2 waypoints are rejected and leave the
    /// autopilot untouched. Returns whether the route was accepted.
    pub fn activate(&mut self, route: Route) -> bool {
        if route.len() < 2 {
            debug!(
                "[Autopilot] rejected {} route with {} waypoints",
                route.kind(),
                route.len()
            );
            return false;
        }

        debug!(
            "[Autopilot] following {} route with {} waypoints",
            route.kind(),
            route.len()
        );
        // Waypoint 0 is the route's own origin
        self.session = Some(Session { route, cursor: 1 });
        true
    }

    /// Drop the current session, if any
    pub fn cancel(&mut self) {
        self.session = None;
    }

    /// Advance one frame.
    ///
    /// Manual input cancels the session immediately. Otherwise every waypoint
    /// closer than `arrival_threshold` is passed in this same tick, and the
    /// direction toward the next remaining one is returned as a unit vector.
    /// Returns `None` when idle or when the final waypoint was just reached.
    pub fn tick(&mut self, agent_center: Point, arrival_threshold: f32, manual_input: bool) -> Option<Point> {
        if manual_input {
            if self.session.take().is_some() {
                debug!("[Autopilot] cancelled by manual input");
            }
            return None;
        }

        let session = self.session.as_mut()?;

        loop {
            let target = session.route.get(session.cursor)?;
            let dx = target.x - agent_center.x;
            let dy = target.y - agent_center.y;
            let distance = (dx * dx + dy * dy).sqrt();

            // A zero-length vector has no direction, so it counts as arrival
            if distance < arrival_threshold || distance == 0.0 {
                session.cursor += 1;
                trace!("[Autopilot] reached waypoint, cursor -> {}", session.cursor);
                if session.cursor >= session.route.len() {
                    debug!("[Autopilot] arrived at end of {} route", session.route.kind());
                    self.session = None;
                    return None;
                }
                continue;
            }

            return Some(Point::new(dx / distance, dy / distance));
        }
    }
}
