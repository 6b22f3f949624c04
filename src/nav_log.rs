use crate::pathfinding::RouteKind;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Navigation events worth replaying after a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavEvent {
    /// Autopilot accepted a route
    RouteActivated { kind: RouteKind, waypoints: usize },
    /// Route was empty or too short to follow
    Rejected { kind: RouteKind },
    /// Autopilot reached the final waypoint
    Arrived { kind: RouteKind },
    /// Manual input took over mid-route
    Cancelled { kind: RouteKind },
    /// Session ended externally (level over)
    Stopped { kind: RouteKind },
    /// Agent passed a level progress marker
    MarkerReached { label: String },
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub event: NavEvent,
}

/// Navigation event logger
#[derive(Debug)]
pub struct NavLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl Default for NavLog {
    fn default() -> Self {
        Self::new()
    }
}

impl NavLog {
    pub fn new() -> Self {
        NavLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Log an event with the current timestamp
    pub fn log(&mut self, event: NavEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent { timestamp_ms, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to a JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Summary counts per event type
    pub fn summary(&self) -> String {
        let mut activated = 0;
        let mut rejected = 0;
        let mut arrived = 0;
        let mut cancelled = 0;
        let mut stopped = 0;
        let mut markers = 0;

        for logged in &self.events {
            match logged.event {
                NavEvent::RouteActivated { .. } => activated += 1,
                NavEvent::Rejected { .. } => rejected += 1,
                NavEvent::Arrived { .. } => arrived += 1,
                NavEvent::Cancelled { .. } => cancelled += 1,
                NavEvent::Stopped { .. } => stopped += 1,
                NavEvent::MarkerReached { .. } => markers += 1,
            }
        }

        let duration = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0);

        format!(
            "Session Duration: {}ms\n\
             Routes: {} activated, {} rejected\n\
             Outcomes: {} arrived, {} cancelled, {} stopped\n\
             Markers reached: {}",
            duration, activated, rejected, arrived, cancelled, stopped, markers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut log = NavLog::new();
        log.log(NavEvent::RouteActivated { kind: RouteKind::Shortest, waypoints: 5 });
        log.log(NavEvent::Cancelled { kind: RouteKind::Shortest });
        log.log(NavEvent::Rejected { kind: RouteKind::Retrace });
        log.log(NavEvent::MarkerReached { label: "1/4".to_string() });

        assert_eq!(log.events().len(), 4);
        let summary = log.summary();
        assert!(summary.contains("1 activated, 1 rejected"));
        assert!(summary.contains("0 arrived, 1 cancelled, 0 stopped"));
        assert!(summary.contains("Markers reached: 1"));
    }

    #[test]
    fn test_events_serialize() {
        let mut log = NavLog::new();
        log.log(NavEvent::Arrived { kind: RouteKind::Longest });
        let json = serde_json::to_string(log.events()).unwrap();
        assert!(json.contains("\"Arrived\""));
        assert!(json.contains("\"Longest\""));

        let back: Vec<LoggedEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].event, NavEvent::Arrived { kind: RouteKind::Longest });
    }
}
