use crate::pathfinding::RouteKind;

/// Errors loading or validating `navigation.toml`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors loading a maze layout fixture
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse layout: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid world size {width}x{height}")]
    InvalidWorld { width: i32, height: i32 },
}

/// Navigation requests the caller should answer with a failure cue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("No {kind} route available")]
    NoRoute { kind: RouteKind },

    #[error("Still following {kind} route after {frames} frames")]
    FrameLimit { kind: RouteKind, frames: usize },
}
