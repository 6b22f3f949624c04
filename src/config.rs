use crate::error::ConfigError;
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "navigation.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub autopilot: AutopilotConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cell_size")]
    pub cell_size: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecorderConfig {
    #[serde(default = "default_sample_spacing")]
    pub sample_spacing: f32,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutopilotConfig {
    /// Smallest arrival radius in world units
    #[serde(default = "default_arrival_min")]
    pub arrival_min: f32,
    /// Arrival radius as a fraction of the cell size, when larger than `arrival_min`
    #[serde(default = "default_arrival_cell_fraction")]
    pub arrival_cell_fraction: f32,
    /// World units per tick for the headless simulation
    #[serde(default = "default_agent_speed")]
    pub agent_speed: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// An agent closer than this to a progress marker has reached it
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_nav_log")]
    pub enable_nav_log: bool,
    #[serde(default = "default_nav_log_path")]
    pub nav_log_path: String,
}

// Default values
fn default_cell_size() -> i32 { 40 }
fn default_sample_spacing() -> f32 { 8.0 }
fn default_max_points() -> usize { 20_000 }
fn default_arrival_min() -> f32 { 8.0 }
fn default_arrival_cell_fraction() -> f32 { 0.2 }
fn default_agent_speed() -> f32 { 5.0 }
fn default_marker_radius() -> f32 { 24.0 }
fn default_enable_nav_log() -> bool { true }
fn default_nav_log_path() -> String { "nav_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_spacing: default_sample_spacing(),
            max_points: default_max_points(),
        }
    }
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            arrival_min: default_arrival_min(),
            arrival_cell_fraction: default_arrival_cell_fraction(),
            agent_speed: default_agent_speed(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            marker_radius: default_marker_radius(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_nav_log: default_enable_nav_log(),
            nav_log_path: default_nav_log_path(),
        }
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            recorder: RecorderConfig::default(),
            autopilot: AutopilotConfig::default(),
            progress: ProgressConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl NavConfig {
    /// Load `navigation.toml` from the working directory, or use defaults if
    /// it is missing or invalid
    pub fn load() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            info!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            return NavConfig::default();
        }

        match Self::from_path(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", DEFAULT_CONFIG_PATH);
                config
            }
            Err(e) => {
                warn!("{}; using default configuration", e);
                NavConfig::default()
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cell_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "grid.cell_size",
                reason: format!("must be positive, got {}", self.grid.cell_size),
            });
        }
        if !(self.recorder.sample_spacing >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "recorder.sample_spacing",
                reason: format!("must be non-negative, got {}", self.recorder.sample_spacing),
            });
        }
        if self.recorder.max_points == 0 {
            return Err(ConfigError::Invalid {
                field: "recorder.max_points",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.autopilot.arrival_min > 0.0) {
            return Err(ConfigError::Invalid {
                field: "autopilot.arrival_min",
                reason: format!("must be positive, got {}", self.autopilot.arrival_min),
            });
        }
        if !(self.progress.marker_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "progress.marker_radius",
                reason: format!("must be non-negative, got {}", self.progress.marker_radius),
            });
        }
        Ok(())
    }

    /// Arrival radius handed to the autopilot each tick
    pub fn arrival_threshold(&self) -> f32 {
        let scaled = self.grid.cell_size as f32 * self.autopilot.arrival_cell_fraction;
        self.autopilot.arrival_min.max(scaled)
    }
}
