use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Reveal obstacles around the origin before the first objective is planned
    #[serde(default = "default_initial_sweep")]
    pub initial_sweep: bool,
    /// Replans allowed per objective before it is given up as unreachable.
    /// Unset means one more than the number of grid cells.
    #[serde(default)]
    pub max_replans: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    /// Seconds between replayed events
    #[serde(default = "default_step_interval")]
    pub step_interval: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_initial_sweep() -> bool { true }
fn default_window_title() -> String { "fogwalk - navigation replay".to_string() }
fn default_cell_size() -> f32 { 32.0 }
fn default_step_interval() -> f32 { 0.25 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_event_log_path() -> String { "event_log.json".to_string() }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_sweep: default_initial_sweep(),
            max_replans: None,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_size: default_cell_size(),
            step_interval: default_step_interval(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_event_log: false,
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            viewer: ViewerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from config.toml, or use defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// is missing or malformed
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }
}
