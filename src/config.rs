//! Configuration management for the expression matrix application

use crate::{
    bitmap::Rotation,
    constants::{DEFAULT_BAUD_RATE, DEFAULT_MIN_SEND_INTERVAL_MS},
    thresholds::Thresholds,
    transport::Orientation,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier thresholds
    pub thresholds: Thresholds,

    /// Display mounting
    pub display: DisplayConfig,

    /// Display link settings
    pub transport: TransportConfig,
}

/// Display mounting configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Clockwise rotation in degrees (0, 90, 180 or 270)
    pub rotation: Rotation,

    /// Mirror each row after rotating
    pub mirror: bool,
}

/// Display link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Device to open at startup, if any
    pub port: Option<PathBuf>,

    /// Line speed
    pub baud_rate: u32,

    /// Frames arriving sooner than this after the last write are dropped
    pub min_send_interval_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            min_send_interval_ms: DEFAULT_MIN_SEND_INTERVAL_MS,
        }
    }
}

impl DisplayConfig {
    /// Orientation applied to outgoing frames
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        Orientation {
            rotation: self.rotation,
            mirror: self.mirror,
        }
    }
}

impl TransportConfig {
    /// Minimum interval between writes
    #[must_use]
    pub const fn min_send_interval(&self) -> Duration {
        Duration::from_millis(self.min_send_interval_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Validate configuration.
    ///
    /// Thresholds are deliberately not checked; any value is a legal boundary.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unusable transport setting
    pub fn validate(&self) -> Result<()> {
        if self.transport.baud_rate == 0 {
            return Err(Error::ConfigError("Baud rate must be greater than 0".to_string()));
        }
        if let Some(port) = &self.transport.port {
            if port.as_os_str().is_empty() {
                return Err(Error::ConfigError("Port path must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Expression Matrix Configuration

# Classifier thresholds
thresholds:
  eye_open: 0.095
  eye_wide_open: 0.53
  eye_tight: 0.15
  eye_wink_diff: 0.15
  gaze_h_left: 0.4
  gaze_h_right: 0.6
  gaze_v_up: 0.35
  gaze_v_down: 0.65
  mouth_open: 0.15
  mouth_smile: -0.02
  mouth_kiss_width_ratio: 0.25

# Display mounting
display:
  rotation: 0
  mirror: false

# Display link
transport:
  port: null
  # advisory, only logged; set the line speed with stty
  baud_rate: 115200
  min_send_interval_ms: 50
"#;
