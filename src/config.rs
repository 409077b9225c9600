//! # Configuration Module
//!
//! Handles loading and validating check configuration from TOML files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, UlgCheckError};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tilt: TiltConfig,

    #[serde(default)]
    pub yaw: YawConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Tilt bound check configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TiltConfig {
    /// Log parameter holding the maximum manual tilt in degrees
    #[serde(default = "default_tilt_param")]
    pub param_name: String,

    /// Maximum tilt in degrees when the parameter is not in the log
    #[serde(default = "default_max_deg")]
    pub default_max_deg: f64,

    /// Navigation states the bound applies to
    #[serde(default = "default_nav_states")]
    pub nav_states: Vec<u8>,
}

/// Yaw validity check configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct YawConfig {
    #[serde(default = "default_yaw_topic")]
    pub topic: String,
}

/// Report configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    /// Violating rows logged and written per failed check
    #[serde(default = "default_max_violation_rows")]
    pub max_violation_rows: usize,
}

// Default value functions
fn default_tilt_param() -> String { "MPC_MAN_TILT_MAX".to_string() }
fn default_max_deg() -> f64 { 0.0 }
// 0 = MANUAL, 1 = ALTCTL
fn default_nav_states() -> Vec<u8> { vec![0, 1] }

fn default_yaw_topic() -> String { "position_setpoint_triplet".to_string() }

fn default_max_violation_rows() -> usize { 10 }

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            param_name: default_tilt_param(),
            default_max_deg: default_max_deg(),
            nav_states: default_nav_states(),
        }
    }
}

impl Default for YawConfig {
    fn default() -> Self {
        Self {
            topic: default_yaw_topic(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_violation_rows: default_max_violation_rows(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ulg_checks::config::Config;
    ///
    /// let config = Config::load("checks.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.tilt.param_name.trim().is_empty() {
            return Err(UlgCheckError::InvalidConfig(
                "tilt param_name cannot be empty".to_string(),
            ));
        }

        if !(0.0..=90.0).contains(&self.tilt.default_max_deg) {
            return Err(UlgCheckError::InvalidConfig(
                "tilt default_max_deg must be between 0 and 90".to_string(),
            ));
        }

        if self.tilt.nav_states.is_empty() {
            return Err(UlgCheckError::InvalidConfig(
                "tilt nav_states cannot be empty".to_string(),
            ));
        }

        if self.yaw.topic.trim().is_empty() {
            return Err(UlgCheckError::InvalidConfig(
                "yaw topic cannot be empty".to_string(),
            ));
        }

        if self.report.max_violation_rows == 0 || self.report.max_violation_rows > 10_000 {
            return Err(UlgCheckError::InvalidConfig(
                "max_violation_rows must be between 1 and 10000".to_string(),
            ));
        }

        Ok(())
    }
}
