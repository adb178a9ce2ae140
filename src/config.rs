//! Engine configuration file support.
//!
//! Settings are stored as pretty-printed JSON. Every field has a default, so
//! a partial file (or none at all) still loads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::detection::DetectionConfig;
use crate::error::ConfigError;
use crate::interaction::{HANDLE_HIT_RADIUS, InteractionSettings};
use crate::magnifier::{DEFAULT_PADDING, Magnifier};
use crate::model::MIN_EXTENT;
use crate::viewport::{ScaleBounds, WHEEL_SENSITIVITY};

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Zoom range of the main viewer
    pub viewport_bounds: ScaleBounds,

    /// Zoom range of the zoom layered on magnified crops
    pub magnifier_bounds: ScaleBounds,

    /// Wheel zoom constant `k` in `exp(-delta * k)`
    pub wheel_sensitivity: f32,

    /// Corner handle hit radius in screen pixels
    pub handle_radius: f32,

    /// Minimum normalized width/height during resize and create
    pub min_extent: f32,

    /// Initial crop padding, 0 to 100
    pub padding: f32,

    /// Grid slideshow step in milliseconds
    pub slideshow_interval_ms: u64,

    /// Log verbosity level
    pub log_level: LogLevel,

    /// Defaults passed to detection backends
    pub detection: DetectionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            viewport_bounds: ScaleBounds::MAIN,
            magnifier_bounds: ScaleBounds::MAGNIFIER,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            handle_radius: HANDLE_HIT_RADIUS,
            min_extent: MIN_EXTENT,
            padding: DEFAULT_PADDING,
            slideshow_interval_ms: 2000,
            log_level: LogLevel::default(),
            detection: DetectionConfig::default(),
        }
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        message: message.into(),
    }
}

impl EngineConfig {
    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                expected: CONFIG_VERSION,
                found: config.version,
            });
        }
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport_bounds.is_valid() {
            return Err(invalid("viewport_bounds", "need 0 < min <= max"));
        }
        if !self.magnifier_bounds.is_valid() {
            return Err(invalid("magnifier_bounds", "need 0 < min <= max"));
        }
        if !(self.wheel_sensitivity.is_finite() && self.wheel_sensitivity > 0.0) {
            return Err(invalid("wheel_sensitivity", "must be positive"));
        }
        if !(self.handle_radius.is_finite() && self.handle_radius >= 0.0) {
            return Err(invalid("handle_radius", "must not be negative"));
        }
        if !(self.min_extent > 0.0 && self.min_extent < 1.0) {
            return Err(invalid("min_extent", "must be in (0, 1)"));
        }
        if !(0.0..=100.0).contains(&self.padding) {
            return Err(invalid("padding", "must be in [0, 100]"));
        }
        if self.slideshow_interval_ms == 0 {
            return Err(invalid("slideshow_interval_ms", "must be positive"));
        }
        self.detection
            .validate()
            .map_err(|e| invalid("detection", e.to_string()))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write to `path`, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "labelscope.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("labelscope").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home| {
                home.join(".config")
                    .join("labelscope")
                    .join(Self::default_filename())
            })
        }
    }

    pub fn interaction_settings(&self) -> InteractionSettings {
        InteractionSettings {
            handle_radius: self.handle_radius,
            min_extent: self.min_extent,
            wheel_sensitivity: self.wheel_sensitivity,
            bounds: self.viewport_bounds,
        }
    }

    /// A magnifier configured with these settings.
    pub fn magnifier(&self) -> Magnifier {
        let mut magnifier = Magnifier::with_bounds(self.padding, self.magnifier_bounds);
        magnifier.set_wheel_sensitivity(self.wheel_sensitivity);
        magnifier
    }

    pub fn slideshow_interval(&self) -> Duration {
        Duration::from_millis(self.slideshow_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"log_level\": \"info\""));
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "padding": 60.0, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.padding, 60.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.viewport_bounds, ScaleBounds::MAIN);
        assert_eq!(config.slideshow_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = EngineConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionMismatch {
                expected: 1,
                found: 99
            }
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err =
            EngineConfig::from_json(r#"{ "viewport_bounds": { "min": 5.0, "max": 1.0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "viewport_bounds",
                ..
            }
        ));
        assert!(EngineConfig::from_json(r#"{ "padding": 150.0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "detection": { "iou": 2.0 } }"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labelscope.json");
        assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());

        let config = EngineConfig {
            handle_radius: 12.0,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap().handle_radius, 12.0);
    }

    #[test]
    fn test_derived_settings() {
        let config = EngineConfig {
            padding: 40.0,
            ..Default::default()
        };
        assert_eq!(config.interaction_settings(), InteractionSettings::default());
        let magnifier = config.magnifier();
        assert_eq!(magnifier.padding(), 40.0);
        assert_eq!(magnifier.viewport().bounds(), ScaleBounds::MAGNIFIER);
    }
}
