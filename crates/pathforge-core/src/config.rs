//! Editor settings for PathForge
//!
//! Holds the numeric knobs of the editing core: serialization precision,
//! arc-length sampling, the length→parameter search limits, and the depth of
//! the undo history. Settings are stored as JSON or TOML, chosen by the file
//! extension, and validated on both load and save.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of fractional digits emitted when serializing path data.
pub const DEFAULT_PRECISION: u32 = 3;
/// Default number of linear samples used to approximate an elliptical arc.
pub const DEFAULT_ARC_RESOLUTION: usize = 300;
/// Default maximum number of actions kept in the undo history.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;
/// Default acceptable error of the length→parameter search.
pub const DEFAULT_LENGTH_TOLERANCE: f64 = 0.001;
/// Default iteration cap of the length→parameter search.
pub const DEFAULT_MAX_LENGTH_ITERATIONS: usize = 500;

/// Numeric settings consumed by the path model and the undo service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Fractional digits kept when path data is serialized
    pub precision: u32,
    /// Samples used for the piecewise-linear arc length
    pub arc_length_resolution: usize,
    /// Maximum number of actions kept in history
    pub history_depth: usize,
    /// Error at which the length→parameter search stops
    pub length_tolerance: f64,
    /// Iteration cap of the length→parameter search
    pub max_length_iterations: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            arc_length_resolution: DEFAULT_ARC_RESOLUTION,
            history_depth: DEFAULT_HISTORY_DEPTH,
            length_tolerance: DEFAULT_LENGTH_TOLERANCE,
            max_length_iterations: DEFAULT_MAX_LENGTH_ITERATIONS,
        }
    }
}

impl EditorSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;

        let settings: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        settings.validate()?;
        tracing::debug!("Loaded editor settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate setting ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.precision > 15 {
            return Err(invalid("precision", "must be at most 15 digits"));
        }
        if self.arc_length_resolution == 0 {
            return Err(invalid("arc_length_resolution", "must be > 0"));
        }
        if self.history_depth == 0 {
            return Err(invalid("history_depth", "must be > 0"));
        }
        if !(self.length_tolerance.is_finite() && self.length_tolerance > 0.0) {
            return Err(invalid("length_tolerance", "must be a positive number"));
        }
        if self.max_length_iterations == 0 {
            return Err(invalid("max_length_iterations", "must be > 0"));
        }
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
