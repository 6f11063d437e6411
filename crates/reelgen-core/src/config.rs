//! Editor configuration.
//!
//! Stored as JSON under the platform config directory. Missing fields take
//! their defaults, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ReelgenError, Result};
use crate::time::TimelineScale;
use crate::{
    DEFAULT_SOURCE_DURATION_MS, MIN_CLIP_DURATION_MS, ROUNDING_STEP_MS, TIMELINE_WINDOW_SECS,
};

/// Tunable constants of the timeline editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Seconds shown across the full track width.
    pub timeline_window_secs: f64,
    /// Shortest duration a trim may leave, in ms.
    pub min_clip_duration_ms: f64,
    /// Committed values are rounded to this step, in ms.
    pub rounding_step_ms: f64,
    /// Natural duration assumed for media without one, in ms.
    pub default_source_duration_ms: f64,
    /// Width of the left/right resize handles, in pixels.
    pub handle_width_px: f32,
    /// Height of one track row, in pixels.
    pub track_height_px: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            timeline_window_secs: TIMELINE_WINDOW_SECS,
            min_clip_duration_ms: MIN_CLIP_DURATION_MS,
            rounding_step_ms: ROUNDING_STEP_MS,
            default_source_duration_ms: DEFAULT_SOURCE_DURATION_MS,
            handle_width_px: 8.0,
            track_height_px: 64.0,
        }
    }
}

impl EditorConfig {
    /// The pixel <-> time scale this configuration describes.
    pub fn scale(&self) -> TimelineScale {
        TimelineScale::new(self.timeline_window_secs)
    }

    /// Reject values the trim engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("timeline_window_secs", self.timeline_window_secs),
            ("min_clip_duration_ms", self.min_clip_duration_ms),
            ("rounding_step_ms", self.rounding_step_ms),
            ("default_source_duration_ms", self.default_source_duration_ms),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReelgenError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.handle_width_px < 0.0 || self.track_height_px <= 0.0 {
            return Err(ReelgenError::Config(
                "handle and track sizes must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)
            .map_err(|e| ReelgenError::Config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = Self::load(path)?;
            info!("Loaded editor config from {:?}", path);
            Ok(config)
        } else {
            debug!("No editor config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reelgen")
            .join("config.json")
    }
}
