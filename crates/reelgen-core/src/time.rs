//! Timeline scale: the linear mapping between track pixels and milliseconds.
//!
//! A track strip always shows a fixed window of time (30 seconds by default),
//! so a pixel position is only meaningful together with the width of the
//! container it was measured in.

use serde::{Deserialize, Serialize};

use crate::TIMELINE_WINDOW_SECS;

/// Linear pixel <-> time mapping for one track strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    /// Seconds covered by the full container width.
    pub window_secs: f64,
}

impl TimelineScale {
    /// Create a scale covering `window_secs` per full width.
    pub const fn new(window_secs: f64) -> Self {
        Self { window_secs }
    }

    /// Convert a pixel distance in a container of `parent_width` to milliseconds.
    #[inline]
    pub fn px_to_ms(&self, px: f64, parent_width: f64) -> f64 {
        (px / parent_width) * self.window_secs * 1000.0
    }

    /// Convert milliseconds to a pixel distance in a container of `parent_width`.
    #[inline]
    pub fn ms_to_px(&self, ms: f64, parent_width: f64) -> f64 {
        (ms / self.window_secs / 1000.0) * parent_width
    }

    /// Convert milliseconds to a percentage of the container width.
    #[inline]
    pub fn ms_to_percent(&self, ms: f64) -> f64 {
        ((ms / self.window_secs) * 100.0) / 1000.0
    }

    /// Percentage of the container width formatted for a style attribute,
    /// e.g. `"6.67%"`.
    pub fn style_percent(&self, ms: f64) -> String {
        format!("{:.2}%", self.ms_to_percent(ms))
    }

    /// Duration of the whole window in milliseconds.
    pub fn window_ms(&self) -> f64 {
        self.window_secs * 1000.0
    }
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self::new(TIMELINE_WINDOW_SECS)
    }
}

/// Round `value` to the nearest multiple of `step`.
///
/// Halves round away from zero. Rounding an already-rounded value is a no-op.
#[inline]
pub fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// First preview frame of a clip starting at `timestamp_ms`.
pub fn preview_start_frame(timestamp_ms: f64, fps: f64) -> i64 {
    (timestamp_ms / (1000.0 / fps)).floor() as i64
}
