//! ReelGen Core - Foundation types for the timeline editor
//!
//! This crate provides the fundamental types shared by the other crates:
//! - Error type and result alias
//! - Timeline scale (pixel to millisecond mapping, rounding)
//! - Editor configuration

pub mod config;
pub mod error;
pub mod time;

pub use config::EditorConfig;
pub use error::{ReelgenError, Result};
pub use time::{preview_start_frame, round_to_step, TimelineScale};

/// Composition frame rate assumed by the preview pipeline.
pub const PREVIEW_FPS: f64 = 30.0;

/// Width of the visible timeline window, in seconds.
pub const TIMELINE_WINDOW_SECS: f64 = 30.0;

/// Shortest clip a trim or resize may leave behind, in milliseconds.
pub const MIN_CLIP_DURATION_MS: f64 = 500.0;

/// Granularity committed values are rounded to, in milliseconds.
pub const ROUNDING_STEP_MS: f64 = 100.0;

/// Natural duration assumed for media that does not report one.
pub const DEFAULT_SOURCE_DURATION_MS: f64 = 5000.0;
