//! Move and trim calculations for timeline clips.
//!
//! Everything here is pure: a session captures the state at pointer-down and
//! each step maps the current pointer position to the next placement. The
//! caller decides what to render and what to persist.

use egui::{CursorIcon, Pos2, Rect};
use reelgen_core::{round_to_step, EditorConfig, TimelineScale};
use reelgen_timeline::ClipPlacement;

use crate::bounds::{PixelSpan, SiblingBounds};

/// Pixel to ms round trips differ from the exact bound by far less than this.
const BOUND_SLACK_MS: f64 = 1e-6;

/// Which edge of a clip is being trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// The part of a clip a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Body,
    Handle(TrimEdge),
}

/// Grab area of the `edge` handle of a clip, full clip height.
pub fn handle_rect(clip_rect: Rect, edge: TrimEdge, handle_width: f32) -> Rect {
    let left = match edge {
        TrimEdge::Left => clip_rect.left(),
        TrimEdge::Right => clip_rect.right() - handle_width,
    };
    Rect::from_min_size(
        Pos2::new(left, clip_rect.top()),
        egui::Vec2::new(handle_width, clip_rect.height()),
    )
}

/// Hit test a position against a clip's trim handles.
///
/// Returns `Some(TrimEdge)` if the position is over a trim handle, otherwise `None`.
pub fn hit_test_trim_handle(clip_rect: Rect, pos: Pos2, handle_width: f32) -> Option<TrimEdge> {
    if !clip_rect.contains(pos) {
        return None;
    }
    [TrimEdge::Left, TrimEdge::Right]
        .into_iter()
        .find(|&edge| handle_rect(clip_rect, edge, handle_width).contains(pos))
}

/// Classify a pointer-down inside `clip_rect`. Handles take priority over the body.
pub fn hit_test_clip(clip_rect: Rect, pos: Pos2, handle_width: f32) -> Option<DragTarget> {
    match hit_test_trim_handle(clip_rect, pos, handle_width) {
        Some(edge) => Some(DragTarget::Handle(edge)),
        None if clip_rect.contains(pos) => Some(DragTarget::Body),
        None => None,
    }
}

/// Get the appropriate cursor icon for a trim edge.
pub fn trim_cursor(edge: TrimEdge) -> CursorIcon {
    match edge {
        TrimEdge::Left => CursorIcon::ResizeWest,
        TrimEdge::Right => CursorIcon::ResizeEast,
    }
}

/// Duration floor and commit granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimLimits {
    pub min_duration_ms: f64,
    pub rounding_step_ms: f64,
}

impl TrimLimits {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            min_duration_ms: config.min_clip_duration_ms,
            rounding_step_ms: config.rounding_step_ms,
        }
    }
}

impl Default for TrimLimits {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// Clip position and size as percentages of the track width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVisual {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl ClipVisual {
    pub fn from_placement(placement: &ClipPlacement, scale: TimelineScale) -> Self {
        Self {
            left_percent: scale.ms_to_percent(placement.timestamp),
            width_percent: scale.ms_to_percent(placement.duration),
        }
    }
}

/// Result of one pointer-move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    /// Placement after this step.
    pub placement: ClipPlacement,
    /// Clip extent relative to the container.
    pub pixels: PixelSpan,
    pub visual: ClipVisual,
}

/// Clamp `value` to `[low, high]`, checking the lower bound first so an
/// inverted range resolves to `low` for values below it.
fn clamp_low_first(value: f64, low: f64, high: f64) -> f64 {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

// ── Move ────────────────────────────────────────────────────────

/// Drag of a clip body along its track.
#[derive(Debug, Clone, Copy)]
pub struct MoveSession {
    pub start_x: f64,
    pub start_left: f64,
    pub start_width: f64,
    pub original: ClipPlacement,
    pub bounds: SiblingBounds,
    pub scale: TimelineScale,
}

impl MoveSession {
    pub fn step(&self, pointer_x: f64) -> DragStep {
        let delta_x = pointer_x - self.start_x;
        let left = clamp_low_first(
            self.start_left + delta_x,
            self.bounds.left_bound_px,
            self.bounds.right_bound_px,
        );

        let timestamp = self
            .scale
            .px_to_ms(left, self.bounds.parent_width)
            .max(0.0);
        let placement = ClipPlacement {
            timestamp,
            ..self.original
        };

        DragStep {
            placement,
            pixels: PixelSpan::new(left, self.start_width),
            // Rendered from the timestamp, not the clamped pixels.
            visual: ClipVisual::from_placement(&placement, self.scale),
        }
    }
}

// ── Resize ──────────────────────────────────────────────────────

/// Drag of one of a clip's edge handles.
#[derive(Debug, Clone, Copy)]
pub struct ResizeSession {
    pub edge: TrimEdge,
    pub start_x: f64,
    pub start_left: f64,
    pub start_width: f64,
    pub original: ClipPlacement,
    /// Natural length of the source media, ms.
    pub source_duration: f64,
    pub bounds: SiblingBounds,
    pub scale: TimelineScale,
    pub limits: TrimLimits,
}

impl ResizeSession {
    pub fn step(&self, pointer_x: f64) -> DragStep {
        let delta_x = pointer_x - self.start_x;
        match self.edge {
            TrimEdge::Left => self.step_left(delta_x),
            TrimEdge::Right => self.step_right(delta_x),
        }
    }

    /// Final placement when the handle is released at `current`.
    ///
    /// Only what the dragged edge changed is rounded; the other edge stays
    /// where it was. The result stays inside the sibling bounds of the
    /// session, then the source clamps of [`commit_placement`] apply.
    pub fn commit(&self, current: ClipPlacement) -> ClipPlacement {
        let step = self.limits.rounding_step_ms;
        let parent_width = self.bounds.parent_width;
        let original = self.original;

        let placement = match self.edge {
            TrimEdge::Left => {
                let min_timestamp = self
                    .scale
                    .px_to_ms(self.bounds.left_bound_px, parent_width)
                    .max(0.0);
                let lowest = if min_timestamp > original.timestamp + BOUND_SLACK_MS {
                    min_timestamp - original.timestamp
                } else {
                    0.0
                };
                // Source and minimum-duration limits win over the sibling.
                let trim = (round_to_step(current.timestamp, step) - original.timestamp)
                    .max(lowest)
                    .min(self.max_left_trim_ms());
                ClipPlacement {
                    timestamp: original.timestamp + trim,
                    duration: original.duration - trim,
                    start_offset: original.start_offset + trim,
                }
            }
            TrimEdge::Right => {
                let max_end = self.scale.px_to_ms(
                    self.bounds.right_bound_px + self.start_width,
                    parent_width,
                );
                let room = max_end - original.timestamp;
                let mut duration = round_to_step(current.duration, step);
                if duration > room + BOUND_SLACK_MS {
                    duration = room;
                }
                ClipPlacement {
                    duration,
                    ..original
                }
            }
        };

        clamp_to_source(placement, self.source_duration, self.limits.min_duration_ms)
    }

    /// Largest trim the left handle may apply, in ms.
    ///
    /// The source must keep `min_duration` after the new offset, and the clip
    /// must keep `min_duration` of its own length.
    fn max_left_trim_ms(&self) -> f64 {
        let min = self.limits.min_duration_ms;
        let max_start_offset = (self.source_duration - min).max(0.0);
        (max_start_offset - self.original.start_offset)
            .min(self.original.duration - min)
            .max(0.0)
    }

    fn step_left(&self, delta_x: f64) -> DragStep {
        let parent_width = self.bounds.parent_width;
        let end_point = self.start_left + self.start_width;
        let max_trim_ms = self.max_left_trim_ms();

        // Only dragging right trims; the original offset is a hard floor.
        let trim_px = delta_x.max(0.0);
        let trim_ms = self.scale.px_to_ms(trim_px, parent_width);
        let actual_trim_ms = trim_ms.min(max_trim_ms);
        let actual_trim_px = self.scale.ms_to_px(actual_trim_ms, parent_width);

        // The previous sibling's right edge, then the source limits on top.
        let max_left = self.start_left + self.scale.ms_to_px(max_trim_ms, parent_width);
        let new_left = (self.start_left + actual_trim_px)
            .max(self.bounds.left_bound_px)
            .min(max_left);

        let new_width = end_point - new_left;
        let timestamp = self.scale.px_to_ms(new_left, parent_width).max(0.0);

        let final_trim_ms = self
            .scale
            .px_to_ms(self.start_width - new_width, parent_width);
        let start_offset = self.original.start_offset + final_trim_ms;
        let duration = (self.original.duration - final_trim_ms)
            .min(self.source_duration - start_offset);

        let placement = ClipPlacement {
            timestamp,
            duration,
            start_offset,
        };
        DragStep {
            placement,
            pixels: PixelSpan::new(new_left, new_width),
            visual: ClipVisual::from_placement(&placement, self.scale),
        }
    }

    fn step_right(&self, delta_x: f64) -> DragStep {
        let parent_width = self.bounds.parent_width;
        let min = self.limits.min_duration_ms;

        let requested = self
            .scale
            .px_to_ms(self.start_width + delta_x, parent_width);
        let source_limit = self.source_duration - self.original.start_offset;
        // Right edge may reach the next sibling's left edge, no further.
        let sibling_limit = self.scale.px_to_ms(
            self.bounds.right_bound_px + self.start_width - self.start_left,
            parent_width,
        );
        let duration = requested.min(source_limit).min(sibling_limit).max(min);

        let placement = ClipPlacement {
            duration,
            ..self.original
        };
        DragStep {
            placement,
            pixels: PixelSpan::new(
                self.start_left,
                self.scale.ms_to_px(duration, parent_width),
            ),
            visual: ClipVisual::from_placement(&placement, self.scale),
        }
    }
}

// ── Commit ──────────────────────────────────────────────────────

/// Round every placement field to the nearest `step` ms.
pub fn round_placement(placement: ClipPlacement, step: f64) -> ClipPlacement {
    ClipPlacement {
        timestamp: round_to_step(placement.timestamp, step),
        duration: round_to_step(placement.duration, step),
        start_offset: round_to_step(placement.start_offset, step),
    }
}

/// Rounding pass plus source clamps.
///
/// Rounds, then re-establishes `start_offset + duration <= source_duration`
/// and `duration >= min_duration`. Requires
/// `source_duration >= limits.min_duration_ms`.
pub fn commit_placement(
    placement: ClipPlacement,
    source_duration: f64,
    limits: &TrimLimits,
) -> ClipPlacement {
    clamp_to_source(
        round_placement(placement, limits.rounding_step_ms),
        source_duration,
        limits.min_duration_ms,
    )
}

fn clamp_to_source(mut placement: ClipPlacement, source_duration: f64, min: f64) -> ClipPlacement {
    placement.timestamp = placement.timestamp.max(0.0);
    placement.start_offset = placement
        .start_offset
        .max(0.0)
        .min((source_duration - min).max(0.0));

    if placement.start_offset + placement.duration > source_duration {
        placement.duration = min.max(source_duration - placement.start_offset);
    }
    if placement.duration < min {
        placement.duration = min;
    }

    placement
}
