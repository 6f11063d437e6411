//! ReelGen UI - timeline interaction for the editor
//!
//! Provides:
//! - Sibling bounds and track layout
//! - Pure move/trim calculations and the commit pass
//! - Drag sessions with scoped pointer capture
//! - The egui track-row timeline widget

pub mod bounds;
pub mod session;
pub mod track_row;
pub mod trim;

pub use bounds::{
    resolve_bounds, BoundsUnavailable, ClipElement, PixelSpan, SiblingBounds, TrackLayout,
};
pub use session::{
    CaptureRegistry, CommitOutcome, DragController, DragPhase, DragStart, PointerCapture,
    SessionRefused,
};
pub use track_row::{handle_grip_rect, TimelineAction, TimelineView};
pub use trim::{
    commit_placement, handle_rect, hit_test_clip, hit_test_trim_handle, round_placement,
    trim_cursor, ClipVisual, DragStep, DragTarget, MoveSession, ResizeSession,
    TrimEdge, TrimLimits,
};
