//! Drag sessions: pointer capture and the idle/active/committing lifecycle.
//!
//! A [`DragController`] owns at most one session. Pointer-down resolves the
//! clip's bounds and opens the session, pointer-move feeds the pure steps in
//! [`crate::trim`], and pointer-up commits. Persistence goes through the
//! collaborator traits of `reelgen_timeline`; the controller never waits on
//! the outcome beyond the call returning.

use reelgen_core::{EditorConfig, Result, TimelineScale};
use reelgen_timeline::{ClipPatch, ClipPlacement, ClipStore, Keyframe, PreviewCache};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::bounds::{resolve_bounds, BoundsUnavailable, ClipElement, PixelSpan};
use crate::trim::{ClipVisual, DragStep, DragTarget, MoveSession, ResizeSession, TrimLimits};

// ── Pointer capture ─────────────────────────────────────────────

/// Tracks live pointer captures.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    live: Arc<AtomicUsize>,
}

impl CaptureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing pointer move/up events to a session.
    pub fn acquire(&self) -> PointerCapture {
        self.live.fetch_add(1, Ordering::SeqCst);
        PointerCapture {
            live: Arc::clone(&self.live),
        }
    }

    /// Number of captures not yet released.
    pub fn live_captures(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Move/up listener pair held by an active session. Released on drop.
#[derive(Debug)]
pub struct PointerCapture {
    live: Arc<AtomicUsize>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

// ── Session ─────────────────────────────────────────────────────

/// Lifecycle phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Active,
    Committing,
}

/// Why a pointer-down did not open a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionRefused {
    #[error("no bounds available: {0}")]
    Bounds(#[from] BoundsUnavailable),
    #[error("source media is shorter than the minimum clip duration")]
    SourceTooShort,
    #[error("another drag session is active")]
    AlreadyActive,
}

/// Everything captured at pointer-down.
#[derive(Debug, Clone, Copy)]
pub struct DragStart<'a> {
    pub target: DragTarget,
    pub keyframe: &'a Keyframe,
    pub project_id: Uuid,
    /// Natural duration of the keyframe's media, ms.
    pub source_duration: f64,
    pub element: &'a ClipElement,
    pub pointer_x: f64,
}

/// Values written when a session ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitOutcome {
    pub clip_id: Uuid,
    pub placement: ClipPlacement,
    pub visual: ClipVisual,
    /// Whether pointer-up issued a store write. Moves persist while dragging.
    pub wrote: bool,
}

#[derive(Debug, Clone, Copy)]
enum SessionKind {
    Move(MoveSession),
    Resize(ResizeSession),
}

#[derive(Debug)]
struct ActiveSession {
    clip_id: Uuid,
    project_id: Uuid,
    kind: SessionKind,
    current: DragStep,
    _capture: PointerCapture,
}

/// Owner of the drag session of one timeline view.
#[derive(Debug)]
pub struct DragController {
    scale: TimelineScale,
    limits: TrimLimits,
    registry: CaptureRegistry,
    phase: DragPhase,
    active: Option<ActiveSession>,
}

impl DragController {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_registry(config, CaptureRegistry::new())
    }

    pub fn with_registry(config: &EditorConfig, registry: CaptureRegistry) -> Self {
        Self {
            scale: config.scale(),
            limits: TrimLimits::from_config(config),
            registry,
            phase: DragPhase::Idle,
            active: None,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn registry(&self) -> &CaptureRegistry {
        &self.registry
    }

    pub fn active_clip(&self) -> Option<Uuid> {
        self.active.as_ref().map(|s| s.clip_id)
    }

    /// In-session placement, pixels and visual of the dragged clip.
    pub fn current(&self) -> Option<(Uuid, DragStep)> {
        self.active.as_ref().map(|s| (s.clip_id, s.current))
    }

    /// Open a session. On refusal nothing changes and nothing is written.
    pub fn pointer_down(
        &mut self,
        start: DragStart<'_>,
    ) -> std::result::Result<(), SessionRefused> {
        if self.active.is_some() {
            warn!(
                "Ignoring pointer-down on {} while a drag session is active",
                start.keyframe.id
            );
            return Err(SessionRefused::AlreadyActive);
        }

        let bounds = resolve_bounds(start.element).map_err(|e| {
            debug!("Drag on {} aborted: {}", start.keyframe.id, e);
            SessionRefused::from(e)
        })?;
        // resolve_bounds only succeeds with a container present
        let start_left = start.element.offset_left().unwrap_or(0.0);
        let start_width = start.element.clip.width;
        let original = start.keyframe.placement();

        let kind = match start.target {
            DragTarget::Body => SessionKind::Move(MoveSession {
                start_x: start.pointer_x,
                start_left,
                start_width,
                original,
                bounds,
                scale: self.scale,
            }),
            DragTarget::Handle(edge) => {
                let source = start.source_duration;
                if !source.is_finite() || source < self.limits.min_duration_ms {
                    debug!(
                        "Resize of {} refused: source duration {}ms",
                        start.keyframe.id, source
                    );
                    return Err(SessionRefused::SourceTooShort);
                }
                SessionKind::Resize(ResizeSession {
                    edge,
                    start_x: start.pointer_x,
                    start_left,
                    start_width,
                    original,
                    source_duration: source,
                    bounds,
                    scale: self.scale,
                    limits: self.limits,
                })
            }
        };

        debug!(
            "Drag session on {} started ({:?}), bounds [{:.1}, {:.1}] of {:.1}px",
            start.keyframe.id,
            start.target,
            bounds.left_bound_px,
            bounds.right_bound_px,
            bounds.parent_width
        );

        self.active = Some(ActiveSession {
            clip_id: start.keyframe.id,
            project_id: start.project_id,
            kind,
            current: DragStep {
                placement: original,
                pixels: PixelSpan::new(start_left, start_width),
                visual: ClipVisual::from_placement(&original, self.scale),
            },
            _capture: self.registry.acquire(),
        });
        self.phase = DragPhase::Active;
        Ok(())
    }

    /// Recompute the dragged clip. Moves persist the new timestamp right away.
    ///
    /// Returns `Ok(None)` when no session is active.
    pub fn pointer_move<S>(&mut self, pointer_x: f64, store: &S) -> Result<Option<ClipVisual>>
    where
        S: ClipStore + ?Sized,
    {
        let Some(session) = self.active.as_mut() else {
            return Ok(None);
        };

        let step = match &session.kind {
            SessionKind::Move(m) => m.step(pointer_x),
            SessionKind::Resize(r) => r.step(pointer_x),
        };
        session.current = step;
        trace!(
            "Drag {} -> ts={:.1} dur={:.1} off={:.1}",
            session.clip_id,
            step.placement.timestamp,
            step.placement.duration,
            step.placement.start_offset
        );

        if let SessionKind::Move(_) = session.kind {
            store.update_clip_fields(
                session.clip_id,
                ClipPatch::timestamp(step.placement.timestamp),
            )?;
        }
        Ok(Some(step.visual))
    }

    /// End the session and commit.
    ///
    /// Resizes are rounded, kept inside their bounds and source, and written
    /// in one patch; moves only
    /// invalidate the preview. The capture is released even when the write
    /// fails. Returns `Ok(None)` when no session is active.
    pub fn pointer_up<B>(&mut self, backend: &B) -> Result<Option<CommitOutcome>>
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        let Some(session) = self.active.take() else {
            return Ok(None);
        };
        self.phase = DragPhase::Committing;

        let (outcome, write) = match session.kind {
            SessionKind::Move(_) => (
                CommitOutcome {
                    clip_id: session.clip_id,
                    placement: session.current.placement,
                    visual: session.current.visual,
                    wrote: false,
                },
                Ok(()),
            ),
            SessionKind::Resize(resize) => {
                let placement = resize.commit(session.current.placement);
                let write =
                    backend.update_clip_fields(session.clip_id, ClipPatch::placement(placement));
                (
                    CommitOutcome {
                        clip_id: session.clip_id,
                        placement,
                        visual: ClipVisual::from_placement(&placement, self.scale),
                        wrote: true,
                    },
                    write,
                )
            }
        };
        backend.invalidate_preview(session.project_id);

        // Dropping the session releases its pointer capture.
        drop(session);
        self.phase = DragPhase::Idle;

        write?;
        info!(
            "Committed {}: ts={} dur={} off={}",
            outcome.clip_id,
            outcome.placement.timestamp,
            outcome.placement.duration,
            outcome.placement.start_offset
        );
        Ok(Some(outcome))
    }

    /// Release any session because the owning view is going away.
    ///
    /// There is no cancel path, so this commits like a pointer-up.
    pub fn teardown<B>(&mut self, backend: &B) -> Result<Option<CommitOutcome>>
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        if let Some(clip_id) = self.active_clip() {
            debug!("Tearing down view with active drag on {}", clip_id);
        }
        self.pointer_up(backend)
    }
}
