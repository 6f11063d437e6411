//! Sibling bounds for a clip on its track.
//!
//! Positions are measured along the track's horizontal axis in pixels. A clip
//! may not be moved or resized across the right edge of the clip before it or
//! the left edge of the clip after it; clips at either end are limited by the
//! track container itself.

use reelgen_core::TimelineScale;
use reelgen_timeline::Keyframe;
use thiserror::Error;
use uuid::Uuid;

/// A horizontal extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpan {
    pub left: f64,
    pub width: f64,
}

impl PixelSpan {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// What the bounds resolver sees of a rendered clip.
///
/// All spans share one coordinate space (e.g. screen pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipElement {
    /// The enclosing track, or `None` when the clip is not attached to one.
    pub container: Option<PixelSpan>,
    /// The clip itself.
    pub clip: PixelSpan,
    /// Clip immediately before this one on the track.
    pub previous: Option<PixelSpan>,
    /// Clip immediately after this one on the track.
    pub next: Option<PixelSpan>,
}

impl ClipElement {
    /// A clip that is not inside any track container.
    pub fn detached(clip: PixelSpan) -> Self {
        Self {
            container: None,
            clip,
            previous: None,
            next: None,
        }
    }

    /// Left edge relative to the container.
    pub fn offset_left(&self) -> Option<f64> {
        self.container.map(|c| self.clip.left - c.left)
    }
}

/// Why no bounds could be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoundsUnavailable {
    #[error("clip is not inside a track container")]
    Detached,
    #[error("track container has no usable width")]
    ZeroWidth,
}

/// Movement limits of one clip, relative to the container origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiblingBounds {
    /// Container width.
    pub parent_width: f64,
    /// Smallest allowed left edge.
    pub left_bound_px: f64,
    /// Largest allowed left edge at the clip's current width.
    pub right_bound_px: f64,
}

impl SiblingBounds {
    pub fn left_bound_percent(&self) -> f64 {
        (self.left_bound_px / self.parent_width) * 100.0
    }

    pub fn right_bound_percent(&self) -> f64 {
        (self.right_bound_px / self.parent_width) * 100.0
    }
}

/// Compute the sibling bounds of `element`.
pub fn resolve_bounds(element: &ClipElement) -> Result<SiblingBounds, BoundsUnavailable> {
    let container = element.container.ok_or(BoundsUnavailable::Detached)?;
    if !container.width.is_finite() || container.width <= 0.0 {
        return Err(BoundsUnavailable::ZeroWidth);
    }

    let left_bound_px = element
        .previous
        .map(|prev| prev.right() - container.left)
        .unwrap_or(0.0);
    let right_bound_px = match element.next {
        Some(next) => next.left - container.left - element.clip.width,
        None => container.width - element.clip.width,
    };

    Ok(SiblingBounds {
        parent_width: container.width,
        left_bound_px,
        right_bound_px,
    })
}

/// Pixel layout of one track's clips inside a container.
#[derive(Debug, Clone)]
pub struct TrackLayout {
    container: PixelSpan,
    clips: Vec<(Uuid, PixelSpan)>,
}

impl TrackLayout {
    /// Lay out `keyframes`, which must be in timeline order.
    pub fn new(container: PixelSpan, scale: TimelineScale, keyframes: &[&Keyframe]) -> Self {
        let clips = keyframes
            .iter()
            .map(|k| {
                let left = container.left + scale.ms_to_px(k.timestamp, container.width);
                let width = scale.ms_to_px(k.duration, container.width);
                (k.id, PixelSpan::new(left, width))
            })
            .collect();
        Self { container, clips }
    }

    pub fn container(&self) -> PixelSpan {
        self.container
    }

    /// Clip spans in timeline order.
    pub fn clips(&self) -> &[(Uuid, PixelSpan)] {
        &self.clips
    }

    pub fn span(&self, clip_id: Uuid) -> Option<PixelSpan> {
        self.clips
            .iter()
            .find(|(id, _)| *id == clip_id)
            .map(|(_, span)| *span)
    }

    /// The resolver's view of `clip_id`, with its neighbours.
    pub fn element(&self, clip_id: Uuid) -> Option<ClipElement> {
        let index = self.clips.iter().position(|(id, _)| *id == clip_id)?;
        Some(ClipElement {
            container: Some(self.container),
            clip: self.clips[index].1,
            previous: index
                .checked_sub(1)
                .and_then(|i| self.clips.get(i))
                .map(|(_, span)| *span),
            next: self.clips.get(index + 1).map(|(_, span)| *span),
        })
    }
}
