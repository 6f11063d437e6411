//! Keyframes: placed instances of generated media on a track.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaKind;

/// Where a clip sits on its track and which part of its source plays.
///
/// All values are milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipPlacement {
    /// Start of the clip on the track
    pub timestamp: f64,
    /// Visible length on the track
    pub duration: f64,
    /// Offset into the source media where playback begins
    pub start_offset: f64,
}

impl ClipPlacement {
    pub fn new(timestamp: f64, duration: f64, start_offset: f64) -> Self {
        Self {
            timestamp,
            duration,
            start_offset,
        }
    }

    /// End of the clip on the track.
    pub fn end(&self) -> f64 {
        self.timestamp + self.duration
    }

    /// End of the played window within the source.
    pub fn source_end(&self) -> f64 {
        self.start_offset + self.duration
    }
}

/// Partial update of a keyframe's placement. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<f64>,
}

impl ClipPatch {
    /// Patch that only moves the clip.
    pub fn timestamp(timestamp: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }

    /// Patch overwriting all three placement fields.
    pub fn placement(placement: ClipPlacement) -> Self {
        Self {
            timestamp: Some(placement.timestamp),
            duration: Some(placement.duration),
            start_offset: Some(placement.start_offset),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_none() && self.duration.is_none() && self.start_offset.is_none()
    }
}

/// Reference from a keyframe to the media it plays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyframeData {
    pub media_id: Uuid,
    pub kind: MediaKind,
}

/// A clip on a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: Uuid,
    /// Owning track
    pub track_id: Uuid,
    /// Start on the track, ms
    pub timestamp: f64,
    /// Visible length, ms
    pub duration: f64,
    /// Offset into the source, ms
    #[serde(default)]
    pub start_offset: f64,
    /// Media reference
    pub data: KeyframeData,
}

impl Keyframe {
    /// Create a keyframe playing `media_id` from its beginning.
    pub fn new(
        track_id: Uuid,
        media_id: Uuid,
        kind: MediaKind,
        timestamp: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            track_id,
            timestamp,
            duration,
            start_offset: 0.0,
            data: KeyframeData { media_id, kind },
        }
    }

    /// Current placement values.
    pub fn placement(&self) -> ClipPlacement {
        ClipPlacement::new(self.timestamp, self.duration, self.start_offset)
    }

    /// Overwrite the fields present in `patch`.
    pub fn apply_patch(&mut self, patch: &ClipPatch) {
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(start_offset) = patch.start_offset {
            self.start_offset = start_offset;
        }
    }
}
