//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::media::MediaKind;

/// Kind of track. Each track holds clips of a single media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Music,
    Voiceover,
}

impl TrackKind {
    /// Whether media of `kind` may be placed on this track.
    pub fn accepts(&self, kind: MediaKind) -> bool {
        match self {
            Self::Video => matches!(kind, MediaKind::Video | MediaKind::Image),
            Self::Music => kind == MediaKind::Music,
            Self::Voiceover => kind == MediaKind::Voiceover,
        }
    }
}

/// A horizontal lane of non-overlapping clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    /// Track kind
    pub kind: TrackKind,
    /// Track label
    pub label: String,
}

impl Track {
    /// Create a new track in `project_id`.
    pub fn new(project_id: Uuid, kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            kind,
            label: label.into(),
        }
    }
}
