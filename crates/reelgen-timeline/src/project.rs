//! Project: tracks, the keyframes placed on them, and the generated media.

use reelgen_core::{ReelgenError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keyframe::Keyframe;
use crate::media::MediaItem;
use crate::track::{Track, TrackKind};

/// Padding added after the last keyframe when sizing the composition.
const COMPOSITION_TAIL_MS: f64 = 5000.0;

/// Shortest composition, in seconds.
const DEFAULT_COMPOSITION_SECS: f64 = 5.0;

/// A video project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project title
    pub title: String,
    /// Tracks, top to bottom
    pub tracks: Vec<Track>,
    /// Keyframes of all tracks
    pub keyframes: Vec<Keyframe>,
    /// Generated media
    pub media: Vec<MediaItem>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            tracks: Vec::new(),
            keyframes: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Add a track and return its ID.
    pub fn add_track(&mut self, kind: TrackKind, label: impl Into<String>) -> Uuid {
        let track = Track::new(self.id, kind, label);
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Add a media item and return its ID.
    pub fn add_media(&mut self, media: MediaItem) -> Uuid {
        let id = media.id;
        self.media.push(media);
        id
    }

    /// Place a keyframe. The track and media must exist and agree on kind.
    pub fn add_keyframe(&mut self, keyframe: Keyframe) -> Result<Uuid> {
        let track = self.track(keyframe.track_id).ok_or_else(|| {
            ReelgenError::NotFound(format!("track {}", keyframe.track_id))
        })?;
        if self.media(keyframe.data.media_id).is_none() {
            return Err(ReelgenError::NotFound(format!(
                "media {}",
                keyframe.data.media_id
            )));
        }
        if !track.kind.accepts(keyframe.data.kind) {
            return Err(ReelgenError::Timeline(format!(
                "{:?} track cannot hold {} media",
                track.kind,
                keyframe.data.kind.as_str()
            )));
        }
        let id = keyframe.id;
        self.keyframes.push(keyframe);
        Ok(id)
    }

    pub fn track(&self, id: Uuid) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn media(&self, id: Uuid) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.id == id)
    }

    /// Media played by `keyframe`.
    pub fn media_for(&self, keyframe: &Keyframe) -> Option<&MediaItem> {
        self.media(keyframe.data.media_id)
    }

    pub fn keyframe(&self, id: Uuid) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    pub fn keyframe_mut(&mut self, id: Uuid) -> Option<&mut Keyframe> {
        self.keyframes.iter_mut().find(|k| k.id == id)
    }

    /// Keyframes of one track in timeline order.
    ///
    /// This order defines which clips are each other's previous/next sibling.
    pub fn keyframes_by_track(&self, track_id: Uuid) -> Vec<&Keyframe> {
        let mut frames: Vec<&Keyframe> = self
            .keyframes
            .iter()
            .filter(|k| k.track_id == track_id)
            .collect();
        frames.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        frames
    }

    /// Remove a keyframe. Returns the removed keyframe.
    pub fn delete_keyframe(&mut self, id: Uuid) -> Option<Keyframe> {
        let index = self.keyframes.iter().position(|k| k.id == id)?;
        Some(self.keyframes.remove(index))
    }

    /// Length of the preview composition in whole seconds: the latest
    /// keyframe start plus a five second tail, never shorter than five
    /// seconds.
    pub fn composition_duration_secs(&self) -> u64 {
        let max_timestamp = self
            .keyframes
            .iter()
            .map(|k| k.timestamp)
            .fold(0.0_f64, f64::max);
        let secs = ((max_timestamp + COMPOSITION_TAIL_MS) / 1000.0).ceil();
        secs.max(DEFAULT_COMPOSITION_SECS) as u64
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}
