//! Generated media items referenced by keyframes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of generated media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Music,
    Voiceover,
}

impl MediaKind {
    /// Lowercase display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Music => "music",
            Self::Voiceover => "voiceover",
        }
    }

    /// Whether the media is rendered with a waveform.
    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Music | Self::Voiceover)
    }
}

/// A media asset produced by a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Unique media ID
    pub id: Uuid,
    /// Media kind
    pub kind: MediaKind,
    /// Prompt the media was generated from
    #[serde(default)]
    pub prompt: Option<String>,
    /// Natural (untrimmed) duration in ms, when known
    #[serde(default)]
    pub duration_ms: Option<f64>,
    /// Waveform amplitudes in `[-1, 1]`, for audio media
    #[serde(default)]
    pub waveform: Option<Vec<f32>>,
}

impl MediaItem {
    /// Create a media item with no metadata.
    pub fn new(kind: MediaKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            prompt: None,
            duration_ms: None,
            waveform: None,
        }
    }

    /// Builder: set the natural duration.
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Builder: set the generation prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Natural duration, or `fallback_ms` when the media does not report one.
    pub fn resolve_duration(&self, fallback_ms: f64) -> f64 {
        self.duration_ms.unwrap_or(fallback_ms)
    }

    /// Label shown on the clip: the prompt when present, else the media kind.
    pub fn label(&self) -> &str {
        match self.prompt.as_deref() {
            Some(prompt) if !prompt.is_empty() => prompt,
            _ => self.kind.as_str(),
        }
    }
}
