//! ReelGen Timeline - Timeline data model
//!
//! Implements the structures the trim engine reads and writes:
//! - Projects containing tracks, keyframes and generated media
//! - Keyframe placement and partial-field patches
//! - Storage and preview-cache collaborators
//! - Versioned JSON project files

pub mod keyframe;
pub mod media;
pub mod project;
pub mod serialization;
pub mod store;
pub mod track;

pub use keyframe::{ClipPatch, ClipPlacement, Keyframe, KeyframeData};
pub use media::{MediaItem, MediaKind};
pub use project::Project;
pub use serialization::ProjectFile;
pub use store::{ClipStore, InMemoryStore, PreviewCache, QueuedStore, StoreFailure};
pub use track::{Track, TrackKind};
