//! Error type shared by the ReelGen library crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReelgenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A track, keyframe or media item that does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A placement the project model refuses.
    #[error("Timeline error: {0}")]
    Timeline(String),

    /// A store rejected or could not queue a write.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid editor configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReelgenError>;
