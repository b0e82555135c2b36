//! Error types for medley-playlist.

use std::io;
use thiserror::Error;

/// Result type for playlist operations.
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Error type for playlist operations.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or degenerate playlist description.
    #[error("Invalid playlist: {0}")]
    InvalidInput(String),
}

impl PlaylistError {
    /// Create an invalid-input error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
