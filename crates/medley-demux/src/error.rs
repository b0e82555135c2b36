//! Error types for medley-demux.

use std::io;
use thiserror::Error;

/// Result type for demuxer operations.
pub type Result<T> = std::result::Result<T, DemuxError>;

/// Error type for demuxer operations.
#[derive(Debug, Error)]
pub enum DemuxError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The container could not be parsed.
    #[error("Malformed container: {0}")]
    Malformed(String),

    /// The container or codec is not handled by this demuxer.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// A seek target the underlying container cannot reach.
    #[error("Unseekable position: {0}ms")]
    Unseekable(i64),
}

impl DemuxError {
    /// Create a malformed-container error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
