//! Error types for medley-concat.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for concat operations.
pub type Result<T> = std::result::Result<T, ConcatError>;

/// Error type for concat operations.
#[derive(Debug, Error)]
pub enum ConcatError {
    /// Malformed or degenerate playlist description.
    #[error("Invalid playlist: {0}")]
    InvalidInput(String),

    /// A playlist member could not be probed or opened.
    #[error("Failed to open playlist member: {path}")]
    OpenFailure {
        /// Path of the member that failed to open.
        path: PathBuf,
    },

    /// A bound stream has a type the host cannot consume.
    #[error("No decoder available for {codec} stream {stream}")]
    DecoderUnavailable {
        /// Global index of the undecodable stream.
        stream: usize,
        /// Codec identifier of the undecodable stream.
        codec: String,
    },

    /// Seek target beyond the total known duration.
    #[error("Seek target {requested_ms}ms is past the known duration of {duration_ms}ms")]
    SeekOutOfRange {
        /// Requested position on the merged timeline, in milliseconds.
        requested_ms: i64,
        /// Total known duration at the time of the seek, in milliseconds.
        duration_ms: i64,
    },

    /// Error from a member's underlying demuxer, passed through unchanged.
    #[error(transparent)]
    Demux(#[from] medley_demux::DemuxError),
}

impl ConcatError {
    /// Create an invalid-input error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
