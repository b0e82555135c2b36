//! Playlist members and lazy binding.

use std::path::{Path, PathBuf};

use medley_demux::{Demuxer, DemuxerOpener, StreamInfo};

use crate::error::{ConcatError, Result};

/// One member of a concatenated playlist.
///
/// A member starts out as nothing but a path. Binding probes and opens it
/// through the host's [`DemuxerOpener`], recording its duration and stream
/// count; those are immutable from then on, even across a release and
/// rebind. The demuxer handle is owned exclusively by the member while
/// bound and is released deterministically when playback moves past it or
/// the source is torn down.
pub struct Entry {
    path: PathBuf,
    /// Duration in milliseconds; 0 until probed.
    duration_ms: i64,
    /// Stream count; 0 until probed.
    stream_count: usize,
    handle: Option<Box<dyn Demuxer>>,
    probed: bool,
    failed: bool,
}

impl Entry {
    /// Create an unbound member for `path`.
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            duration_ms: 0,
            stream_count: 0,
            handle: None,
            probed: false,
            failed: false,
        }
    }

    /// The member's (resolved) path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration in milliseconds; 0 until the member has been probed.
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// Stream count; 0 until the member has been probed.
    pub fn stream_count(&self) -> usize {
        self.stream_count
    }

    /// Whether a demuxer handle is currently held.
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether the member failed to open and is being skipped.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Probe and open the member through `opener`.
    ///
    /// Binding an already-bound member is a no-op returning the cached
    /// state, not a re-probe. A member that failed before stays failed;
    /// the diagnostic was emitted on the first failure.
    pub(crate) fn bind(&mut self, opener: &dyn DemuxerOpener) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        if self.failed {
            return Err(ConcatError::OpenFailure {
                path: self.path.clone(),
            });
        }
        match opener.open(&self.path) {
            Ok(demuxer) => {
                if !self.probed {
                    self.duration_ms =
                        i64::try_from(demuxer.duration().as_millis()).unwrap_or(i64::MAX);
                    self.stream_count = demuxer.streams().len();
                    self.probed = true;
                }
                self.handle = Some(demuxer);
                Ok(())
            }
            Err(err) => {
                self.failed = true;
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "skipping playlist member that failed to open"
                );
                Err(ConcatError::OpenFailure {
                    path: self.path.clone(),
                })
            }
        }
    }

    /// Streams of the bound demuxer; empty while unbound.
    pub(crate) fn streams(&self) -> &[StreamInfo] {
        self.handle.as_deref().map(Demuxer::streams).unwrap_or(&[])
    }

    /// Mutable access to the bound demuxer.
    pub(crate) fn demuxer_mut(&mut self) -> Option<&mut dyn Demuxer> {
        self.handle.as_deref_mut().map(|d| d as &mut dyn Demuxer)
    }

    /// Drop the decode resource, keeping probed metadata.
    pub(crate) fn release(&mut self) {
        self.handle = None;
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("path", &self.path)
            .field("duration_ms", &self.duration_ms)
            .field("stream_count", &self.stream_count)
            .field("bound", &self.is_bound())
            .field("failed", &self.failed)
            .finish()
    }
}
