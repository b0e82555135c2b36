//! The demuxer contract.

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::packet::Packet;
use crate::stream::StreamInfo;

/// A pull-based demuxer over one opened container.
///
/// Implementations own whatever decode resource the container needs and
/// release it on drop. All operations are synchronous and block the caller
/// until the underlying read or seek completes.
pub trait Demuxer {
    /// Streams in this container, locally indexed.
    fn streams(&self) -> &[StreamInfo];

    /// Total container duration.
    fn duration(&self) -> Duration;

    /// Pull the next packet in decode order.
    ///
    /// Returns `Ok(None)` once the container is drained. Any error other
    /// than end-of-stream is reported through `Err` and must be surfaced to
    /// the caller unchanged.
    fn read_packet(&mut self) -> Result<Option<Packet>>;

    /// Seek to the given position from the start of the container.
    fn seek(&mut self, position: Duration) -> Result<()>;
}

/// Probes and opens containers on demand.
pub trait DemuxerOpener {
    /// Probe and open the container at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn Demuxer>>;

    /// Whether the host can decode packets of this stream.
    ///
    /// Streams rejected here still occupy their index in the published
    /// stream table; only their packets are withheld.
    fn supports(&self, _stream: &StreamInfo) -> bool {
        true
    }
}
