//! Demuxed packets.

use bytes::Bytes;

/// One demuxed packet from a single container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Index of the stream this packet belongs to, local to its container.
    pub stream_index: usize,
    /// Presentation timestamp in milliseconds.
    pub pts_ms: i64,
    /// Encoded payload.
    pub data: Bytes,
}

impl Packet {
    /// Create a packet.
    pub fn new(stream_index: usize, pts_ms: i64, data: impl Into<Bytes>) -> Self {
        Self {
            stream_index,
            pts_ms,
            data: data.into(),
        }
    }
}
