//! # medley-demux
//!
//! The demuxer contract consumed by the medley concat layer.
//!
//! This crate defines the seam between the virtual concatenated source and
//! whatever actually parses containers: a [`Demuxer`] yields packets and
//! stream descriptors for one file, and a [`DemuxerOpener`] probes and opens
//! files on demand. The concat layer never inspects container bytes itself;
//! it drives implementations of these traits.
//!
//! Timestamps and durations crossing this boundary are in milliseconds.

pub mod error;

mod demuxer;
mod packet;
mod stream;

pub use demuxer::{Demuxer, DemuxerOpener};
pub use error::{DemuxError, Result};
pub use packet::Packet;
pub use stream::{MediaKind, StreamInfo};
