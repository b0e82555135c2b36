//! # medley-concat
//!
//! Presents an ordered playlist of independently-encoded media files as one
//! logical, continuously-indexed, continuously-timed virtual container.
//!
//! Streams of each member appear at stable global indices, timestamps are
//! continuous across member boundaries, and playback switches from one
//! member to the next without the consumer observing a restart.
//!
//! # Modules
//!
//! - `entry` - playlist members and lazy binding to a demuxer
//! - `map` - prefix-sum maps between local and global coordinates
//! - `cursor` - the state machine driving member-to-member handoff
//! - `source` - the [`VirtualSource`] façade tying it together
//!
//! # Architecture
//!
//! The caller builds a [`medley_playlist::Playlist`] and opens it with a
//! [`medley_demux::DemuxerOpener`]. Opening resolves relative paths, binds
//! the first openable member and publishes its streams. Each pull from
//! [`VirtualSource::read_packet`] forwards to the active member's demuxer;
//! when a member drains, the next one is bound lazily, its streams are
//! remapped into the global table, and reading continues. A member that
//! fails to open is skipped with a recorded warning, never aborting the
//! whole sequence.

pub mod error;

mod cursor;
mod entry;
mod map;
mod source;

pub use cursor::CursorState;
pub use entry::Entry;
pub use error::{ConcatError, Result};
pub use map::ConcatMap;
pub use source::VirtualSource;
