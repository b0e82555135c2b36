//! The virtual concatenated source façade.

use std::time::Duration;

use medley_demux::{DemuxerOpener, Packet, StreamInfo};
use medley_playlist::Playlist;

use crate::cursor::CursorState;
use crate::entry::Entry;
use crate::error::{ConcatError, Result};
use crate::map::ConcatMap;

/// An ordered playlist of media files presented as one virtual container.
///
/// The source is pull-based and single-owner: every operation blocks the
/// caller until the underlying demuxer finishes, and concurrent use from
/// multiple threads requires external serialization.
///
/// Members are bound lazily. Opening binds only the first openable member;
/// later members are bound when playback reaches them or a seek needs
/// their durations. A member that fails to open contributes zero streams
/// and zero duration and is skipped with a recorded warning.
pub struct VirtualSource<O: DemuxerOpener> {
    opener: O,
    entries: Vec<Entry>,
    map: ConcatMap,
    cursor: CursorState,
    /// Global stream table, in member order.
    streams: Vec<StreamInfo>,
    /// Per global stream: whether packets are delivered. Streams the host
    /// cannot decode stay in the table but their packets are withheld.
    enabled: Vec<bool>,
}

impl<O: DemuxerOpener> VirtualSource<O> {
    /// Open a playlist as a single virtual container.
    ///
    /// Resolves relative member paths, binds the first openable member and
    /// publishes its streams as the initial global stream table. Fails with
    /// [`ConcatError::InvalidInput`] for an empty playlist and
    /// [`ConcatError::OpenFailure`] when every member fails to open.
    pub fn open(mut playlist: Playlist, opener: O) -> Result<Self> {
        if playlist.is_empty() {
            return Err(ConcatError::invalid("playlist has no members"));
        }
        playlist.resolve_paths();

        let entries: Vec<Entry> = playlist
            .iter()
            .map(|path| Entry::new(path.to_path_buf()))
            .collect();
        let mut source = Self {
            opener,
            entries,
            map: ConcatMap::new(),
            cursor: CursorState::Idle,
            streams: Vec::new(),
            enabled: Vec::new(),
        };

        let mut first_open = None;
        for index in 0..source.entries.len() {
            if source.activate(index) {
                first_open = Some(index);
                break;
            }
        }
        match first_open {
            Some(index) => {
                tracing::debug!(
                    members = source.entries.len(),
                    first = index,
                    "opened virtual source"
                );
                Ok(source)
            }
            None => {
                tracing::warn!(
                    members = source.entries.len(),
                    "every playlist member failed to open"
                );
                Err(ConcatError::OpenFailure {
                    path: source.entries[0].path().to_path_buf(),
                })
            }
        }
    }

    /// The global stream table published so far.
    ///
    /// Grows as later members are bound; indices already published are
    /// stable.
    pub fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    /// Best-known total duration in milliseconds.
    ///
    /// Sums the durations of members bound so far; with lazy binding this
    /// is a partial sum that only grows, exact once the playlist has been
    /// traversed to the end.
    pub fn duration_ms(&self) -> i64 {
        self.map.total_duration_ms()
    }

    /// The local/global coordinate map built so far.
    pub fn map(&self) -> &ConcatMap {
        &self.map
    }

    /// Current cursor state.
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Number of playlist members.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Member at `index`.
    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Pull the next packet of the merged sequence.
    ///
    /// The packet's stream index is global and its timestamp is on the
    /// merged timeline. When the active member drains, the next member is
    /// bound and reading continues there; `Ok(None)` is returned once the
    /// last member has been drained. Read errors from the active member's
    /// demuxer are passed through unchanged.
    pub fn read_packet(&mut self) -> Result<Option<Packet>> {
        loop {
            match self.cursor {
                CursorState::Idle => {
                    self.cursor = self.cursor.on_first_read();
                }
                CursorState::Exhausted => return Ok(None),
                CursorState::Active(index) => {
                    if !self.activate(index) {
                        self.cursor = self.cursor.on_end_of_entry(self.last_index());
                        continue;
                    }
                    let stream_offset = self.map.stream_offset(index);
                    let time_offset = self.map.time_offset_ms(index);
                    let Some(demuxer) = self.entries[index].demuxer_mut() else {
                        self.cursor = self.cursor.on_end_of_entry(self.last_index());
                        continue;
                    };
                    match demuxer.read_packet()? {
                        Some(mut packet) => {
                            let global = stream_offset + packet.stream_index;
                            if !self.enabled.get(global).copied().unwrap_or(false) {
                                continue;
                            }
                            packet.stream_index = global;
                            packet.pts_ms += time_offset;
                            return Ok(Some(packet));
                        }
                        None => {
                            self.entries[index].release();
                            tracing::debug!(member = index, "member drained, advancing");
                            self.cursor = self.cursor.on_end_of_entry(self.last_index());
                        }
                    }
                }
            }
        }
    }

    /// Seek to a position on the merged timeline, in milliseconds.
    ///
    /// Members are bound forward as needed until the timeline covers the
    /// target. A target at or past the total known duration clamps the
    /// source to end-of-stream and reports
    /// [`ConcatError::SeekOutOfRange`]; the next read then returns
    /// `Ok(None)` and the error is safe to ignore.
    pub fn seek(&mut self, timestamp_ms: i64) -> Result<()> {
        let target_ms = timestamp_ms.max(0);

        // Bind forward until the merged timeline covers the target or the
        // member list runs out. Handles of members we pass over are
        // released right away; their metadata stays.
        while self.map.total_duration_ms() <= target_ms
            && self.map.entry_count() < self.entries.len()
        {
            let next = self.map.entry_count();
            if self.activate(next) {
                self.entries[next].release();
            }
        }

        let total_ms = self.map.total_duration_ms();
        let resolved = if target_ms < total_ms {
            self.map.resolve_time(target_ms)
        } else {
            None
        };
        let Some((target, local_ms)) = resolved else {
            self.cursor = CursorState::Exhausted;
            tracing::debug!(
                requested_ms = target_ms,
                duration_ms = total_ms,
                "seek past end, clamping to end-of-stream"
            );
            return Err(ConcatError::SeekOutOfRange {
                requested_ms: target_ms,
                duration_ms: total_ms,
            });
        };

        if let Some(current) = self.cursor.active_entry() {
            if current != target {
                self.entries[current].release();
            }
        }
        self.entries[target].bind(&self.opener)?;
        match self.entries[target].demuxer_mut() {
            Some(demuxer) => demuxer.seek(Duration::from_millis(local_ms as u64))?,
            None => {
                return Err(ConcatError::OpenFailure {
                    path: self.entries[target].path().to_path_buf(),
                })
            }
        }
        self.cursor = self.cursor.on_seek(target);
        tracing::debug!(member = target, local_ms, "seek");
        Ok(())
    }

    fn last_index(&self) -> usize {
        self.entries.len() - 1
    }

    /// Bind `index` and publish it into the coordinate map and stream
    /// table. Returns whether the member is usable as a read target; a
    /// member that fails to open is published as zero streams and zero
    /// duration.
    fn activate(&mut self, index: usize) -> bool {
        if self.entries[index].is_failed() {
            self.publish(index);
            return false;
        }
        let usable = self.entries[index].bind(&self.opener).is_ok();
        self.publish(index);
        usable
    }

    /// Incorporate member `index` into the prefix sums and the global
    /// stream table. Members are published once, in playlist order.
    fn publish(&mut self, index: usize) {
        if index < self.map.entry_count() {
            return;
        }
        debug_assert_eq!(index, self.map.entry_count());

        let entry = &self.entries[index];
        let stream_count = entry.stream_count();
        let duration_ms = entry.duration_ms();
        let member_streams: Vec<StreamInfo> = entry.streams().to_vec();
        let offset = self.map.total_streams();

        self.map.push(stream_count, duration_ms);
        for (local, info) in member_streams.into_iter().enumerate() {
            let supported = self.opener.supports(&info);
            if !supported {
                let reason = ConcatError::DecoderUnavailable {
                    stream: offset + local,
                    codec: info.codec.clone(),
                };
                tracing::warn!(%reason, "dropping packets for undecodable stream");
            }
            self.streams.push(info);
            self.enabled.push(supported);
        }
    }
}

impl<O: DemuxerOpener> std::fmt::Debug for VirtualSource<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualSource")
            .field("entries", &self.entries)
            .field("map", &self.map)
            .field("cursor", &self.cursor)
            .field("streams", &self.streams)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
