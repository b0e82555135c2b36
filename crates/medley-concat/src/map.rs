//! Prefix-sum maps between local and global coordinates.
//!
//! Every bound member contributes its stream count and duration to two
//! cumulative tables. The tables give each member's starting offset in the
//! merged stream-index space and on the merged timeline, which makes the
//! local/global translations pure arithmetic.

/// Prefix-sum tables over member stream counts and durations.
///
/// Both tables have length `member_count + 1` with index 0 fixed at 0, and
/// are monotonically nondecreasing. Lookups scan linearly; playlists are
/// small and O(member count) is acceptable.
#[derive(Debug, Clone)]
pub struct ConcatMap {
    /// `cumulative_streams[i]` = total streams of members `0..i`.
    cumulative_streams: Vec<usize>,
    /// `cumulative_durations[i]` = total duration of members `0..i`, in ms.
    cumulative_durations: Vec<i64>,
}

impl ConcatMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            cumulative_streams: vec![0],
            cumulative_durations: vec![0],
        }
    }

    /// Number of members incorporated so far.
    pub fn entry_count(&self) -> usize {
        self.cumulative_streams.len() - 1
    }

    /// Append one member's stream count and duration.
    pub fn push(&mut self, stream_count: usize, duration_ms: i64) {
        let streams = self.total_streams() + stream_count;
        let duration = self.total_duration_ms() + duration_ms.max(0);
        self.cumulative_streams.push(streams);
        self.cumulative_durations.push(duration);
    }

    /// Recompute both tables from scratch.
    pub fn rebuild<I>(&mut self, members: I)
    where
        I: IntoIterator<Item = (usize, i64)>,
    {
        self.cumulative_streams = vec![0];
        self.cumulative_durations = vec![0];
        for (stream_count, duration_ms) in members {
            self.push(stream_count, duration_ms);
        }
    }

    /// Total stream count across incorporated members.
    pub fn total_streams(&self) -> usize {
        *self.cumulative_streams.last().unwrap_or(&0)
    }

    /// Total duration across incorporated members, in milliseconds.
    pub fn total_duration_ms(&self) -> i64 {
        *self.cumulative_durations.last().unwrap_or(&0)
    }

    /// Starting offset of `member` in the merged stream-index space.
    pub fn stream_offset(&self, member: usize) -> usize {
        self.cumulative_streams[member]
    }

    /// Global index of stream `local` within `member`.
    pub fn global_stream_index(&self, member: usize, local: usize) -> usize {
        self.cumulative_streams[member] + local
    }

    /// Member owning the given global stream index.
    ///
    /// Returns the smallest `i` with
    /// `cumulative_streams[i] <= global < cumulative_streams[i + 1]`, or
    /// `None` when `global` is out of range.
    pub fn entry_from_global_stream(&self, global: usize) -> Option<usize> {
        if global >= self.total_streams() {
            return None;
        }
        (0..self.entry_count()).find(|&i| global < self.cumulative_streams[i + 1])
    }

    /// Local index of the given global stream within its owning member.
    pub fn local_stream_index(&self, global: usize) -> Option<usize> {
        let member = self.entry_from_global_stream(global)?;
        Some(global - self.cumulative_streams[member])
    }

    /// Starting offset of `member` on the merged timeline, in milliseconds.
    pub fn time_offset_ms(&self, member: usize) -> i64 {
        self.cumulative_durations[member]
    }

    /// Resolve a merged-timeline timestamp to `(member, local timestamp)`.
    ///
    /// A timestamp exactly on a member boundary belongs to the *following*
    /// member. Negative timestamps clamp to zero. Timestamps past the last
    /// boundary clamp to the last member; the returned local timestamp then
    /// exceeds that member's duration and the caller decides what to do
    /// with it. Returns `None` when no member has been incorporated.
    pub fn resolve_time(&self, t_ms: i64) -> Option<(usize, i64)> {
        let t_ms = t_ms.max(0);
        let count = self.entry_count();
        if count == 0 {
            return None;
        }
        let member = (0..count)
            .find(|&i| t_ms < self.cumulative_durations[i + 1])
            .unwrap_or(count - 1);
        Some((member, t_ms - self.cumulative_durations[member]))
    }
}

impl Default for ConcatMap {
    fn default() -> Self {
        Self::new()
    }
}
