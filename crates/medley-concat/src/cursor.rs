//! The cursor state machine driving member-to-member handoff.
//!
//! Transitions are pure functions over [`CursorState`]; binding, stream
//! remapping and the actual reads happen in the source façade. That keeps
//! the handoff protocol testable without any I/O.

/// Playback position within the member sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No packet has been requested yet.
    Idle,
    /// Member `i` is the active read target.
    Active(usize),
    /// The last member has been drained. Terminal for forward playback;
    /// every further read reports end-of-stream. Only an explicit seek
    /// leaves this state.
    Exhausted,
}

impl CursorState {
    /// Whether the sequence is drained.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, CursorState::Exhausted)
    }

    /// Index of the active member, if any.
    pub fn active_entry(&self) -> Option<usize> {
        match self {
            CursorState::Active(i) => Some(*i),
            _ => None,
        }
    }

    /// Transition on the first packet request.
    #[must_use]
    pub fn on_first_read(self) -> CursorState {
        match self {
            CursorState::Idle => CursorState::Active(0),
            other => other,
        }
    }

    /// Transition on an end-of-member signal from the active member.
    ///
    /// `last_index` is the index of the final member in the sequence.
    #[must_use]
    pub fn on_end_of_entry(self, last_index: usize) -> CursorState {
        match self {
            CursorState::Active(i) if i < last_index => CursorState::Active(i + 1),
            CursorState::Active(_) => CursorState::Exhausted,
            other => other,
        }
    }

    /// Transition on an explicit seek to `target`.
    #[must_use]
    pub fn on_seek(self, target: usize) -> CursorState {
        CursorState::Active(target)
    }
}
