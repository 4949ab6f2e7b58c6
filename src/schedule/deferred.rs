//! Deferred transitions and the queue that holds them.
//!
//! A deferred transition is a state change that must wait for the clock:
//! the end of the preview, the flip-back after a miss, the end of the
//! milestone celebration. Each entry remembers the game it was scheduled
//! for. Starting a game purges every other game's entries, and the engine
//! still compares the id at fire time.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::GameId;

/// Unique identifier for a deferred entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeferredId(pub u64);

impl DeferredId {
    /// Create a new deferred entry ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DeferredId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deferred({})", self.0)
    }
}

/// What a deferred entry does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredKind {
    /// Close the preview window.
    EndPreview,
    /// Turn a missed pair face-down and clear the selection.
    HideMismatch { cards: [CardId; 2] },
    /// End the milestone celebration.
    ClearMilestone,
}

/// A scheduled transition.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Deferred {
    /// Unique id, also the tie-breaker for entries due on the same tick.
    pub id: DeferredId,

    /// The game this entry belongs to.
    pub game: GameId,

    /// Tick at which the entry fires.
    pub due: u64,

    /// The transition to apply.
    pub kind: DeferredKind,
}

impl Deferred {
    fn key(&self) -> (u64, DeferredId) {
        (self.due, self.id)
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Deferred {}

impl PartialOrd for Deferred {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deferred {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Logical clock plus the transitions waiting on it.
///
/// Entries fire in due order; entries due on the same tick fire in the
/// order they were scheduled.
///
/// ```
/// use memory_pairs::core::GameId;
/// use memory_pairs::schedule::{DeferredKind, Schedule};
///
/// let mut schedule = Schedule::new();
/// schedule.schedule(GameId::new(1), 3, DeferredKind::EndPreview);
///
/// assert!(schedule.pop_due(2).is_none());
/// let entry = schedule.pop_due(3).unwrap();
/// assert_eq!(entry.kind, DeferredKind::EndPreview);
/// assert_eq!(schedule.now(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    now: u64,
    queue: BinaryHeap<Reverse<Deferred>>,
    next_id: u64,
}

impl Schedule {
    /// Create an empty schedule at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue a transition `delay` ticks from now.
    pub fn schedule(&mut self, game: GameId, delay: u64, kind: DeferredKind) -> DeferredId {
        let id = DeferredId::new(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Deferred {
            id,
            game,
            due: self.now.saturating_add(delay),
            kind,
        }));
        id
    }

    /// Pop the earliest entry due at or before `until`, moving the clock to
    /// its due tick.
    pub fn pop_due(&mut self, until: u64) -> Option<Deferred> {
        let due = self.queue.peek().map(|Reverse(entry)| entry.due)?;
        if due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry)
    }

    /// Move the clock to `tick` without firing anything.
    ///
    /// Never moves the clock backwards.
    pub fn set_now(&mut self, tick: u64) {
        self.now = self.now.max(tick);
    }

    /// Entries still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Entries still waiting for `game`.
    #[must_use]
    pub fn pending_for(&self, game: GameId) -> usize {
        self.queue.iter().filter(|Reverse(e)| e.game == game).count()
    }

    /// Drop every entry not scheduled for `game`.
    ///
    /// Returns how many entries were removed.
    pub fn retain_game(&mut self, game: GameId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|Reverse(e)| e.game == game);
        before - self.queue.len()
    }

    /// Tick of the next entry, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }
}
