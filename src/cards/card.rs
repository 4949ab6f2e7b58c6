//! Card instances on the board.
//!
//! A card's visible status is a single enum rather than two flags, so a
//! matched card is always also revealed:
//!
//! ```text
//! FaceDown ──select──▶ Revealed ──match──▶ Matched (terminal)
//!     ▲                    │
//!     └──── miss delay ────┘
//! ```

use serde::{Deserialize, Serialize};

use super::face::FaceId;

/// Identifier of a card within one game.
///
/// Ids are allocated sequentially when the deck is built and stay stable
/// until the next game replaces the deck. They do not reflect display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Where a card is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardStatus {
    /// Face hidden; selectable.
    #[default]
    FaceDown,
    /// Face shown as part of the current (unresolved) selection.
    Revealed,
    /// Permanently shown as one half of a found pair.
    Matched,
}

/// A single card in the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the game.
    pub id: CardId,

    /// Which face this card shows.
    pub face: FaceId,

    /// Current lifecycle status.
    pub status: CardStatus,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub const fn new(id: CardId, face: FaceId) -> Self {
        Self {
            id,
            face,
            status: CardStatus::FaceDown,
        }
    }

    /// Is the face currently shown (revealed or matched)?
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        matches!(self.status, CardStatus::Revealed | CardStatus::Matched)
    }

    /// Is this card part of a found pair?
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.status == CardStatus::Matched
    }

    /// Does this card share a face with `other`?
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.face == other.face
    }

    /// Copy of this card with a different status.
    #[must_use]
    pub const fn with_status(mut self, status: CardStatus) -> Self {
        self.status = status;
        self
    }
}
