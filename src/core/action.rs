//! Player-facing actions and their history.
//!
//! Every accepted action is recorded with the tick it happened on, counted
//! from the start of its game, so a game can be replayed from its seed:
//!
//! ```
//! use memory_pairs::cards::CardId;
//! use memory_pairs::core::{Action, ActionRecord};
//!
//! let record = ActionRecord::new(Action::Select(CardId::new(3)), 4, 0);
//! assert_eq!(record.action.card(), Some(CardId::new(3)));
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Something the host asks the engine to do within a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Turn a card face-up.
    Select(CardId),
    /// Move the logical clock forward.
    Advance(u64),
}

impl Action {
    /// The card this action targets, if any.
    #[must_use]
    pub fn card(&self) -> Option<CardId> {
        match self {
            Action::Select(id) => Some(*id),
            Action::Advance(_) => None,
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The action taken.
    pub action: Action,

    /// Ticks since the game started.
    pub tick: u64,

    /// Position in the game's history (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(action: Action, tick: u64, sequence: u32) -> Self {
        Self {
            action,
            tick,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_card() {
        assert_eq!(Action::Select(CardId::new(1)).card(), Some(CardId::new(1)));
        assert_eq!(Action::Advance(3).card(), None);
    }

    #[test]
    fn test_record_serde() {
        let record = ActionRecord::new(Action::Advance(2), 10, 5);
        let json = serde_json::to_string(&record).unwrap();
        let back: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
