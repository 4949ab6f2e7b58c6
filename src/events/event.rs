//! Game event types.
//!
//! Events describe what changed, not how to draw it. Every event carries
//! the `GameId` it belongs to so observers can ignore stragglers from a
//! game they have already torn down.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::GameId;

/// Something that happened in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh deck was dealt and the preview window opened.
    GameStarted { game: GameId, cards: usize },

    /// The preview window closed; unrevealed cards are now shown face-down.
    PreviewEnded { game: GameId },

    /// A card was turned face-up by a selection.
    CardRevealed { game: GameId, card: CardId },

    /// The two selected cards share a face and are now matched.
    PairMatched {
        game: GameId,
        first: CardId,
        second: CardId,
    },

    /// The two selected cards differ; they flip back after the miss delay.
    PairMissed {
        game: GameId,
        first: CardId,
        second: CardId,
    },

    /// Cards turned face-down after a miss.
    CardsHidden { game: GameId, cards: Vec<CardId> },

    /// The score changed.
    ScoreChanged { game: GameId, score: u32 },

    /// The score reached the milestone threshold.
    MilestoneReached { game: GameId, score: u32 },

    /// The milestone celebration ended.
    MilestoneCleared { game: GameId },

    /// Every pair has been found.
    GameOver {
        game: GameId,
        attempts: u32,
        score: u32,
    },
}

impl GameEvent {
    /// The game this event belongs to.
    #[must_use]
    pub fn game(&self) -> GameId {
        match self {
            GameEvent::GameStarted { game, .. }
            | GameEvent::PreviewEnded { game }
            | GameEvent::CardRevealed { game, .. }
            | GameEvent::PairMatched { game, .. }
            | GameEvent::PairMissed { game, .. }
            | GameEvent::CardsHidden { game, .. }
            | GameEvent::ScoreChanged { game, .. }
            | GameEvent::MilestoneReached { game, .. }
            | GameEvent::MilestoneCleared { game }
            | GameEvent::GameOver { game, .. } => *game,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::PreviewEnded { .. } => "preview_ended",
            GameEvent::CardRevealed { .. } => "card_revealed",
            GameEvent::PairMatched { .. } => "pair_matched",
            GameEvent::PairMissed { .. } => "pair_missed",
            GameEvent::CardsHidden { .. } => "cards_hidden",
            GameEvent::ScoreChanged { .. } => "score_changed",
            GameEvent::MilestoneReached { .. } => "milestone_reached",
            GameEvent::MilestoneCleared { .. } => "milestone_cleared",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}
