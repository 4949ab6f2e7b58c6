//! Game state for one game of pairs.
//!
//! ## GameState
//!
//! - The deck in display order (fixed once dealt)
//! - The current selection (0-2 face-up, unresolved cards)
//! - Attempt and score counters
//! - Game-over, preview, and milestone flags
//! - Action history
//!
//! Uses `im` persistent data structures so a transition can clone the
//! state in O(1), edit the clone, and hand it back without touching the
//! snapshot it started from.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::ActionRecord;
use super::error::{EngineError, Result};
use super::rng::GameRng;
use crate::cards::{Card, CardId, CardStatus, FaceId};

/// Identifies one game instance.
///
/// Each `new_game` gets a fresh id. Deferred work carries the id it was
/// scheduled for and is dropped when the ids no longer agree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id of the game that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Cards currently face-up and unresolved. Never more than two.
pub type Selection = SmallVec<[CardId; 2]>;

/// Complete state of a single game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) game: GameId,

    /// Seed the deck was shuffled with.
    pub(crate) seed: u64,

    /// Cards in display order.
    pub(crate) deck: Vector<Card>,

    pub(crate) selection: Selection,
    pub(crate) attempts: u32,
    pub(crate) score: u32,
    pub(crate) is_over: bool,
    pub(crate) reveal_all_temporarily: bool,
    pub(crate) celebrating: bool,
    pub(crate) history: Vector<ActionRecord>,
}

impl GameState {
    /// Deal a fresh, shuffled deck with two cards per face.
    ///
    /// Card ids are assigned `0..2n` before shuffling, so id order says
    /// nothing about where a card sits on the board.
    ///
    /// ## Errors
    ///
    /// - `EmptyFaceSet` if `faces` is empty
    /// - `DuplicateFace` if any face appears twice
    pub fn deal(game: GameId, faces: &[FaceId], rng: &mut GameRng) -> Result<Self> {
        if faces.is_empty() {
            return Err(EngineError::EmptyFaceSet);
        }

        let mut seen = FxHashSet::default();
        for &face in faces {
            if !seen.insert(face) {
                return Err(EngineError::DuplicateFace(face));
            }
        }

        let mut cards: Vec<Card> = faces
            .iter()
            .chain(faces.iter())
            .enumerate()
            .map(|(i, &face)| Card::new(CardId::new(i as u32), face))
            .collect();
        rng.shuffle(&mut cards);

        Ok(Self {
            game,
            seed: rng.seed(),
            deck: cards.into_iter().collect(),
            selection: Selection::new(),
            attempts: 0,
            score: 0,
            is_over: false,
            reveal_all_temporarily: true,
            celebrating: false,
            history: Vector::new(),
        })
    }

    // === Accessors ===

    /// The game instance this state belongs to.
    #[must_use]
    pub fn game(&self) -> GameId {
        self.game
    }

    /// Seed used to shuffle this game's deck.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Cards in display order.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.deck.iter()
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    /// True only for a state with no cards, which `deal` never produces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.iter().find(|c| c.id == id)
    }

    /// Display position of a card.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.deck.iter().position(|c| c.id == id)
    }

    /// Cards face-up in the current turn, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    /// Completed two-card turns.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Pairs found.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Every card has been matched.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.is_over
    }

    /// The opening preview is still showing every face.
    #[must_use]
    pub fn reveal_all_temporarily(&self) -> bool {
        self.reveal_all_temporarily
    }

    /// The score milestone celebration is active.
    #[must_use]
    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    /// Accepted actions in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    // === Derived ===

    /// Number of cards with status `Matched`.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.deck.iter().filter(|c| c.is_matched()).count()
    }

    /// Pairs still to be found.
    #[must_use]
    pub fn pairs_remaining(&self) -> usize {
        (self.deck.len() - self.matched_count()) / 2
    }

    /// Should the host draw this card's face?
    ///
    /// True when the card is revealed or matched, or while the preview
    /// window shows the whole deck. `None` for an unknown id.
    #[must_use]
    pub fn is_face_visible(&self, id: CardId) -> Option<bool> {
        self.card(id)
            .map(|card| card.is_revealed() || self.reveal_all_temporarily)
    }

    /// Check the structural invariants of the state.
    ///
    /// - selection holds at most two distinct, revealed, unmatched cards
    /// - `score * 2` equals the matched card count
    /// - `is_over` holds exactly when every card is matched
    /// - every face appears on exactly two cards
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        if self.selection.len() > 2 {
            return false;
        }
        if self.selection.len() == 2 && self.selection[0] == self.selection[1] {
            return false;
        }
        let selection_ok = self.selection.iter().all(|&id| {
            self.card(id)
                .is_some_and(|c| c.status == CardStatus::Revealed)
        });
        if !selection_ok {
            return false;
        }

        let matched = self.matched_count();
        if self.score as usize * 2 != matched {
            return false;
        }
        if self.is_over != (matched == self.deck.len()) {
            return false;
        }

        let mut per_face: FxHashMap<FaceId, usize> = FxHashMap::default();
        for card in &self.deck {
            *per_face.entry(card.face).or_default() += 1;
        }
        per_face.values().all(|&n| n == 2)
    }

    // === Mutation (crate-internal, used by transitions) ===

    /// Replace the status of a card. Returns false for an unknown id.
    pub(crate) fn set_status(&mut self, id: CardId, status: CardStatus) -> bool {
        match self.position(id).and_then(|pos| self.deck.get_mut(pos)) {
            Some(card) => {
                *card = card.with_status(status);
                true
            }
            None => false,
        }
    }

    /// Recompute `is_over` from the deck.
    pub(crate) fn refresh_is_over(&mut self) {
        self.is_over = !self.deck.is_empty() && self.matched_count() == self.deck.len();
    }

    /// Append an action to the history.
    pub(crate) fn record(&mut self, action: super::action::Action, tick: u64) {
        let sequence = self.history.len() as u32;
        self.history.push_back(ActionRecord::new(action, tick, sequence));
    }
}
