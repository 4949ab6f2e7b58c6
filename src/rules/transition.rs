//! Pure state transitions.
//!
//! Every function here takes the current `GameState` by reference and
//! returns the next one inside a `Transition`, together with the events it
//! produced and any work that must wait for the clock. The input state is
//! never modified; thanks to `im` the copy is O(1).
//!
//! ```text
//! turn:  Idle(0) ──select──▶ OneSelected(1) ──select──▶ Resolving(2)
//!          ▲                                               │
//!          ├──────────────── match (immediate) ◀───────────┤
//!          └──────────────── miss (after delay) ◀──────────┘
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardStatus, FaceId};
use crate::core::{Action, EngineConfig, EngineError, GameId, GameRng, GameState, Result};
use crate::events::GameEvent;
use crate::schedule::{Deferred, DeferredKind};

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Two cards are already face-up and unresolved.
    SelectionFull,
    /// The card is already face-up in the current turn.
    AlreadyRevealed,
    /// The card belongs to a found pair.
    AlreadyMatched,
}

/// What a selection did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectOutcome {
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// First card of a turn turned face-up.
    Revealed,
    /// Second card completed a pair.
    Matched,
    /// Second card did not match; flip-back is scheduled.
    Missed,
}

impl SelectOutcome {
    /// Did the selection change state?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SelectOutcome::Ignored(_))
    }
}

/// Result of applying one transition.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The next state.
    pub state: GameState,

    /// Events produced, in order.
    pub events: Vec<GameEvent>,

    /// Work to schedule: `(delay in ticks, what to do)`.
    pub deferred: Vec<(u64, DeferredKind)>,
}

impl Transition {
    fn unchanged(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            deferred: Vec::new(),
        }
    }
}

/// Deal a new game and open the preview window.
pub fn new_game(
    game: GameId,
    faces: &[FaceId],
    rng: &mut GameRng,
    config: &EngineConfig,
) -> Result<Transition> {
    let state = GameState::deal(game, faces, rng)?;
    let events = vec![GameEvent::GameStarted {
        game,
        cards: state.len(),
    }];

    Ok(Transition {
        state,
        events,
        deferred: vec![(config.preview_ticks, DeferredKind::EndPreview)],
    })
}

/// Select a card.
///
/// Returns `UnknownCard` if `id` is not in the deck. Selections that arrive
/// at the wrong moment return `SelectOutcome::Ignored` with the state
/// unchanged.
pub fn select_card(
    state: &GameState,
    id: CardId,
    config: &EngineConfig,
    tick: u64,
) -> Result<(SelectOutcome, Transition)> {
    let card = *state.card(id).ok_or(EngineError::UnknownCard(id))?;

    let ignored = if state.selection.len() >= 2 {
        Some(IgnoreReason::SelectionFull)
    } else if card.is_matched() {
        Some(IgnoreReason::AlreadyMatched)
    } else if card.is_revealed() {
        Some(IgnoreReason::AlreadyRevealed)
    } else {
        None
    };
    if let Some(reason) = ignored {
        debug!("{}: ignoring select of {} ({:?})", state.game, id, reason);
        return Ok((SelectOutcome::Ignored(reason), Transition::unchanged(state)));
    }

    let game = state.game;
    let mut next = state.clone();
    let mut events = vec![GameEvent::CardRevealed { game, card: id }];
    let mut deferred = Vec::new();

    next.set_status(id, CardStatus::Revealed);
    next.selection.push(id);
    next.record(Action::Select(id), tick);

    if next.selection.len() < 2 {
        return Ok((
            SelectOutcome::Revealed,
            Transition {
                state: next,
                events,
                deferred,
            },
        ));
    }

    next.attempts += 1;
    let (first, second) = (next.selection[0], next.selection[1]);
    let paired = next.card(first).is_some_and(|c| c.pairs_with(&card));

    let outcome = if paired {
        next.set_status(first, CardStatus::Matched);
        next.set_status(second, CardStatus::Matched);
        next.selection.clear();

        let previous = next.score;
        next.score += 1;
        debug!("{}: matched {} and {} (score {})", game, first, second, next.score);

        events.push(GameEvent::PairMatched {
            game,
            first,
            second,
        });
        events.push(GameEvent::ScoreChanged {
            game,
            score: next.score,
        });

        if previous < config.milestone_score && next.score >= config.milestone_score {
            next.celebrating = true;
            events.push(GameEvent::MilestoneReached {
                game,
                score: next.score,
            });
            deferred.push((config.milestone_ticks, DeferredKind::ClearMilestone));
        }

        next.refresh_is_over();
        if next.is_over {
            events.push(GameEvent::GameOver {
                game,
                attempts: next.attempts,
                score: next.score,
            });
        }
        SelectOutcome::Matched
    } else {
        debug!("{}: missed {} and {}", game, first, second);
        events.push(GameEvent::PairMissed {
            game,
            first,
            second,
        });
        deferred.push((
            config.mismatch_ticks,
            DeferredKind::HideMismatch {
                cards: [first, second],
            },
        ));
        SelectOutcome::Missed
    };

    Ok((
        outcome,
        Transition {
            state: next,
            events,
            deferred,
        },
    ))
}

/// Apply a deferred transition that has come due.
///
/// Returns `None` when the entry was scheduled for a different game: a
/// superseded game's timers never touch the current state.
#[must_use]
pub fn apply_deferred(state: &GameState, entry: &Deferred) -> Option<Transition> {
    if entry.game != state.game {
        return None;
    }

    let game = state.game;
    let mut next = state.clone();
    let mut events = Vec::new();

    match entry.kind {
        DeferredKind::EndPreview => {
            if next.reveal_all_temporarily {
                next.reveal_all_temporarily = false;
                events.push(GameEvent::PreviewEnded { game });
            }
        }
        DeferredKind::HideMismatch { cards } => {
            let mut hidden = Vec::with_capacity(2);
            for id in cards {
                let still_revealed = next
                    .card(id)
                    .is_some_and(|c| c.status == CardStatus::Revealed);
                if still_revealed {
                    next.set_status(id, CardStatus::FaceDown);
                    hidden.push(id);
                }
            }
            next.selection.clear();
            if !hidden.is_empty() {
                events.push(GameEvent::CardsHidden {
                    game,
                    cards: hidden,
                });
            }
        }
        DeferredKind::ClearMilestone => {
            if next.celebrating {
                next.celebrating = false;
                events.push(GameEvent::MilestoneCleared { game });
            }
        }
    }

    next.refresh_is_over();
    Some(Transition {
        state: next,
        events,
        deferred: Vec::new(),
    })
}

/// Cards a selection would currently act on.
///
/// Empty while a miss is showing or once the game is over.
#[must_use]
pub fn legal_selections(state: &GameState) -> Vec<CardId> {
    if state.selection.len() >= 2 {
        return Vec::new();
    }
    state
        .cards()
        .filter(|c| c.status == CardStatus::FaceDown)
        .map(|c| c.id)
        .collect()
}
