//! # memory-pairs
//!
//! Engine for a memory-matching ("pairs") card game: a deck holding two
//! copies of each face is shuffled face-down, the player turns over two
//! cards per turn, found pairs stay up, misses flip back, and the game ends
//! when every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Free**: No rendering, layout, or asset lookup. Faces
//!    are opaque ids; hosts draw from `GameState` and `GameEvent`s.
//!
//! 2. **Pure Transitions**: `rules` maps a state to the next state without
//!    mutating its input. `GameEngine` only commits results.
//!
//! 3. **Logical Time**: Delays are deferred transitions on a tick clock the
//!    host advances. Each one is tagged with its game and becomes a no-op
//!    once that game is replaced.
//!
//! ## Modules
//!
//! - `cards`: Card ids, faces, and card status
//! - `core`: State, actions, RNG, configuration, errors
//! - `rules`: Selection and deferred-transition logic
//! - `schedule`: Logical clock and deferred transition queue
//! - `events`: Event types and the observer bus
//! - `engine`: `GameEngine`, the facade hosts talk to

pub mod cards;
pub mod core;
pub mod engine;
pub mod events;
pub mod rules;
pub mod schedule;

// Re-export commonly used types
pub use crate::cards::{Card, CardId, CardStatus, FaceId};

pub use crate::core::{
    Action, ActionRecord, EngineConfig, EngineError, GameId, GameRng, GameRngState, GameState,
    Result, Selection,
};

pub use crate::engine::GameEngine;

pub use crate::events::{EventBus, GameEvent, Listener, SubscriptionId};

pub use crate::rules::{IgnoreReason, SelectOutcome, Transition};

pub use crate::schedule::{Deferred, DeferredId, DeferredKind, Schedule};
