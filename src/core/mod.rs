//! Core engine types: state, actions, RNG, configuration, errors.
//!
//! These are the building blocks every other module works on. Nothing
//! here knows about timing or observers; that lives in `schedule`,
//! `events`, and `engine`.

pub mod action;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use rng::{GameRng, GameRngState};
pub use state::{GameId, GameState, Selection};
