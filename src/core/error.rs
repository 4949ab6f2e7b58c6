//! Engine errors.
//!
//! Only caller misuse is an error. Selections that arrive at the wrong
//! moment (a matched card, a third card while a miss is showing) are
//! ignored, not rejected.

use thiserror::Error;

use crate::cards::{CardId, FaceId};

/// Invalid arguments passed to the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("face set is empty")]
    EmptyFaceSet,
    #[error("face set contains {0} more than once")]
    DuplicateFace(FaceId),
    #[error("no card with id {0} in the current deck")]
    UnknownCard(CardId),
    #[error("no game has been started")]
    NoActiveGame,
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
