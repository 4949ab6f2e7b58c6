//! Logical clock and deferred transitions.
//!
//! Delays in the game (preview, miss flip-back, milestone) are entries on
//! a `Schedule` rather than real timers. The host drives the clock with
//! `GameEngine::advance`, which keeps the engine single-threaded and its
//! timing fully deterministic under test.

mod deferred;

pub use deferred::{Deferred, DeferredId, DeferredKind, Schedule};
