//! Game rules as pure transitions.
//!
//! The rules decide:
//! - Which selections are legal
//! - How a selection changes the state
//! - What happens when deferred work comes due
//!
//! They never hold state or talk to observers; `GameEngine` does that.

pub mod transition;

pub use transition::{
    apply_deferred, legal_selections, new_game, select_card, IgnoreReason, SelectOutcome,
    Transition,
};
