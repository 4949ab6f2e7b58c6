//! Observer surface.
//!
//! The engine publishes a `GameEvent` for every observable change. Hosts
//! subscribe to the `EventBus` instead of polling state after each call,
//! though `GameEngine::state()` is always available too.

mod bus;
mod event;

pub use bus::{EventBus, Listener, SubscriptionId};
pub use event::GameEvent;
