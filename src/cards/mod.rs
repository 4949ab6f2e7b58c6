//! Card types: faces and the cards laid out on the board.
//!
//! - `FaceId`: which picture a card shows (two cards per face)
//! - `Card`: one card with its id, face, and lifecycle status

mod card;
mod face;

pub use card::{Card, CardId, CardStatus};
pub use face::FaceId;
