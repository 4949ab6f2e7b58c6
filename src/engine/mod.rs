//! Engine facade: owns the game, drives the clock, notifies observers.

mod game_engine;

pub use game_engine::GameEngine;
