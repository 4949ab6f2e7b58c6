//! Deferred transition tests.
//!
//! Preview end, miss flip-back, and milestone clear all run on the
//! engine's logical clock. These tests pin down when they fire and that a
//! superseded game's timers never touch a newer game.

use std::cell::RefCell;
use std::rc::Rc;

use memory_pairs::{CardId, CardStatus, EngineConfig, FaceId, GameEngine, GameEvent, GameState};

fn engine(config: EngineConfig) -> GameEngine {
    GameEngine::new(config.with_seed(21)).unwrap()
}

fn pair(state: &GameState, face: u32) -> (CardId, CardId) {
    let ids: Vec<CardId> = state
        .cards()
        .filter(|c| c.face == FaceId::new(face))
        .map(|c| c.id)
        .collect();
    (ids[0], ids[1])
}

// =============================================================================
// Preview
// =============================================================================

#[test]
fn test_preview_fires_once_at_three_ticks() {
    let mut engine = engine(EngineConfig::new());
    let events = Rc::new(RefCell::new(0));
    let counter = events.clone();
    engine.subscribe(move |e| {
        if matches!(e, GameEvent::PreviewEnded { .. }) {
            *counter.borrow_mut() += 1;
        }
    });

    engine.new_game(&FaceId::range(3)).unwrap();
    engine.advance(1);
    engine.advance(1);
    assert!(engine.state().unwrap().reveal_all_temporarily());
    engine.advance(1);
    assert!(!engine.state().unwrap().reveal_all_temporarily());
    engine.advance(10);

    assert_eq!(*events.borrow(), 1);
}

/// A stale preview timer must not end a newer game's preview early.
#[test]
fn test_stale_preview_does_not_hide_new_game() {
    let mut engine = engine(EngineConfig::new());
    engine.new_game(&FaceId::range(3)).unwrap();
    engine.advance(2);

    // Old preview would have been due at tick 3, new one is due at tick 5
    let new_game = engine.new_game(&FaceId::range(3)).unwrap().game();
    assert_eq!(engine.pending(), 1);
    let state = engine.advance(1).unwrap();
    assert_eq!(state.game(), new_game);
    assert!(state.reveal_all_temporarily());

    let state = engine.advance(2).unwrap();
    assert!(!state.reveal_all_temporarily());
}

// =============================================================================
// Miss flip-back
// =============================================================================

#[test]
fn test_miss_stays_visible_until_delay() {
    let mut engine = engine(EngineConfig::new().with_mismatch_ticks(2));
    let state = engine.new_game(&FaceId::range(4)).unwrap().clone();
    let (a, _) = pair(&state, 0);
    let (b, _) = pair(&state, 1);

    engine.select_card(a).unwrap();
    engine.select_card(b).unwrap();

    let state = engine.advance(1).unwrap();
    assert_eq!(state.card(a).unwrap().status, CardStatus::Revealed);
    assert_eq!(state.selection(), &[a, b]);

    let state = engine.advance(1).unwrap();
    assert_eq!(state.card(a).unwrap().status, CardStatus::FaceDown);
    assert_eq!(state.card(b).unwrap().status, CardStatus::FaceDown);
    assert!(state.selection().is_empty());
}

/// `new_game` mid-miss: the old flip-back must not touch the new deck.
#[test]
fn test_stale_flip_back_ignored_after_new_game() {
    let mut engine = engine(EngineConfig::new());
    let old = engine.new_game(&FaceId::range(4)).unwrap().clone();
    let (a, _) = pair(&old, 0);
    let (b, _) = pair(&old, 1);
    engine.select_card(a).unwrap();
    engine.select_card(b).unwrap();

    // Same ids exist in the new deck; reveal the same two cards there
    engine.new_game(&FaceId::range(4)).unwrap();
    engine.select_card(a).unwrap();
    let before = engine.state().unwrap().clone();
    assert_eq!(before.selection(), &[a]);

    let state = engine.advance(1).unwrap();
    assert_eq!(state.card(a).unwrap().status, CardStatus::Revealed);
    assert_eq!(state.selection(), &[a]);
    assert!(state.invariants_hold());
}

#[test]
fn test_zero_mismatch_delay_resolves_immediately() {
    let mut engine = engine(EngineConfig::new().with_mismatch_ticks(0));
    let state = engine.new_game(&FaceId::range(4)).unwrap().clone();
    let (a, _) = pair(&state, 0);
    let (b, _) = pair(&state, 1);

    engine.select_card(a).unwrap();
    let state = engine.select_card(b).unwrap();

    assert!(state.selection().is_empty());
    assert!(!state.card(a).unwrap().is_revealed());
    assert_eq!(state.attempts(), 1);
}

// =============================================================================
// Milestone
// =============================================================================

#[test]
fn test_milestone_at_ten_pairs_clears_after_five_ticks() {
    let mut engine = engine(EngineConfig::new());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    engine.subscribe(move |e| {
        if matches!(
            e,
            GameEvent::MilestoneReached { .. } | GameEvent::MilestoneCleared { .. }
        ) {
            sink.borrow_mut().push(e.clone());
        }
    });

    let state = engine.new_game(&FaceId::range(12)).unwrap().clone();
    let game = state.game();
    for face in 0..10 {
        let (x, y) = pair(&state, face);
        engine.select_card(x).unwrap();
        engine.select_card(y).unwrap();
        if face < 9 {
            assert!(!engine.state().unwrap().celebrating());
        }
    }
    assert!(engine.state().unwrap().celebrating());

    engine.advance(4);
    assert!(engine.state().unwrap().celebrating());
    engine.advance(1);
    assert!(!engine.state().unwrap().celebrating());

    assert_eq!(
        *events.borrow(),
        vec![
            GameEvent::MilestoneReached { game, score: 10 },
            GameEvent::MilestoneCleared { game },
        ]
    );
}

#[test]
fn test_stale_milestone_clear_ignored() {
    let mut engine = engine(EngineConfig::new().with_milestone_score(1).with_milestone_ticks(5));
    let state = engine.new_game(&FaceId::range(3)).unwrap().clone();
    let (x, y) = pair(&state, 0);
    engine.select_card(x).unwrap();
    engine.select_card(y).unwrap();
    assert!(engine.state().unwrap().celebrating());

    // The new game reaches its own milestone at tick 2
    let state = engine.new_game(&FaceId::range(3)).unwrap().clone();
    engine.advance(2);
    let (x, y) = pair(&state, 1);
    engine.select_card(x).unwrap();
    engine.select_card(y).unwrap();

    // Old clear would have been due at 5, new one is due at 7
    assert!(engine.advance(3).unwrap().celebrating());
    assert!(!engine.advance(2).unwrap().celebrating());
}
