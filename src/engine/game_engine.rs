//! The game engine facade.
//!
//! `GameEngine` owns everything mutable: the current `GameState`, the RNG,
//! the logical clock with its deferred transitions, and the event bus.
//! Each public call runs to completion before returning, so the single
//! state is never observed half-updated.

use log::{debug, info, trace};

use crate::cards::{CardId, FaceId};
use crate::core::{
    Action, ActionRecord, EngineConfig, EngineError, GameId, GameRng, GameState, Result,
};
use crate::events::{EventBus, GameEvent, SubscriptionId};
use crate::rules::{self, SelectOutcome, Transition};
use crate::schedule::{Deferred, DeferredKind, Schedule};

/// Single-game pairs engine.
///
/// ## Example
///
/// ```
/// use memory_pairs::cards::FaceId;
/// use memory_pairs::engine::GameEngine;
/// use memory_pairs::core::EngineConfig;
///
/// let mut engine = GameEngine::new(EngineConfig::new().with_seed(1)).unwrap();
/// let state = engine.new_game(&FaceId::range(4)).unwrap();
/// assert_eq!(state.len(), 8);
/// assert!(state.reveal_all_temporarily());
///
/// // Preview ends after three ticks
/// let state = engine.advance(3).unwrap();
/// assert!(!state.reveal_all_temporarily());
/// ```
pub struct GameEngine {
    config: EngineConfig,
    rng: GameRng,
    schedule: Schedule,
    bus: EventBus,
    state: Option<GameState>,
    next_game: GameId,
    /// Clock tick at which the current game started.
    started_at: u64,
}

impl GameEngine {
    /// Create an engine with the given configuration.
    ///
    /// Fails with `InvalidConfig` if the configuration does not validate.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Build an engine from an already validated configuration.
    fn with_config(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self {
            config,
            rng,
            schedule: Schedule::new(),
            bus: EventBus::new(),
            state: None,
            next_game: GameId::new(1),
            started_at: 0,
        }
    }

    /// Rebuild a game from its seed and recorded history.
    ///
    /// `seed` is `GameState::seed()` of the original game. Ticks in the
    /// history are replayed relative to the new game's start.
    pub fn replay<'a>(
        config: EngineConfig,
        faces: &[FaceId],
        seed: u64,
        history: impl IntoIterator<Item = &'a ActionRecord>,
    ) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.start_game(faces, GameRng::new(seed))?;

        for record in history {
            match record.action {
                Action::Select(id) => {
                    let elapsed = engine.elapsed();
                    if record.tick > elapsed {
                        engine.advance(record.tick - elapsed);
                    }
                    engine.try_select(id)?;
                }
                Action::Advance(ticks) => {
                    engine.advance(ticks);
                }
            }
        }
        Ok(engine)
    }

    // === Observation ===

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current game state, if a game has been started.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Current tick of the logical clock.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.schedule.now()
    }

    /// Ticks since the current game started.
    #[must_use]
    pub fn elapsed(&self) -> u64 {
        self.schedule.now() - self.started_at
    }

    /// Deferred transitions still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.schedule.len()
    }

    /// Cards a selection would currently act on.
    #[must_use]
    pub fn legal_selections(&self) -> Vec<CardId> {
        self.state
            .as_ref()
            .map(rules::legal_selections)
            .unwrap_or_default()
    }

    /// Register an event listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.bus.subscribe(listener)
    }

    /// Remove an event listener. Returns true if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // === Operations ===

    /// Start a new game, replacing any game in progress.
    ///
    /// Deferred work from the previous game is dropped. On error the
    /// current game is left untouched.
    pub fn new_game(&mut self, faces: &[FaceId]) -> Result<&GameState> {
        let rng = self.rng.fork();
        self.start_game(faces, rng)
    }

    /// Select a card, returning the resulting state.
    ///
    /// Selections at the wrong moment (matched card, already revealed card,
    /// two cards already showing) leave the state unchanged.
    pub fn select_card(&mut self, id: CardId) -> Result<&GameState> {
        self.try_select(id)?;
        self.state.as_ref().ok_or(EngineError::NoActiveGame)
    }

    /// Select a card, reporting what the selection did.
    pub fn try_select(&mut self, id: CardId) -> Result<SelectOutcome> {
        let tick = self.elapsed();
        let state = self.state.as_ref().ok_or(EngineError::NoActiveGame)?;
        let (outcome, transition) = rules::select_card(state, id, &self.config, tick)?;

        if outcome.is_accepted() {
            self.commit(transition);
            self.run_due(self.schedule.now());
        }
        Ok(outcome)
    }

    /// Move the clock forward, firing every deferred transition that comes
    /// due on the way.
    ///
    /// Returns the current state, or `None` if no game has been started.
    pub fn advance(&mut self, ticks: u64) -> Option<&GameState> {
        let target = self.schedule.now().saturating_add(ticks);
        trace!("advancing clock {} -> {}", self.schedule.now(), target);

        if ticks > 0 {
            let tick = self.elapsed();
            if let Some(state) = self.state.as_mut() {
                state.record(Action::Advance(ticks), tick);
            }
        }

        self.run_due(target);
        self.schedule.set_now(target);
        self.state.as_ref()
    }

    /// Apply a recorded action.
    pub fn apply(&mut self, action: Action) -> Result<&GameState> {
        match action {
            Action::Select(id) => self.select_card(id),
            Action::Advance(ticks) => self.advance(ticks).ok_or(EngineError::NoActiveGame),
        }
    }

    // === Internals ===

    fn start_game(&mut self, faces: &[FaceId], mut rng: GameRng) -> Result<&GameState> {
        let game = self.next_game;
        let transition = rules::new_game(game, faces, &mut rng, &self.config)?;

        let stale = self.schedule.retain_game(game);
        if let Some(previous) = &self.state {
            if stale > 0 {
                debug!("{} superseded: dropped {} deferred transitions", previous.game(), stale);
            }
        }

        self.next_game = game.next();
        self.started_at = self.schedule.now();
        info!("{} started: {} cards, seed {}", game, transition.state.len(), rng.seed());

        self.commit(transition);
        self.run_due(self.schedule.now());
        self.state.as_ref().ok_or(EngineError::NoActiveGame)
    }

    /// Install a transition's state, queue its deferred work, and publish
    /// its events.
    fn commit(&mut self, transition: Transition) {
        let Transition {
            state,
            events,
            deferred,
        } = transition;
        let game = state.game();

        for (delay, kind) in deferred {
            self.schedule.schedule(game, delay, kind);
        }

        if let Some(GameEvent::GameOver { attempts, score, .. }) = events
            .iter()
            .find(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            info!("{} over: {} pairs in {} attempts", game, score, attempts);
        }

        self.state = Some(state);
        self.bus.publish_all(&events);
    }

    /// Fire every deferred transition due at or before `until`.
    fn run_due(&mut self, until: u64) {
        while let Some(entry) = self.schedule.pop_due(until) {
            self.fire(&entry);
        }
    }

    fn fire(&mut self, entry: &Deferred) {
        let Some(state) = self.state.as_ref() else {
            debug!("dropping {}: no active game", entry.id);
            return;
        };

        match rules::apply_deferred(state, entry) {
            Some(transition) => {
                if let DeferredKind::HideMismatch { cards } = entry.kind {
                    trace!("{}: flip-back of {} and {}", entry.game, cards[0], cards[1]);
                }
                self.commit(transition);
            }
            None => {
                debug!(
                    "dropping stale {} ({:?}) for {}; current is {}",
                    entry.id,
                    entry.kind,
                    entry.game,
                    state.game()
                );
            }
        }
    }
}

impl Default for GameEngine {
    /// Engine with default timings and an entropy seed.
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("now", &self.schedule.now())
            .field("pending", &self.schedule.len())
            .field("game", &self.state.as_ref().map(GameState::game))
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> GameEngine {
        GameEngine::new(EngineConfig::new().with_seed(42)).unwrap()
    }

    fn pair(state: &GameState, face: u32) -> (CardId, CardId) {
        let ids: Vec<CardId> = state
            .cards()
            .filter(|c| c.face == FaceId::new(face))
            .map(|c| c.id)
            .collect();
        (ids[0], ids[1])
    }

    #[test]
    fn test_select_before_new_game() {
        let mut engine = engine();
        assert_eq!(
            engine.select_card(CardId::new(0)).unwrap_err(),
            EngineError::NoActiveGame
        );
        assert!(engine.advance(1).is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GameEngine::new(EngineConfig::new().with_milestone_score(0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_failed_new_game_keeps_current() {
        let mut engine = engine();
        let game = engine.new_game(&FaceId::range(3)).unwrap().game();

        assert_eq!(engine.new_game(&[]).unwrap_err(), EngineError::EmptyFaceSet);
        assert_eq!(engine.state().unwrap().game(), game);
        assert_eq!(engine.state().unwrap().len(), 6);
    }

    #[test]
    fn test_game_ids_increase() {
        let mut engine = engine();
        let first = engine.new_game(&FaceId::range(2)).unwrap().game();
        let second = engine.new_game(&FaceId::range(2)).unwrap().game();
        assert_eq!(second, first.next());
    }

    #[test]
    fn test_preview_ends_after_three_ticks() {
        let mut engine = engine();
        engine.new_game(&FaceId::range(4)).unwrap();

        assert!(engine.advance(2).unwrap().reveal_all_temporarily());
        assert!(!engine.advance(1).unwrap().reveal_all_temporarily());
        assert_eq!(engine.pending(), 0);
    }

    #[test]
    fn test_zero_preview_ends_immediately() {
        let mut engine = GameEngine::new(EngineConfig::new().with_seed(1).with_preview_ticks(0)).unwrap();
        let state = engine.new_game(&FaceId::range(2)).unwrap();
        assert!(!state.reveal_all_temporarily());
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut engine = engine();
        let state = engine.new_game(&FaceId::range(4)).unwrap().clone();
        let (a, _) = pair(&state, 0);
        let (b, _) = pair(&state, 1);

        engine.select_card(a).unwrap();
        let state = engine.select_card(b).unwrap();
        assert_eq!(state.selection(), &[a, b]);

        let state = engine.advance(1).unwrap();
        assert!(state.selection().is_empty());
        assert!(!state.card(a).unwrap().is_revealed());
        assert!(!state.card(b).unwrap().is_revealed());
    }

    #[test]
    fn test_events_published_in_order() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.subscribe(move |e| sink.borrow_mut().push(e.name()));

        let state = engine.new_game(&FaceId::range(2)).unwrap().clone();
        let (a1, a2) = pair(&state, 0);
        engine.select_card(a1).unwrap();
        engine.select_card(a2).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec!["game_started", "card_revealed", "card_revealed", "pair_matched", "score_changed"]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut engine = engine();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = engine.subscribe(move |_| *counter.borrow_mut() += 1);

        engine.new_game(&FaceId::range(2)).unwrap();
        assert!(engine.unsubscribe(id));
        engine.advance(5);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_history_records_relative_ticks() {
        let mut engine = engine();
        engine.new_game(&FaceId::range(2)).unwrap();
        engine.advance(10);

        let state = engine.new_game(&FaceId::range(2)).unwrap().clone();
        let (a, _) = pair(&state, 0);
        engine.advance(2);
        engine.select_card(a).unwrap();

        let history = engine.state().unwrap().history().clone();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].action, Action::Advance(2));
        assert_eq!(history[0].tick, 0);
        assert_eq!(history[1].action, Action::Select(a));
        assert_eq!(history[1].tick, 2);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut engine = engine();
        assert_eq!(
            engine.apply(Action::Advance(1)).unwrap_err(),
            EngineError::NoActiveGame
        );

        let state = engine.new_game(&FaceId::range(2)).unwrap().clone();
        let (a, _) = pair(&state, 1);
        let state = engine.apply(Action::Select(a)).unwrap();
        assert_eq!(state.selection(), &[a]);
    }

    #[test]
    fn test_restarts_drop_superseded_timers() {
        let mut engine = engine();
        for _ in 0..1000 {
            engine.new_game(&FaceId::range(4)).unwrap();
        }
        assert_eq!(engine.pending(), 1);

        // A miss in flight is dropped too
        let state = engine.state().unwrap().clone();
        let (a, _) = pair(&state, 0);
        let (b, _) = pair(&state, 1);
        engine.select_card(a).unwrap();
        engine.select_card(b).unwrap();
        assert_eq!(engine.pending(), 2);

        engine.new_game(&FaceId::range(4)).unwrap();
        assert_eq!(engine.pending(), 1);
    }

    #[test]
    fn test_default_matches_default_config() {
        let engine = GameEngine::default();
        assert_eq!(engine.config(), &EngineConfig::default());
        assert!(engine.state().is_none());
        assert_eq!(engine.now(), 0);
    }

    #[test]
    fn test_debug_output() {
        let engine = engine();
        let text = format!("{engine:?}");
        assert!(text.contains("GameEngine"));
    }
}
