//! Session host
//!
//! Owns a [`GameState`] and connects it to the outside world: a high score
//! store, and observers for audio, HUD and rendering. The simulation itself
//! knows nothing about any of them.

use crate::highscores::HighScoreStore;
use crate::settings::Settings;
use crate::sim::{
    GameEvent, GamePhase, GameState, Snapshot, SoundCue, TickInput, start_session, tick,
};

/// Listener for simulation output
///
/// All methods default to no-ops so listeners only implement what they need.
pub trait Observer {
    /// Every event raised during a tick, in order
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Sound cues, only delivered while sound is enabled
    fn on_sound(&mut self, _cue: SoundCue) {}

    /// Called once per tick with the post-update state
    fn on_frame(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// A game session bound to its collaborators
pub struct Game<S: HighScoreStore> {
    state: GameState,
    store: S,
    settings: Settings,
    high_score: u64,
    observers: Vec<Box<dyn Observer>>,
}

impl<S: HighScoreStore> Game<S> {
    /// Create a session in the `Ready` phase
    pub fn new(settings: Settings, store: S) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(seed, settings.playfield());
        state.stacking = settings.stacking;
        state.max_particles = settings.max_particles();

        Self {
            state,
            store,
            settings,
            high_score: 0,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Best score known to this host
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Ready -> Playing (also used from GameOver to restart)
    pub fn start(&mut self) {
        self.refresh_high_score();
        start_session(&mut self.state);
    }

    /// GameOver -> Ready -> Playing
    pub fn restart(&mut self) {
        self.state.phase = GamePhase::Ready;
        self.start();
    }

    /// Advance one tick and notify observers
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input);

        for event in &events {
            if *event == GameEvent::GameOver {
                self.record_final_score();
            }
            let cue = event.sound().filter(|_| self.settings.sound_enabled);
            for observer in &mut self.observers {
                observer.on_event(event);
                if let Some(cue) = cue {
                    observer.on_sound(cue);
                }
            }
        }

        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_frame(&snapshot);
        }

        events
    }

    fn refresh_high_score(&mut self) {
        match self.store.load_high_score() {
            Ok(score) => self.high_score = self.high_score.max(score),
            Err(e) => log::warn!(
                "Could not load high score, keeping {}: {}",
                self.high_score,
                e
            ),
        }
    }

    fn record_final_score(&mut self) {
        let score = self.state.score;
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        log::info!("New high score: {}", score);
        if let Err(e) = self.store.save_high_score(score, self.state.level) {
            log::warn!("Could not save high score {}: {}", score, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, StoreError};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store whose every call fails
    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load_high_score(&mut self) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn save_high_score(&mut self, _score: u64, _level: u32) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<GameEvent>,
        sounds: Vec<SoundCue>,
        frames: usize,
    }

    struct Shared(Rc<RefCell<Recorder>>);

    impl Observer for Shared {
        fn on_event(&mut self, event: &GameEvent) {
            self.0.borrow_mut().events.push(*event);
        }

        fn on_sound(&mut self, cue: SoundCue) {
            self.0.borrow_mut().sounds.push(cue);
        }

        fn on_frame(&mut self, _snapshot: &Snapshot<'_>) {
            self.0.borrow_mut().frames += 1;
        }
    }

    fn settings(sound: bool) -> Settings {
        Settings {
            seed: Some(5),
            sound_enabled: sound,
            ..Settings::default()
        }
    }

    /// Drop the ball through the floor until the game ends
    fn lose_all_lives<S: HighScoreStore>(game: &mut Game<S>) {
        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        while game.state().phase != GamePhase::GameOver {
            game.frame(&launch);
            let field = game.state.playfield;
            game.state.ball.pos.y = field.height + 10.0;
            game.state.ball.vel = glam::Vec2::new(0.0, 1.0);
        }
    }

    #[test]
    fn test_new_game_is_ready() {
        let game = Game::new(settings(true), MemoryStore::default());
        assert_eq!(game.state().phase, GamePhase::Ready);
        assert_eq!(game.state().seed, 5);
    }

    #[test]
    fn test_observers_receive_events_and_frames() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut game = Game::new(settings(true), MemoryStore::default());
        game.add_observer(Box::new(Shared(recorder.clone())));
        game.start();
        lose_all_lives(&mut game);

        let rec = recorder.borrow();
        assert!(rec.frames > 0);
        assert_eq!(
            rec.events.iter().filter(|e| **e == GameEvent::LifeLost).count(),
            3
        );
        assert_eq!(rec.sounds.last(), Some(&SoundCue::GameOver));
    }

    #[test]
    fn test_sound_disabled_mutes_cues_only() {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let mut game = Game::new(settings(false), MemoryStore::default());
        game.add_observer(Box::new(Shared(recorder.clone())));
        game.start();
        lose_all_lives(&mut game);

        let rec = recorder.borrow();
        assert!(rec.sounds.is_empty());
        assert!(rec.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_high_score_saved_on_game_over() {
        let mut game = Game::new(settings(true), MemoryStore::default());
        game.start();
        game.state.score = 2500;
        lose_all_lives(&mut game);

        assert_eq!(game.high_score(), 2500);
        assert_eq!(game.store().scores.top_score(), Some(2500));
    }

    #[test]
    fn test_lower_score_does_not_overwrite() {
        let mut store = MemoryStore::default();
        store.save_high_score(9000, 4).unwrap();
        let mut game = Game::new(settings(true), store);
        game.start();
        assert_eq!(game.high_score(), 9000);
        game.state.score = 100;
        lose_all_lives(&mut game);

        assert_eq!(game.high_score(), 9000);
        assert_eq!(game.store().scores.entries.len(), 1);
    }

    #[test]
    fn test_store_failures_do_not_stop_play() {
        let mut game = Game::new(settings(true), BrokenStore);
        game.start();
        assert_eq!(game.high_score(), 0);
        game.state.score = 300;
        lose_all_lives(&mut game);

        // Kept locally even though the save failed
        assert_eq!(game.high_score(), 300);
        game.restart();
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.high_score(), 300);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = Game::new(settings(true), MemoryStore::default());
        game.start();
        lose_all_lives(&mut game);
        let epoch = game.state().epoch;

        game.restart();
        assert_eq!(game.state().phase, GamePhase::Playing);
        assert_eq!(game.state().lives, crate::consts::STARTING_LIVES);
        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().epoch, epoch + 1);
    }
}
