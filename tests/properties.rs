//! Invariants that must hold for any input sequence

use neon_breakout::sim::{GameEvent, GamePhase, GameState, Playfield, TickInput, start_session, tick};
use proptest::prelude::*;

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(0.0f32..800.0),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.7),
    )
        .prop_map(|(left, right, launch, target_x, pause, idle_mode)| TickInput {
            left,
            right,
            target_x,
            launch,
            pause,
            idle_mode,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn score_and_lives_are_monotonic(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..1500),
    ) {
        let mut state = GameState::new(seed, Playfield::default());
        start_session(&mut state);

        let mut score = state.score;
        let mut lives = state.lives;
        let mut game_overs = 0;

        for input in &inputs {
            let was_over = state.phase == GamePhase::GameOver;
            let events = tick(&mut state, input);

            prop_assert!(state.score >= score);
            prop_assert!(state.lives <= lives);
            if was_over {
                prop_assert!(events.is_empty());
                prop_assert_eq!(state.score, score);
            }
            game_overs += events.iter().filter(|e| **e == GameEvent::GameOver).count();
            score = state.score;
            lives = state.lives;
        }

        prop_assert!(game_overs <= 1);
        prop_assert_eq!(game_overs == 1, state.phase == GamePhase::GameOver);
        prop_assert_eq!(state.lives == 0, state.phase == GamePhase::GameOver);
    }

    #[test]
    fn bricks_and_paddle_stay_in_bounds(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..1500),
    ) {
        let mut state = GameState::new(seed, Playfield::default());
        start_session(&mut state);

        for input in &inputs {
            let before = state.bricks.len();
            let events = tick(&mut state, input);

            for brick in &state.bricks {
                prop_assert!(brick.hits >= 1 && brick.hits <= brick.max_hits);
            }
            prop_assert!(state.paddle.width >= 60.0 && state.paddle.width <= 150.0);
            prop_assert!(state.paddle.pos.x >= 0.0);
            prop_assert!(state.paddle.pos.x + state.paddle.width <= state.playfield.width + 1e-3);

            let cleared = events.contains(&GameEvent::LevelComplete);
            prop_assert_eq!(cleared, before > 0 && state.bricks.is_empty() && state.phase == GamePhase::LevelComplete);

            if state.phase == GamePhase::Playing && state.ball.is_docked() {
                prop_assert_eq!(state.ball.pos.x, state.paddle.center_x());
                prop_assert_eq!(state.ball.pos.y, state.paddle.pos.y - state.ball.radius);
            }
        }
    }
}
