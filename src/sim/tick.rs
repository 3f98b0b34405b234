//! Fixed-step simulation tick
//!
//! Core game loop that advances the session by exactly one step.

use rand::Rng;

use super::collision;
use super::effects::{DeferredAction, revert_effect};
use super::lifecycle::advance_level;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::PARTICLE_DAMPING;

/// Input for a single tick (level-true, not edge-triggered)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held (wins over `left` when both are held)
    pub right: bool,
    /// Pointer x position; centers the paddle on it
    pub target_x: Option<f32>,
    /// Launch the docked ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one step and return the events it raised
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::LevelComplete => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", state.time_ticks);
                return Vec::new();
            }
            GamePhase::Paused => {
                state.phase = if state
                    .effects
                    .is_pending(state.epoch, DeferredAction::AdvanceLevel)
                {
                    GamePhase::LevelComplete
                } else {
                    GamePhase::Playing
                };
            }
            _ => {}
        }
    }

    if !state.is_running() {
        return Vec::new();
    }

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    run_deferred(state);

    move_paddle(state, &input);

    if state.ball.is_docked() {
        state.ball.follow(&state.paddle);
        if input.launch && state.phase == GamePhase::Playing {
            let rightward = state.rng.random_bool(0.5);
            state.ball.launch(rightward);
        }
    } else {
        state.ball.pos += state.ball.vel;
    }

    // Falling power-ups; missed ones just vanish
    let bottom = state.playfield.height;
    for power_up in &mut state.power_ups {
        power_up.rect.pos.y += power_up.fall_speed;
    }
    state.power_ups.retain(|p| p.rect.top() <= bottom);

    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.vel *= PARTICLE_DAMPING;
        particle.life -= particle.decay;
    }
    state.particles.retain(|p| p.life > 0.0);

    if state.ball.is_docked() {
        collision::catch_power_ups(state);
        // An expand catch moves the paddle's center
        state.ball.follow(&state.paddle);
    } else {
        collision::resolve(state);
    }

    log::trace!(
        "tick {} score={} lives={} bricks={}",
        state.time_ticks,
        state.score,
        state.lives,
        state.bricks.len()
    );

    std::mem::take(&mut state.events)
}

/// Fire every deferred action that has come due this tick
fn run_deferred(state: &mut GameState) {
    for action in state.effects.drain_due(state.time_ticks, state.epoch) {
        match action {
            DeferredAction::RevertEffect(kind) => revert_effect(state, kind),
            DeferredAction::AdvanceLevel => advance_level(state),
        }
    }
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let field_width = state.playfield.width;
    let paddle = &mut state.paddle;

    if let Some(x) = input.target_x {
        paddle.move_to(x - paddle.width / 2.0, field_width);
    }
    if input.right {
        paddle.move_to(paddle.pos.x + paddle.speed, field_width);
    } else if input.left {
        paddle.move_to(paddle.pos.x - paddle.speed, field_width);
    }
}

/// Demo player: chase the ball, grab drops when the ball is heading away
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    let paddle = &state.paddle;
    let ball = &state.ball;

    if ball.is_docked() {
        input.launch = true;
    }

    let ball_safe = ball.vel.y < 0.0 && ball.pos.y < state.playfield.height * 0.5;
    let target = if ball_safe {
        state
            .power_ups
            .iter()
            .max_by(|a, b| a.rect.pos.y.total_cmp(&b.rect.pos.y))
            .map(|p| p.rect.center().x)
            .unwrap_or(ball.pos.x)
    } else {
        // Oscillating offset so the ball doesn't settle into a loop
        let wobble = (state.time_ticks as f32 * 0.05).sin() * paddle.width * 0.3;
        ball.pos.x + wobble
    };

    let dead_zone = paddle.speed / 2.0;
    input.left = target < paddle.center_x() - dead_zone;
    input.right = target > paddle.center_x() + dead_zone;
    input
}
