//! Session lifecycle: start, level clear, life loss, game over
//!
//! Ready -> Playing -> (LevelComplete -> Playing)* -> GameOver, with an
//! explicit restart going back through Ready.

use glam::Vec2;

use super::effects::DeferredAction;
use super::geometry::Rect;
use super::state::{Brick, GameEvent, GamePhase, GameState, Paddle, Playfield};
use crate::consts::*;
use crate::ticks_for_secs;

/// Row colors, cycling top to bottom
pub const BRICK_COLORS: [u32; 6] = [0xff0040, 0xff8000, 0xffff00, 0x00ff40, 0x0080ff, 0x8000ff];

/// Number of brick rows for a level
pub fn rows_for_level(level: u32) -> usize {
    BRICK_BASE_ROWS + level as usize
}

/// Hits needed to destroy a brick in `row` on `level`
///
/// Level 1 is all single-hit bricks regardless of row.
pub fn hits_for_row(level: u32, row: usize) -> u8 {
    if level <= 1 {
        1
    } else {
        (row / 2 + 1).min(BRICK_MAX_HITS as usize) as u8
    }
}

/// Grid geometry, scaled from the 800x600 reference layout
#[derive(Debug, Clone, Copy)]
struct BrickLayout {
    size: Vec2,
    gap: Vec2,
    offset: Vec2,
}

impl BrickLayout {
    fn for_playfield(field: Playfield) -> Self {
        let scale = Vec2::new(field.width / PLAYFIELD_WIDTH, field.height / PLAYFIELD_HEIGHT);
        Self {
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT) * scale,
            gap: Vec2::splat(BRICK_GAP) * scale,
            offset: Vec2::new(BRICK_OFFSET_X, BRICK_OFFSET_Y) * scale,
        }
    }

    fn cell(&self, row: usize, col: usize) -> Rect {
        let pos = self.offset + Vec2::new(col as f32, row as f32) * (self.size + self.gap);
        Rect {
            pos,
            size: self.size,
        }
    }
}

/// Replace the brick grid with a fresh one for the current level
pub fn generate_level(state: &mut GameState) {
    state.bricks.clear();
    let layout = BrickLayout::for_playfield(state.playfield);
    let rows = rows_for_level(state.level);

    for row in 0..rows {
        let hits = hits_for_row(state.level, row);
        for col in 0..BRICK_COLS {
            let brick = Brick {
                id: state.next_entity_id(),
                rect: layout.cell(row, col),
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
                hits,
                max_hits: hits,
            };
            state.bricks.push(brick);
        }
    }
    log::debug!("Level {}: {} bricks in {} rows", state.level, state.bricks.len(), rows);
}

/// Ready -> Playing: reset the session and deal level 1
pub fn start_session(state: &mut GameState) {
    state.epoch += 1;
    state.reseed();
    state.effects.clear();
    state.events.clear();
    state.time_ticks = 0;
    state.score = 0;
    state.level = 1;
    state.lives = STARTING_LIVES;
    state.base_speed = BALL_START_SPEED;
    state.paddle = Paddle::new(state.playfield);
    state.power_ups.clear();
    state.particles.clear();
    generate_level(state);
    state.dock_ball();
    state.phase = GamePhase::Playing;
    log::info!("Session {} started (seed {})", state.epoch, state.seed);
}

/// Playing -> LevelComplete, called when the last brick falls
///
/// The ball stays in flight until the next grid is dealt.
pub fn complete_level(state: &mut GameState) {
    state.level += 1;
    state.base_speed += BALL_SPEED_PER_LEVEL;
    state.phase = GamePhase::LevelComplete;
    state.emit(GameEvent::LevelComplete);

    let fire_at = state.time_ticks + ticks_for_secs(LEVEL_TRANSITION_SECS);
    state
        .effects
        .schedule(fire_at, state.epoch, DeferredAction::AdvanceLevel);
    log::info!("Level cleared! Advancing to level {}", state.level);
}

/// LevelComplete -> Playing once the transition delay has passed
pub fn advance_level(state: &mut GameState) {
    if state.phase != GamePhase::LevelComplete {
        return;
    }
    generate_level(state);
    state.dock_ball();
    state.phase = GamePhase::Playing;
}

/// Ball fell past the bottom edge
pub fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.emit(GameEvent::LifeLost);
    if state.lives == 0 {
        end_game(state);
    } else {
        state.dock_ball();
        log::debug!("Life lost, {} remaining", state.lives);
    }
}

/// Playing -> GameOver; the frame driver stops advancing after this
pub fn end_game(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.effects.clear();
    state.emit(GameEvent::GameOver);
    log::info!("Game over: score {} on level {}", state.score, state.level);
}
