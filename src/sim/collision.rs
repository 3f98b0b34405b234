//! Collision detection and response
//!
//! One resolver pass per tick while the ball is in flight. Checks run in a
//! fixed order (walls, paddle, bricks, power-ups) because each one can change
//! the ball's velocity or remove entities that later checks would see.

use glam::Vec2;

use super::effects::apply_power_up;
use super::geometry::{ReflectAxis, circle_rect_overlap, overlap_depth, rects_overlap, reflect_axis};
use super::lifecycle::{complete_level, lose_life};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Maximum deflection from vertical off the paddle (±60°)
pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::PI / 3.0;

/// Paddle impact particle color
const PADDLE_SPARK_COLOR: u32 = 0x00ffff;
const PADDLE_SPARKS: usize = 4;
const BRICK_SPARKS: usize = 6;
const POWERUP_SPARKS: usize = 8;

/// Run a full resolver pass for a ball in flight
pub fn resolve(state: &mut GameState) {
    resolve_walls(state);

    if ball_out_of_bounds(state) {
        lose_life(state);
        return;
    }

    resolve_paddle(state);
    resolve_bricks(state);
    catch_power_ups(state);
}

/// Reflect off the side and top walls
///
/// Only velocity pointing into a wall is flipped, so a ball that is still
/// overlapping after a bounce is not pulled back in.
fn resolve_walls(state: &mut GameState) {
    let width = state.playfield.width;
    let ball = &mut state.ball;
    let mut hit = false;

    if (ball.pos.x - ball.radius <= 0.0 && ball.vel.x < 0.0)
        || (ball.pos.x + ball.radius >= width && ball.vel.x > 0.0)
    {
        ball.vel.x = -ball.vel.x;
        hit = true;
    }

    if ball.pos.y - ball.radius <= 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        hit = true;
    }

    if hit {
        state.emit(GameEvent::Hit);
    }
}

/// True once the ball's bottom extent is past the playfield bottom
fn ball_out_of_bounds(state: &GameState) -> bool {
    state.ball.pos.y + state.ball.radius > state.playfield.height
}

/// Velocity after a paddle hit at `hit_pos` (0 = left edge, 1 = right edge)
///
/// The horizontal part follows the hit offset; the vertical part always
/// points up.
pub fn paddle_bounce_velocity(hit_pos: f32, speed: f32) -> Vec2 {
    let angle = (hit_pos - 0.5) * MAX_BOUNCE_ANGLE;
    Vec2::new(angle.sin() * speed, -(angle.cos() * speed).abs())
}

fn resolve_paddle(state: &mut GameState) {
    let paddle = state.paddle.rect();
    let ball = &mut state.ball;

    let within_span = ball.pos.x > paddle.left() && ball.pos.x < paddle.right();
    let vertical_overlap =
        ball.pos.y + ball.radius > paddle.top() && ball.pos.y - ball.radius < paddle.bottom();
    // Skip while already heading up so one contact yields one bounce
    if !within_span || !vertical_overlap || ball.vel.y < 0.0 {
        return;
    }

    let hit_pos = (ball.pos.x - paddle.left()) / paddle.size.x;
    ball.vel = paddle_bounce_velocity(hit_pos, ball.speed);
    let at = ball.pos;

    state.emit(GameEvent::Hit);
    state.spawn_particles(at, PADDLE_SPARK_COLOR, PADDLE_SPARKS);
}

/// Resolve at most one brick hit, newest brick first
fn resolve_bricks(state: &mut GameState) {
    let circle = state.ball.circle();
    let Some(index) = state
        .bricks
        .iter()
        .rposition(|b| circle_rect_overlap(&circle, &b.rect))
    else {
        return;
    };

    let rect = state.bricks[index].rect;
    match reflect_axis(overlap_depth(&circle, &rect)) {
        ReflectAxis::Horizontal => state.ball.vel.x = -state.ball.vel.x,
        ReflectAxis::Vertical => state.ball.vel.y = -state.ball.vel.y,
    }

    let brick = &mut state.bricks[index];
    brick.hits = brick.hits.saturating_sub(1);
    let destroyed = brick.hits == 0;
    let color = brick.color;
    let center = rect.center();

    state.emit(GameEvent::BrickBreak { destroyed });
    state.spawn_particles(center, color, BRICK_SPARKS);

    if destroyed {
        state.bricks.remove(index);
        state.score += BRICK_DESTROY_POINTS * state.level as u64;
        state.roll_power_up(center);
        if state.bricks.is_empty() {
            complete_level(state);
        }
    } else {
        state.score += BRICK_HIT_POINTS;
    }
}

/// Apply every power-up the paddle is touching
///
/// Also runs while the ball is docked, so drops can still be caught.
pub fn catch_power_ups(state: &mut GameState) {
    let paddle = state.paddle.rect();
    let mut i = state.power_ups.len();
    while i > 0 {
        i -= 1;
        if !rects_overlap(&state.power_ups[i].rect, &paddle) {
            continue;
        }
        let power_up = state.power_ups.remove(i);
        apply_power_up(state, power_up.kind);
        state.emit(GameEvent::PowerUp(power_up.kind));
        state.spawn_particles(power_up.rect.center(), power_up.color, POWERUP_SPARKS);
    }
}
