//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per tick, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod lifecycle;
pub mod state;
pub mod tick;

pub use effects::{DeferredAction, EffectScheduler, PowerUpStacking, apply_power_up};
pub use geometry::{Circle, Rect, circle_rect_overlap, overlap_depth, rects_overlap};
pub use lifecycle::{generate_level, start_session};
pub use state::{
    Ball, BallState, Brick, GameEvent, GamePhase, GameState, Paddle, Particle, Playfield,
    PowerUp, PowerUpKind, Snapshot, SoundCue,
};
pub use tick::{TickInput, tick};
