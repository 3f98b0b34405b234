//! Neon Breakout - a ball-and-paddle arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, power-ups, lifecycle)
//! - `game`: Session host wiring the simulation to its collaborators
//! - `highscores`: High score leaderboard and stores
//! - `settings`: Session configuration

pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use game::{Game, Observer};
pub use highscores::{HighScoreStore, HighScores, JsonFileStore, MemoryStore, StoreError};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per display refresh)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the playfield bottom to the paddle's top edge
    pub const PADDLE_BOTTOM_MARGIN: f32 = 50.0;
    /// Power-up width bounds
    pub const PADDLE_MIN_WIDTH: f32 = 60.0;
    pub const PADDLE_MAX_WIDTH: f32 = 150.0;

    /// Ball defaults (speeds are pixels per tick)
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 4.0;
    /// Base speed gained per cleared level
    pub const BALL_SPEED_PER_LEVEL: f32 = 0.5;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 3;

    /// Brick grid layout
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_BASE_ROWS: usize = 5;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_GAP: f32 = 5.0;
    pub const BRICK_OFFSET_X: f32 = 35.0;
    pub const BRICK_OFFSET_Y: f32 = 80.0;
    pub const BRICK_MAX_HITS: u8 = 3;

    /// Scoring
    pub const BRICK_DESTROY_POINTS: u64 = 100;
    pub const BRICK_HIT_POINTS: u64 = 10;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const POWERUP_DROP_CHANCE: f64 = 0.3;

    /// Particles
    pub const PARTICLE_DAMPING: f32 = 0.98;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;

    /// Delay between clearing a level and the next grid appearing
    pub const LEVEL_TRANSITION_SECS: f32 = 2.0;
}

/// Convert a duration in seconds to a whole number of simulation ticks
#[inline]
pub fn ticks_for_secs(secs: f32) -> u64 {
    (secs * consts::TICKS_PER_SECOND as f32).round() as u64
}
