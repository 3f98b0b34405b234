//! Game state and core simulation types
//!
//! All state owned by a session lives here. Nothing in this module is global:
//! the frame driver and resolver receive the session by `&mut`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectScheduler, PowerUpStacking};
use super::geometry::{Circle, Rect};
use crate::consts::*;

/// Current phase of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    Ready,
    /// Active gameplay (ball docked or in flight)
    Playing,
    /// Board cleared, next grid appears after a short delay
    LevelComplete,
    /// Game is paused
    Paused,
    /// Out of lives; frozen until restart
    GameOver,
}

/// Ball state - docked on the paddle or in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Position is slaved to the paddle, waiting for launch input
    Docked,
    /// Free-moving
    Free,
}

/// Playfield bounds, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal pixels per tick
    pub speed: f32,
}

impl Paddle {
    /// Paddle centered horizontally near the bottom of the playfield
    pub fn new(field: Playfield) -> Self {
        Self {
            pos: Vec2::new(
                (field.width - PADDLE_WIDTH) / 2.0,
                field.height - PADDLE_BOTTOM_MARGIN,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Move horizontally, clamped to [0, field_width - width]
    pub fn move_to(&mut self, x: f32, field_width: f32) {
        self.pos.x = x.clamp(0.0, (field_width - self.width).max(0.0));
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Magnitude reference used to rebuild velocity after paddle hits
    pub speed: f32,
    pub state: BallState,
}

impl Ball {
    /// A docked ball at rest
    pub fn new(speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            speed,
            state: BallState::Docked,
        }
    }

    pub fn is_docked(&self) -> bool {
        self.state == BallState::Docked
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    /// Put the ball back on the paddle with no velocity
    pub fn dock(&mut self, paddle: &Paddle, speed: f32) {
        self.state = BallState::Docked;
        self.vel = Vec2::ZERO;
        self.speed = speed;
        self.follow(paddle);
    }

    /// Slave a docked ball to the paddle's center and top edge
    pub fn follow(&mut self, paddle: &Paddle) {
        if self.is_docked() {
            self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius);
        }
    }

    /// Release a docked ball diagonally upward; `rightward` picks the side
    pub fn launch(&mut self, rightward: bool) {
        if self.is_docked() {
            let dx = if rightward { self.speed } else { -self.speed };
            self.vel = Vec2::new(dx, -self.speed);
            self.state = BallState::Free;
        }
    }
}

/// A brick in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub rect: Rect,
    pub color: u32,
    /// Remaining hits, always in 1..=max_hits while the brick is active
    pub hits: u8,
    pub max_hits: u8,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Expand,
    MultiBall,
    Slow,
    Fast,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Expand,
        PowerUpKind::MultiBall,
        PowerUpKind::Slow,
        PowerUpKind::Fast,
    ];

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Expand => 0x00ff00,
            PowerUpKind::MultiBall => 0xff00ff,
            PowerUpKind::Slow => 0x00ffff,
            PowerUpKind::Fast => 0xffff00,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Expand => "expand",
            PowerUpKind::MultiBall => "multiball",
            PowerUpKind::Slow => "slow",
            PowerUpKind::Fast => "fast",
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
    /// Vertical pixels per tick
    pub fall_speed: f32,
    pub color: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases every tick
    pub decay: f32,
}

/// Things that happened during a tick, for audio/UI listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a wall or the paddle
    Hit,
    /// Ball struck a brick
    BrickBreak { destroyed: bool },
    /// Paddle caught a power-up
    PowerUp(PowerUpKind),
    /// Ball fell past the bottom edge
    LifeLost,
    LevelComplete,
    GameOver,
}

/// Audio cue identity, the only thing an audio listener receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    BrickBreak,
    PowerUp,
    GameOver,
    LevelComplete,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::BrickBreak => "brickBreak",
            SoundCue::PowerUp => "powerUp",
            SoundCue::GameOver => "gameOver",
            SoundCue::LevelComplete => "levelComplete",
        }
    }
}

impl GameEvent {
    /// The sound this event plays, if any
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Hit => Some(SoundCue::Hit),
            GameEvent::BrickBreak { .. } => Some(SoundCue::BrickBreak),
            GameEvent::PowerUp(_) => Some(SoundCue::PowerUp),
            GameEvent::LevelComplete => Some(SoundCue::LevelComplete),
            GameEvent::GameOver => Some(SoundCue::GameOver),
            GameEvent::LifeLost => None,
        }
    }
}

/// Read-only view handed to renderers and HUDs once per tick
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub playfield: Playfield,
    pub paddle: &'a Paddle,
    pub ball: &'a Ball,
    pub bricks: &'a [Brick],
    pub power_ups: &'a [PowerUp],
    pub particles: &'a [Particle],
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Incremented on every start; deferred actions from older epochs are dropped
    pub epoch: u64,
    /// Simulation tick counter (advances only while running)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub playfield: Playfield,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u8,
    /// Ball speed restored on every dock; grows with each cleared level
    pub base_speed: f32,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Active bricks in creation order
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Pending timed reversals and level transitions
    pub effects: EffectScheduler,
    pub stacking: PowerUpStacking,
    /// Live particle cap (0 disables particles)
    pub max_particles: usize,
    /// Gameplay RNG: drops, power-up kinds, launch direction
    pub rng: Pcg32,
    /// Cosmetic RNG for particles, so effects never perturb gameplay
    pub fx_rng: Pcg32,
    /// Events raised during the current tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

/// Stream offset for the cosmetic RNG
const FX_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

impl GameState {
    /// Create a session in the `Ready` phase
    pub fn new(seed: u64, playfield: Playfield) -> Self {
        let paddle = Paddle::new(playfield);
        let mut ball = Ball::new(BALL_START_SPEED);
        ball.follow(&paddle);

        Self {
            seed,
            epoch: 0,
            time_ticks: 0,
            phase: GamePhase::Ready,
            playfield,
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            base_speed: BALL_START_SPEED,
            paddle,
            ball,
            bricks: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            effects: EffectScheduler::default(),
            stacking: PowerUpStacking::default(),
            max_particles: 500,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reseed both RNG streams for the current epoch
    pub(crate) fn reseed(&mut self) {
        let seed = self.seed.wrapping_add(self.epoch);
        self.rng = Pcg32::seed_from_u64(seed);
        self.fx_rng = Pcg32::seed_from_u64(seed ^ FX_STREAM);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Frame driver keeps ticking in these phases
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::LevelComplete)
    }

    /// Record an event for this tick's listeners
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Return the ball to the paddle at the current base speed
    pub fn dock_ball(&mut self) {
        self.ball.dock(&self.paddle, self.base_speed);
    }

    /// Spawn a burst of particles, dropping the oldest ones past the cap
    pub fn spawn_particles(&mut self, at: Vec2, color: u32, count: usize) {
        if self.max_particles == 0 {
            return;
        }
        for _ in 0..count {
            let vel = Vec2::new(
                self.fx_rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
                self.fx_rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                color,
                life: 1.0,
                decay: self.fx_rng.random_range(0.02..0.04),
            });
        }
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Maybe drop a power-up centered on `at`
    pub fn roll_power_up(&mut self, at: Vec2) {
        if !self.rng.random_bool(POWERUP_DROP_CHANCE) {
            return;
        }
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp {
            id,
            kind,
            rect: Rect::centered(at, Vec2::splat(POWERUP_SIZE)),
            fall_speed: POWERUP_FALL_SPEED,
            color: kind.color(),
        });
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            lives: self.lives,
            playfield: self.playfield,
            paddle: &self.paddle,
            ball: &self.ball,
            bricks: &self.bricks,
            power_ups: &self.power_ups,
            particles: &self.particles,
        }
    }
}
