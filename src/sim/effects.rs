//! Timed power-up effects and other deferred actions
//!
//! Every timed change is an entry in a queue keyed by (fire tick, session
//! epoch). The frame driver drains due entries at the start of each tick, so
//! nothing fires outside the simulation and nothing from a previous session
//! survives a restart.

use serde::{Deserialize, Serialize};

use super::state::{GameState, PowerUpKind};
use crate::consts::{PADDLE_MAX_WIDTH, PADDLE_MIN_WIDTH};
use crate::ticks_for_secs;

/// Paddle width gained from an expand power-up
pub const EXPAND_AMOUNT: f32 = 20.0;
/// Ball velocity multiplier for the slow power-up
pub const SLOW_FACTOR: f32 = 0.7;
/// Ball velocity multiplier for the fast power-up
pub const FAST_FACTOR: f32 = 1.5;

/// How catching a power-up of an already-active kind behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpStacking {
    /// Apply again on top of the current values, with its own reversal.
    /// Overlapping catches compound and can drift from the nominal speed.
    #[default]
    Compound,
    /// Leave the values alone and push the pending reversal back
    Refresh,
}

/// Work scheduled for a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Undo one application of a timed power-up
    RevertEffect(PowerUpKind),
    /// Build the next level's grid after the clear delay
    AdvanceLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    pub fire_at: u64,
    pub epoch: u64,
    pub action: DeferredAction,
}

/// Queue of deferred actions
#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    queue: Vec<ScheduledAction>,
}

impl EffectScheduler {
    pub fn schedule(&mut self, fire_at: u64, epoch: u64, action: DeferredAction) {
        self.queue.push(ScheduledAction {
            fire_at,
            epoch,
            action,
        });
    }

    /// Remove and return every action due at `now` for `epoch`, oldest deadline first
    ///
    /// Actions belonging to any other epoch are discarded.
    pub fn drain_due(&mut self, now: u64, epoch: u64) -> Vec<DeferredAction> {
        let before = self.queue.len();
        self.queue.retain(|a| a.epoch == epoch);
        if self.queue.len() != before {
            log::trace!("Dropped {} stale deferred actions", before - self.queue.len());
        }

        let mut due: Vec<ScheduledAction> = Vec::new();
        self.queue.retain(|a| {
            if a.fire_at <= now {
                due.push(*a);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|a| a.fire_at);
        due.into_iter().map(|a| a.action).collect()
    }

    /// Push the latest pending instance of `action` to `fire_at`
    ///
    /// Returns false when nothing matching is pending.
    pub fn extend(&mut self, epoch: u64, action: DeferredAction, fire_at: u64) -> bool {
        match self
            .queue
            .iter_mut()
            .filter(|a| a.epoch == epoch && a.action == action)
            .max_by_key(|a| a.fire_at)
        {
            Some(entry) => {
                entry.fire_at = entry.fire_at.max(fire_at);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, epoch: u64, action: DeferredAction) -> bool {
        self.queue
            .iter()
            .any(|a| a.epoch == epoch && a.action == action)
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// How long a power-up lasts, `None` for kinds without a timed effect
pub fn effect_duration_secs(kind: PowerUpKind) -> Option<f32> {
    match kind {
        PowerUpKind::Expand => Some(10.0),
        PowerUpKind::Slow => Some(8.0),
        PowerUpKind::Fast => Some(5.0),
        PowerUpKind::MultiBall => None,
    }
}

/// Apply a caught power-up and schedule its reversal
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    let Some(secs) = effect_duration_secs(kind) else {
        // Multiball has no effect
        log::debug!("Caught {} (no effect)", kind.as_str());
        return;
    };
    let fire_at = state.time_ticks + ticks_for_secs(secs);
    let revert = DeferredAction::RevertEffect(kind);

    if state.stacking == PowerUpStacking::Refresh
        && state.effects.extend(state.epoch, revert, fire_at)
    {
        log::debug!("Refreshed {} until tick {}", kind.as_str(), fire_at);
        return;
    }

    match kind {
        PowerUpKind::Expand => {
            state.paddle.width = (state.paddle.width + EXPAND_AMOUNT).min(PADDLE_MAX_WIDTH);
            // Grows rightward; pull back in at the right wall
            let x = state.paddle.pos.x;
            state.paddle.move_to(x, state.playfield.width);
        }
        PowerUpKind::Slow => scale_ball(state, SLOW_FACTOR),
        PowerUpKind::Fast => scale_ball(state, FAST_FACTOR),
        PowerUpKind::MultiBall => {}
    }
    state.effects.schedule(fire_at, state.epoch, revert);
    log::debug!("Applied {} until tick {}", kind.as_str(), fire_at);
}

/// Undo one application of a timed power-up
pub fn revert_effect(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Expand => {
            state.paddle.width = (state.paddle.width - EXPAND_AMOUNT).max(PADDLE_MIN_WIDTH);
        }
        PowerUpKind::Slow => scale_ball(state, 1.0 / SLOW_FACTOR),
        PowerUpKind::Fast => scale_ball(state, 1.0 / FAST_FACTOR),
        PowerUpKind::MultiBall => {}
    }
    log::debug!("Reverted {}", kind.as_str());
}

fn scale_ball(state: &mut GameState, factor: f32) {
    state.ball.vel *= factor;
    state.ball.speed *= factor;
}
