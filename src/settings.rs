//! Game settings and preferences
//!
//! Read once before a session starts and treated as immutable afterward.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::sim::{Playfield, PowerUpStacking};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset '{other}'")),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield size in pixels
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Fixed run seed; a fresh one is picked when absent
    pub seed: Option<u64>,

    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions, sparks)
    pub particles: bool,

    /// Forward sound cues to listeners
    pub sound_enabled: bool,

    /// Behavior when a timed power-up is caught while already active
    pub stacking: PowerUpStacking,

    /// Leaderboard file; scores are kept in memory only when absent
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            seed: None,
            quality: QualityPreset::Medium,
            particles: true,
            sound_enabled: true,
            stacking: PowerUpStacking::Compound,
            high_score_path: None,
        }
    }
}

impl Settings {
    /// 640x480 playfield
    pub fn compact() -> Self {
        Self {
            playfield_width: 640.0,
            playfield_height: 480.0,
            ..Self::default()
        }
    }

    pub fn playfield(&self) -> Playfield {
        Playfield {
            width: self.playfield_width,
            height: self.playfield_height,
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) if settings.is_valid() => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(_) => {
                log::warn!("Ignoring {}: playfield must be positive", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn is_valid(&self) -> bool {
        self.playfield_width > 0.0 && self.playfield_height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_from_str() {
        assert_eq!("HIGH".parse::<QualityPreset>(), Ok(QualityPreset::High));
        assert_eq!("med".parse::<QualityPreset>(), Ok(QualityPreset::Medium));
        assert!("ultra".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(Settings::default().max_particles(), 500);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "seed": 7, "stacking": "refresh" }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.stacking, PowerUpStacking::Refresh);
        assert_eq!(settings.playfield(), Playfield::default());
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_load_rejects_bad_playfield() {
        let path = std::env::temp_dir().join(format!(
            "neon_breakout_settings_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "playfield_width": -5 }"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.playfield_width, PLAYFIELD_WIDTH);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_compact_preset() {
        let field = Settings::compact().playfield();
        assert_eq!((field.width, field.height), (640.0, 480.0));
    }
}
