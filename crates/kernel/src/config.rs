use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::spawn::ARENA_WAYPOINTS;

/// Tuning values for the chase game.
///
/// Every field has a default matching the shipped arena, so a JSON file only
/// needs to name the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Health at start and after restart.
    pub max_health: u32,
    /// Health removed by one zombie hit.
    pub hit_damage: u32,
    /// Zombie-to-player distance below which a hit lands.
    pub hit_radius: f32,
    /// Seconds between two hits.
    pub attack_cooldown: f32,
    /// Seconds between zombie steps at score 0.
    pub base_move_interval: f32,
    /// Interval reduction per speed level.
    pub move_interval_step: f32,
    /// Floor for the step interval.
    pub min_move_interval: f32,
    /// Points needed to reach the next speed level.
    pub score_per_speed_level: u32,
    /// Distance covered by one zombie step.
    pub zombie_step: f32,
    /// The zombie's Y tracks the player's Y minus this offset.
    pub zombie_height_offset: f32,
    pub zombie_spawn: Vec3,
    /// Player Y below which the run ends.
    pub fall_threshold: f32,
    /// Where the player is teleported on fall and restart.
    pub player_spawn: Vec3,
    /// Position of the orb present at start and after restart.
    pub initial_orb: Vec3,
    /// Half-width of the horizontal respawn jitter.
    pub orb_jitter: f32,
    /// Height of a respawned orb above its waypoint.
    pub orb_lift: f32,
    /// Damage flash decay per frame.
    pub flash_fade_per_frame: f32,
    /// Candidate respawn points for orbs.
    pub waypoints: Vec<Vec3>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: 100,
            hit_damage: 25,
            hit_radius: 1.5,
            attack_cooldown: 1.0,
            base_move_interval: 1.0,
            move_interval_step: 0.1,
            min_move_interval: 0.2,
            score_per_speed_level: 5,
            zombie_step: 1.0,
            zombie_height_offset: 0.5,
            zombie_spawn: Vec3::new(-5.0, -1.5, -5.0),
            fall_threshold: -10.0,
            player_spawn: Vec3::ZERO,
            initial_orb: Vec3::new(3.0, 0.0, 0.0),
            orb_jitter: 1.5,
            orb_lift: 1.0,
            flash_fade_per_frame: 0.02,
            waypoints: ARENA_WAYPOINTS.to_vec(),
        }
    }
}

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn is_positive(v: f32) -> bool {
            v > 0.0
        }
        fn is_non_negative(v: f32) -> bool {
            v >= 0.0
        }
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        if self.max_health == 0 || self.max_health > 100 {
            return Err(invalid("max_health", "must be between 1 and 100"));
        }
        if self.hit_damage == 0 {
            return Err(invalid("hit_damage", "must be at least 1"));
        }
        if !is_positive(self.hit_radius) {
            return Err(invalid("hit_radius", "must be positive"));
        }
        if !is_non_negative(self.attack_cooldown) {
            return Err(invalid("attack_cooldown", "must not be negative"));
        }
        if !is_positive(self.min_move_interval) {
            return Err(invalid("min_move_interval", "must be positive"));
        }
        if self.base_move_interval.is_nan() || self.base_move_interval < self.min_move_interval {
            return Err(invalid(
                "base_move_interval",
                "must be at least min_move_interval",
            ));
        }
        if !is_non_negative(self.move_interval_step) {
            return Err(invalid("move_interval_step", "must not be negative"));
        }
        if self.score_per_speed_level == 0 {
            return Err(invalid("score_per_speed_level", "must be at least 1"));
        }
        if !is_positive(self.zombie_step) {
            return Err(invalid("zombie_step", "must be positive"));
        }
        if !is_non_negative(self.orb_jitter) {
            return Err(invalid("orb_jitter", "must not be negative"));
        }
        if !is_positive(self.flash_fade_per_frame) {
            return Err(invalid("flash_fade_per_frame", "must be positive"));
        }
        if !self.zombie_height_offset.is_finite() {
            return Err(invalid("zombie_height_offset", "must be finite"));
        }
        if !self.fall_threshold.is_finite() {
            return Err(invalid("fall_threshold", "must be finite"));
        }
        if !self.orb_lift.is_finite() {
            return Err(invalid("orb_lift", "must be finite"));
        }
        let points = [self.zombie_spawn, self.player_spawn, self.initial_orb];
        if !points.iter().chain(&self.waypoints).all(|p| p.is_finite()) {
            return Err(invalid("waypoints", "positions must be finite"));
        }
        if self.waypoints.is_empty() {
            return Err(invalid("waypoints", "needs at least one waypoint"));
        }
        Ok(())
    }

    /// Seconds between zombie steps at the given score.
    ///
    /// Drops by `move_interval_step` every `score_per_speed_level` points and
    /// never goes below `min_move_interval`.
    pub fn move_interval(&self, score: u32) -> f32 {
        let level = score / self.score_per_speed_level.max(1);
        (self.base_move_interval - self.move_interval_step * level as f32)
            .max(self.min_move_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_health, 100);
        assert_eq!(config.hit_damage, 25);
        assert_eq!(config.waypoints.len(), 10);
    }

    #[test]
    fn move_interval_speeds_up_every_five_points() {
        let config = GameConfig::default();
        assert_relative_eq!(config.move_interval(0), 1.0);
        assert_relative_eq!(config.move_interval(4), 1.0);
        assert_relative_eq!(config.move_interval(5), 0.9);
        assert_relative_eq!(config.move_interval(25), 0.5);
    }

    #[test]
    fn move_interval_floors_at_minimum() {
        let config = GameConfig::default();
        assert_relative_eq!(config.move_interval(40), 0.2, epsilon = 1e-6);
        assert_relative_eq!(config.move_interval(100), 0.2);
        assert_relative_eq!(config.move_interval(u32::MAX), 0.2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "hit_damage": 10 }"#).unwrap();
        assert_eq!(config.hit_damage, 10);
        assert_eq!(config.max_health, 100);
        assert_eq!(config.zombie_spawn, Vec3::new(-5.0, -1.5, -5.0));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = GameConfig::default();
        let text = config.to_json_pretty().unwrap();
        let back = GameConfig::from_json_str(&text).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn rejects_empty_waypoints() {
        let err = GameConfig::from_json_str(r#"{ "waypoints": [] }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "waypoints",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_speed_level_divisor() {
        let config = GameConfig {
            score_per_speed_level: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_base_interval_below_floor() {
        let config = GameConfig {
            base_move_interval: 0.1,
            ..GameConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_move_interval"));
    }

    #[test]
    fn rejects_health_above_one_hundred() {
        let err = GameConfig::from_json_str(r#"{ "max_health": 150 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_health",
                ..
            }
        ));
        assert!(GameConfig::from_json_str(r#"{ "max_health": 100 }"#).is_ok());
    }

    #[test]
    fn rejects_harmless_hits() {
        let config = GameConfig {
            hit_damage: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "hit_damage",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_finite_offsets() {
        for config in [
            GameConfig {
                zombie_height_offset: f32::NAN,
                ..GameConfig::default()
            },
            GameConfig {
                fall_threshold: f32::NEG_INFINITY,
                ..GameConfig::default()
            },
            GameConfig {
                orb_lift: f32::INFINITY,
                ..GameConfig::default()
            },
            GameConfig {
                waypoints: vec![Vec3::new(f32::NAN, 0.0, 0.0)],
                ..GameConfig::default()
            },
        ] {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "fall_threshold": -20.0 }}"#).unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.fall_threshold, -20.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
