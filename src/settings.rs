//! Physics constants
//!
//! Every tuning value the simulation reads, gathered in one serializable
//! struct so a setup collaborator can override them.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::jump_velocity;

/// Physics and pacing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World-to-pixel factor (rendering only)
    pub scaling_factor: f64,
    pub gravity: f64,

    // === Players ===
    pub run_velocity: f64,
    pub jump_height: f64,

    // === Enemies ===
    pub enemy_run_velocity: f64,
    pub enemy_jump_height: f64,
    pub enemy_jump_threshold: f64,
    pub enemy_noise_rate: f64,
    pub enemy_escape_distance: f64,

    // === Numerics ===
    pub error_margin: f64,
    pub coordinate_precision: u32,

    // === Pacing ===
    pub simulation_frames_per_draw: u32,
    pub min_draw_fps: f64,
    pub max_draw_fps: f64,
    pub game_over_grace_secs: f64,

    // === Scoring ===
    pub starting_lives: u32,
    /// Add finishing height to the final score
    pub height_bonus: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            scaling_factor: SCALING_FACTOR,
            gravity: GRAVITY,

            run_velocity: RUN_VELOCITY,
            jump_height: JUMP_HEIGHT,

            enemy_run_velocity: ENEMY_RUN_VELOCITY,
            enemy_jump_height: ENEMY_JUMP_HEIGHT,
            enemy_jump_threshold: ENEMY_JUMP_THRESHOLD,
            enemy_noise_rate: ENEMY_NOISE_RATE,
            enemy_escape_distance: ENEMY_ESCAPE_DISTANCE,

            error_margin: ERROR_MARGIN,
            coordinate_precision: COORDINATE_PRECISION,

            simulation_frames_per_draw: SIMULATION_FRAMES_PER_DRAW,
            min_draw_fps: MIN_DRAW_FPS,
            max_draw_fps: MAX_DRAW_FPS,
            game_over_grace_secs: GAME_OVER_GRACE_SECS,

            starting_lives: STARTING_LIVES,
            height_bonus: false,
        }
    }
}

impl PhysicsConfig {
    /// Player launch speed
    pub fn jump_velocity(&self) -> f64 {
        jump_velocity(self.gravity, self.jump_height)
    }

    /// Enemy launch speed
    pub fn enemy_jump_velocity(&self) -> f64 {
        jump_velocity(self.gravity, self.enemy_jump_height)
    }

    /// Round a coordinate to the configured precision
    pub fn round(&self, value: f64) -> f64 {
        crate::round_to(value, self.coordinate_precision)
    }

    /// Reject values the integrator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scaling_factor", self.scaling_factor),
            ("gravity", self.gravity),
            ("run_velocity", self.run_velocity),
            ("jump_height", self.jump_height),
            ("enemy_run_velocity", self.enemy_run_velocity),
            ("enemy_jump_height", self.enemy_jump_height),
            ("enemy_noise_rate", self.enemy_noise_rate),
            ("enemy_escape_distance", self.enemy_escape_distance),
            ("error_margin", self.error_margin),
            ("simulation_frames_per_draw", self.simulation_frames_per_draw as f64),
            ("min_draw_fps", self.min_draw_fps),
            ("max_draw_fps", self.max_draw_fps),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveConstant { name, value });
            }
        }
        if self.min_draw_fps > self.max_draw_fps {
            return Err(ConfigError::FpsBounds {
                min: self.min_draw_fps,
                max: self.max_draw_fps,
            });
        }
        Ok(())
    }

    /// Parse overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.jump_velocity() - 32.5496).abs() < 1e-3);
    }

    #[test]
    fn test_partial_override() {
        let config = PhysicsConfig::from_json(r#"{"gravity": 20.0, "height_bonus": true}"#).unwrap();
        assert_eq!(config.gravity, 20.0);
        assert!(config.height_bonus);
        assert_eq!(config.run_velocity, RUN_VELOCITY);
    }

    #[test]
    fn test_rejects_bad_constants() {
        let err = PhysicsConfig::from_json(r#"{"gravity": -1.0}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveConstant {
                name: "gravity",
                value: -1.0
            }
        );

        let err = PhysicsConfig::from_json(r#"{"min_draw_fps": 90.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::FpsBounds { .. }));

        assert!(matches!(
            PhysicsConfig::from_json("{not json"),
            Err(ConfigError::Layout(_))
        ));
    }
}
