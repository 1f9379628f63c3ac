//! Side Scroller - physics and gameplay core for a two-player platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, motion, rules)
//! - `input`: Logical directions and key maps
//! - `settings`: Physics constants
//! - `scores`: End-of-game ranking
//! - `render`: Renderer contract (the core only emits draw calls)
//! - `session`: Frame pacing and sub-stepping

pub mod error;
pub mod input;
pub mod render;
pub mod scores;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, RangeError};
pub use input::{Direction, HeldKeys, KeyMap};
pub use scores::{Ranking, ScoreEntry};
pub use session::Session;
pub use settings::PhysicsConfig;

/// Game configuration constants
pub mod consts {
    /// Pixels per world meter (rendering only)
    pub const SCALING_FACTOR: f64 = 30.0;
    /// Gravity, boosted 9x over earth so a 6 m jump feels snappy (m/s²)
    pub const GRAVITY: f64 = 9.81 * 9.0;

    /// Player run speed (m/s)
    pub const RUN_VELOCITY: f64 = 10.0;
    /// Player jump apex height (m)
    pub const JUMP_HEIGHT: f64 = 6.0;

    /// Enemy wander speed cap (m/s)
    pub const ENEMY_RUN_VELOCITY: f64 = 4.0;
    /// Enemy jump apex height (m)
    pub const ENEMY_JUMP_HEIGHT: f64 = 2.5;
    /// Fraction of the enemy speed cap above which a grounded enemy hops
    pub const ENEMY_JUMP_THRESHOLD: f64 = 0.7;
    /// Noise samples advanced per simulated second
    pub const ENEMY_NOISE_RATE: f64 = 1.5;
    /// Enemies further than this from the origin on either axis are dropped
    pub const ENEMY_ESCAPE_DISTANCE: f64 = 200.0;

    /// Dead zone for velocity tests and snap depth for contacts
    pub const ERROR_MARGIN: f64 = 0.0125;
    /// Decimal places kept for positions and velocities
    pub const COORDINATE_PRECISION: u32 = 4;

    /// Simulation sub-steps per rendered frame
    pub const SIMULATION_FRAMES_PER_DRAW: u32 = 5;
    /// Frame rate floor used for sub-step sizing (collisions break down below ~10 fps)
    pub const MIN_DRAW_FPS: f64 = 30.0;
    pub const MAX_DRAW_FPS: f64 = 60.0;

    /// Seconds the session keeps running after the game ends
    pub const GAME_OVER_GRACE_SECS: f64 = 6.0;

    /// Lives every player starts with
    pub const STARTING_LIVES: u32 = 3;
}

/// Round to a fixed number of decimal places
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Launch speed needed to reach `height` under `gravity`
#[inline]
pub fn jump_velocity(gravity: f64, height: f64) -> f64 {
    (2.0 * gravity * height).sqrt()
}
