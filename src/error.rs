//! Error types
//!
//! Both kinds are setup-time or caller bugs; the per-tick hot path never fails.

use thiserror::Error;

use crate::input::Direction;

/// Invalid construction arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("noise period must be positive")]
    ZeroPeriod,
    #[error("noise needs at least one octave")]
    NoOctaves,
    #[error("noise period {period} is not divisible by octave {octave}")]
    PeriodNotDivisible { period: usize, octave: usize },
    #[error("octave weight for {octave} must be finite, got {weight}")]
    InvalidWeight { octave: usize, weight: f64 },
    #[error("noise signal expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },
    #[error("value range invalid: min {lo} >= max {hi}")]
    InvalidRange { lo: f64, hi: f64 },
    #[error("key map is missing direction {0:?}")]
    MissingDirection(Direction),
    #[error("key map binds direction {0:?} more than once")]
    DuplicateDirection(Direction),
    #[error("key map binds key {0:?} more than once")]
    DuplicateKey(String),
    #[error("body size must be positive, got ({width}, {height})")]
    InvalidSize { width: f64, height: f64 },
    #[error("exactly one of {0} must be set")]
    AmbiguousCoordinate(&'static str),
    #[error("physics constant {name} must be positive, got {value}")]
    NonPositiveConstant { name: &'static str, value: f64 },
    #[error("min draw fps {min} exceeds max draw fps {max}")]
    FpsBounds { min: f64, max: f64 },
    #[error("layout has no players")]
    NoPlayers,
    #[error("malformed layout: {0}")]
    Layout(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Layout(err.to_string())
    }
}

/// Signal queried outside its domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("x must be in [0, {max}], got {x}")]
    OutOfBounds { x: f64, max: usize },
    #[error("slice stop must be in (0, {period}], got {stop}")]
    SliceStop { stop: usize, period: usize },
}
