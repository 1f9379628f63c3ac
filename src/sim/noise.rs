//! Band-limited 1D noise used to drive enemy wandering
//!
//! A fixed-length curve built from a weighted sum of octave layers. Each
//! layer linearly interpolates every `period/k`-th sample of one shared
//! base array of uniform randoms, so the lowest octave carries the broad
//! shape and the higher ones add detail.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RangeError};
use crate::round_to;

/// Default sample count
pub const DEFAULT_PERIOD: usize = 128;

/// Default octave weights: halve the weight per doubling of frequency
pub const DEFAULT_OCTAVES: [(usize, f64); 8] = [
    (1, 1.0),
    (2, 0.5),
    (4, 0.25),
    (8, 0.125),
    (16, 1.0 / 16.0),
    (32, 1.0 / 32.0),
    (64, 1.0 / 64.0),
    (128, 1.0 / 128.0),
];

/// Construction parameters for a [`NoiseSignal`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub period: usize,
    /// (control-point count, weight) per layer
    pub octaves: Vec<(usize, f64)>,
    /// Output is normalized into [lo, hi]
    pub range: (f64, f64),
    pub decimal_places: u32,
    /// Remove net drift so the curve loops seamlessly
    pub repeatable: bool,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            octaves: DEFAULT_OCTAVES.to_vec(),
            range: (0.0, 1.0),
            decimal_places: 6,
            repeatable: false,
        }
    }
}

impl NoiseParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.octaves.is_empty() {
            return Err(ConfigError::NoOctaves);
        }
        for &(octave, weight) in &self.octaves {
            if octave == 0 || self.period % octave != 0 {
                return Err(ConfigError::PeriodNotDivisible {
                    period: self.period,
                    octave,
                });
            }
            if !weight.is_finite() {
                return Err(ConfigError::InvalidWeight { octave, weight });
            }
        }
        let (lo, hi) = self.range;
        if !(hi > lo) {
            return Err(ConfigError::InvalidRange { lo, hi });
        }
        Ok(())
    }
}

/// Sampled noise curve of `period` values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSignal")]
pub struct NoiseSignal {
    params: NoiseParams,
    samples: Vec<f64>,
}

/// Unchecked wire form of a [`NoiseSignal`]
#[derive(Deserialize)]
struct RawSignal {
    params: NoiseParams,
    samples: Vec<f64>,
}

impl TryFrom<RawSignal> for NoiseSignal {
    type Error = ConfigError;

    fn try_from(raw: RawSignal) -> Result<Self, Self::Error> {
        raw.params.validate()?;
        if raw.samples.len() != raw.params.period {
            return Err(ConfigError::SampleCount {
                expected: raw.params.period,
                found: raw.samples.len(),
            });
        }
        Ok(Self {
            params: raw.params,
            samples: raw.samples,
        })
    }
}

impl NoiseSignal {
    pub fn new<R: Rng + ?Sized>(params: NoiseParams, rng: &mut R) -> Result<Self, ConfigError> {
        params.validate()?;
        let samples = build_samples(&params, rng);
        Ok(Self { params, samples })
    }

    /// Redraw all randomness, replacing the samples
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.samples = build_samples(&self.params, rng);
    }

    pub fn period(&self) -> usize {
        self.params.period
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample at `x`; fractional indices interpolate linearly
    pub fn get(&self, x: f64) -> Result<f64, RangeError> {
        let max = self.params.period - 1;
        if !(0.0..=max as f64).contains(&x) {
            return Err(RangeError::OutOfBounds { x, max });
        }
        if x.fract() == 0.0 {
            return Ok(self.samples[x as usize]);
        }
        let left = x.floor();
        let right = x.ceil();
        let value = self.samples[left as usize] * (right - x) + self.samples[right as usize] * (x - left);
        Ok(round_to(value, self.params.decimal_places))
    }

    /// Samples `[0, stop)`
    pub fn slice(&self, stop: usize) -> Result<&[f64], RangeError> {
        if stop == 0 || stop > self.params.period {
            return Err(RangeError::SliceStop {
                stop,
                period: self.params.period,
            });
        }
        Ok(&self.samples[..stop])
    }
}

fn build_samples<R: Rng + ?Sized>(params: &NoiseParams, rng: &mut R) -> Vec<f64> {
    let period = params.period;
    let base: Vec<f64> = (0..=period).map(|_| rng.random::<f64>()).collect();
    let mut acc = vec![0.0; period + 1];

    for &(octave, weight) in &params.octaves {
        let section = period / octave;
        let controls: Vec<f64> = (0..=octave).map(|i| base[section * i]).collect();
        for (slot, value) in acc.iter_mut().zip(interpolate(&controls, section)) {
            *slot += value * weight;
        }
    }

    if params.repeatable && period > 1 {
        // Tilt so the last kept sample lands on the first one
        let last = period - 1;
        let drift = acc[last] - acc[0];
        acc.truncate(period);
        for (i, value) in acc.iter_mut().enumerate() {
            *value -= round_to(i as f64 * drift / last as f64, params.decimal_places);
        }
    }

    let min = acc.iter().copied().fold(f64::INFINITY, f64::min);
    let max = acc.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = params.range;
    let scale = if max > min { (hi - lo) / (max - min) } else { 0.0 };

    acc.truncate(period);
    acc.iter()
        .map(|v| round_to((v - min) * scale + lo, params.decimal_places))
        .collect()
}

/// Upsample `controls` by `factor`, keeping the final control point
fn interpolate(controls: &[f64], factor: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity((controls.len() - 1) * factor + 1);
    for pair in controls.windows(2) {
        for step in 0..factor {
            let t = step as f64 / factor as f64;
            out.push(pair[0] * (1.0 - t) + pair[1] * t);
        }
    }
    if let Some(&last) = controls.last() {
        out.push(last);
    }
    out
}
