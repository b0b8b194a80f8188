//! Injectable randomness
//!
//! All random draws (delays, sequences, digits, passages, target spawns) go
//! through [`RandomSource`] so a session can be seeded and tests can script
//! exact values.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// Source of uniformly distributed values in `[0, 1)`
pub trait RandomSource: Send {
    fn next_f64(&mut self) -> f64;

    /// Uniform value in `[lo, hi)`
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index in `0..len`; returns 0 for an empty range
    fn index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64) as usize;
        i.min(len.saturating_sub(1))
    }

    /// Uniform whole number of milliseconds in `[lo, hi)`
    fn millis_between(&mut self, lo: u64, hi: u64) -> u64 {
        let drawn = self.uniform(lo as f64, hi as f64).floor() as u64;
        drawn.clamp(lo, hi.saturating_sub(1).max(lo))
    }
}

/// Boxed random source owned by a single test
pub type BoxedRandom = Box<dyn RandomSource>;

/// PCG-backed generator, reproducible when seeded
pub struct SeededRandom {
    rng: Mcg128Xsl64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mcg128Xsl64::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mcg128Xsl64::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise
    pub fn boxed(seed: Option<u64>) -> BoxedRandom {
        match seed {
            Some(seed) => Box::new(Self::new(seed)),
            None => Box::new(Self::from_entropy()),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    pub fn boxed(values: impl Into<Vec<f64>>) -> BoxedRandom {
        Box::new(Self::new(values))
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
