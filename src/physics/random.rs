//! Deterministic random streams for symmetry breaking
//!
//! Solvers only draw from these when two points coincide exactly. Each solver
//! owns its stream, seeded from a fixed name, so a run is reproducible and a
//! test can swap in a [`SequenceStream`].

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`
pub trait RandomStream: fmt::Debug {
    fn next_f64(&mut self) -> f64;
}

/// Pseudo-random stream seeded from a string
#[derive(Debug, Clone)]
pub struct SeededStream {
    seed: String,
    rng: StdRng,
}

impl SeededStream {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            rng: StdRng::seed_from_u64(fnv1a(seed.as_bytes())),
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl RandomStream for SeededStream {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// 64-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}

/// Replays a fixed list of values, wrapping around at the end
#[derive(Debug, Clone)]
pub struct SequenceStream {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceStream {
    /// An empty list behaves like a constant `0.5`
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.5] } else { values };
        Self { values, cursor: 0 }
    }
}

impl RandomStream for SequenceStream {
    fn next_f64(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}
