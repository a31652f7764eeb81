//! Observation and collapse: choosing the next cell and its pattern
//!
//! All randomness used by a run flows through one [`RandomSelector`], seeded
//! once, so a fixed seed reproduces the exact collapse order.

use crate::algorithm::bitset::PatternBitset;
use crate::algorithm::wave::WaveState;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random source for collapse weighting and tie-break perturbation
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Wrap an existing generator
    pub const fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Uniform index in `0..len`, or `None` when `len` is zero
    pub fn index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Index chosen with probability proportional to its integer weight
    ///
    /// A weight of `f` is exactly `f` times as likely as a weight of 1.
    /// Returns `None` if all weights are zero.
    pub fn weighted_index(&mut self, weights: &[usize]) -> Option<usize> {
        let total: usize = weights.iter().sum();
        if total == 0 {
            return None;
        }

        let mut remaining = self.rng.random_range(0..total);
        for (i, &weight) in weights.iter().enumerate() {
            if remaining < weight {
                return Some(i);
            }
            remaining -= weight;
        }
        None
    }

    /// Random amount in `[0, epsilon)` subtracted from uncertainty values
    pub fn perturbation(&mut self, epsilon: f64) -> f64 {
        if epsilon <= 0.0 {
            return 0.0;
        }
        self.rng.random::<f64>() * epsilon
    }
}

/// Find the uncollapsed cell with the lowest stored uncertainty
///
/// Values are compared as stored, without recomputing the perturbation. Exact
/// ties go to the lowest cell index. Returns `None` once every cell has been
/// collapsed.
pub fn observe(wave: &WaveState) -> Option<usize> {
    wave.uncertainties()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(cell, _)| cell)
}

/// Draw one pattern from `domain`, weighted by pattern frequency
///
/// Returns `None` for an empty domain.
pub fn choose_pattern(
    domain: &PatternBitset,
    frequencies: &[usize],
    selector: &mut RandomSelector,
) -> Option<usize> {
    let candidates = domain.to_vec();
    let weights: Vec<usize> = candidates
        .iter()
        .map(|&pattern| frequencies.get(pattern).copied().unwrap_or(0))
        .collect();

    selector
        .weighted_index(&weights)
        .and_then(|choice| candidates.get(choice).copied())
}
