//! Per-cell candidate domains and the uncertainty map
//!
//! Domains only ever shrink. A cell keeps an uncertainty entry until the
//! solver collapses it, even if propagation has already narrowed it to a
//! single candidate.

use crate::algorithm::bitset::PatternBitset;
use crate::algorithm::selection::RandomSelector;

/// Mutable solver state: one domain per cell plus uncertainty values
#[derive(Debug, Clone)]
pub struct WaveState {
    domains: Vec<PatternBitset>,
    uncertainty: Vec<Option<f64>>,
    pending: usize,
    pattern_count: usize,
}

impl WaveState {
    /// Create a wave where every cell may hold any pattern
    ///
    /// Every cell starts with uncertainty `pattern_count`, except one randomly
    /// chosen cell at `pattern_count - 1` so the first observation has a
    /// unique minimum.
    pub fn new(cell_count: usize, pattern_count: usize, selector: &mut RandomSelector) -> Self {
        let domains = vec![PatternBitset::all(pattern_count); cell_count];
        let mut uncertainty = vec![Some(pattern_count as f64); cell_count];

        if let Some(start) = selector.index(cell_count)
            && let Some(value) = uncertainty.get_mut(start)
        {
            *value = Some(pattern_count as f64 - 1.0);
        }

        Self {
            domains,
            uncertainty,
            pending: cell_count,
            pattern_count,
        }
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.domains.len()
    }

    /// Number of patterns in the table the domains index into
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Candidate patterns of `cell`
    pub fn domain(&self, cell: usize) -> Option<&PatternBitset> {
        self.domains.get(cell)
    }

    /// Number of candidates left in `cell`, zero for unknown cells
    pub fn domain_size(&self, cell: usize) -> usize {
        self.domains.get(cell).map_or(0, PatternBitset::count)
    }

    /// Candidate counts of all cells in index order
    pub fn domain_sizes(&self) -> Vec<usize> {
        self.domains.iter().map(PatternBitset::count).collect()
    }

    /// Stored uncertainty of an uncollapsed cell
    pub fn uncertainty(&self, cell: usize) -> Option<f64> {
        self.uncertainty.get(cell).copied().flatten()
    }

    /// Uncollapsed cells with their stored uncertainty, in index order
    pub fn uncertainties(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.uncertainty
            .iter()
            .enumerate()
            .filter_map(|(cell, value)| value.map(|v| (cell, v)))
    }

    /// Check whether the solver has collapsed `cell`
    pub fn is_collapsed(&self, cell: usize) -> bool {
        matches!(self.uncertainty.get(cell), Some(None))
    }

    /// Number of cells not yet collapsed by the solver
    pub const fn pending_count(&self) -> usize {
        self.pending
    }

    /// Check whether every cell has been collapsed
    pub const fn is_settled(&self) -> bool {
        self.pending == 0
    }

    /// Commit `cell` to a single pattern and drop its uncertainty entry
    pub fn collapse(&mut self, cell: usize, pattern: usize) {
        if let Some(domain) = self.domains.get_mut(cell) {
            *domain = PatternBitset::singleton(self.pattern_count, pattern);
        }
        if let Some(value) = self.uncertainty.get_mut(cell)
            && value.take().is_some()
        {
            self.pending -= 1;
        }
    }

    /// Replace the domain of an uncollapsed cell with a narrower one
    ///
    /// The new uncertainty is the candidate count minus `perturbation`.
    pub fn restrict(&mut self, cell: usize, domain: PatternBitset, perturbation: f64) {
        let size = domain.count() as f64;
        if let Some(slot) = self.domains.get_mut(cell) {
            *slot = domain;
        }
        if let Some(Some(value)) = self.uncertainty.get_mut(cell) {
            *value = size - perturbation;
        }
    }

    /// Pattern of `cell` if its domain is a singleton
    pub fn assigned_pattern(&self, cell: usize) -> Option<usize> {
        self.domains
            .get(cell)
            .filter(|domain| domain.count() == 1)
            .and_then(PatternBitset::first)
    }
}
