//! Overlapping pattern extraction from a symbol raster
//!
//! Every raster coordinate starts one window. Each window contributes all of
//! its requested symmetry variants, and identical variants are merged into a
//! single pattern whose frequency counts how often it was seen.

use crate::io::error::{Result, invalid_parameter, invalid_source};
use crate::io::raster::SymbolRaster;
use crate::spatial::window::{SymmetryMode, extract_toroidal, symmetry_variants};
use ndarray::Array2;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;

/// Opaque value read from the input sample, such as a palette index
///
/// Only equality is needed by the solver; hashing is used to merge identical
/// patterns during extraction.
pub trait Symbol: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> Symbol for T {}

/// Flattened `size` × `size` window of symbols in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern<S> {
    symbols: Vec<S>,
    size: usize,
    anchor: S,
}

impl<S: Symbol> Pattern<S> {
    /// Flatten a square window into a pattern
    ///
    /// Returns `None` for an empty or non-square window.
    pub fn from_window(window: &Array2<S>) -> Option<Self> {
        let (rows, cols) = window.dim();
        if rows != cols {
            return None;
        }
        let symbols: Vec<S> = window.iter().copied().collect();
        let anchor = symbols.first().copied()?;
        Some(Self {
            symbols,
            size: rows,
            anchor,
        })
    }

    /// Side length of the window
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All symbols in row-major order
    pub fn symbols(&self) -> &[S] {
        &self.symbols
    }

    /// The top-left symbol, used to present a collapsed cell
    pub fn anchor(&self) -> S {
        self.anchor
    }

    /// Check whether `other` may sit directly west of this pattern
    ///
    /// True when the first `size - 1` columns of this pattern equal the last
    /// `size - 1` columns of `other`.
    pub fn accepts_west(&self, other: &Self) -> bool {
        let n = self.size;
        if n != other.size || n == 0 {
            return false;
        }
        self.symbols
            .chunks(n)
            .zip(other.symbols.chunks(n))
            .all(|(mine, theirs)| mine.get(..n - 1) == theirs.get(1..))
    }

    /// Check whether `other` may sit directly north of this pattern
    ///
    /// True when the first `size - 1` rows of this pattern equal the last
    /// `size - 1` rows of `other`.
    pub fn accepts_north(&self, other: &Self) -> bool {
        let n = self.size;
        if n != other.size || n == 0 {
            return false;
        }
        self.symbols.get(..n * (n - 1)) == other.symbols.get(n..)
    }
}

/// Deduplicated patterns with their occurrence counts
///
/// Pattern indices follow first-seen order during the raster scan, so the
/// table is identical across runs on the same input.
#[derive(Debug, Clone)]
pub struct PatternTable<S> {
    patterns: Vec<Pattern<S>>,
    frequencies: Vec<usize>,
    pattern_size: usize,
    symmetry: SymmetryMode,
}

impl<S: Symbol> PatternTable<S> {
    /// Extract every `pattern_size` window of the raster with its variants
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The raster is empty
    /// - `pattern_size` is zero
    /// - The raster fails to return a symbol inside its own bounds
    pub fn extract<R>(raster: &R, pattern_size: usize, symmetry: SymmetryMode) -> Result<Self>
    where
        R: SymbolRaster<S> + ?Sized,
    {
        if raster.is_empty() {
            return Err(invalid_source(&"input raster has no symbols"));
        }
        if pattern_size == 0 {
            return Err(invalid_parameter(
                "pattern_size",
                &pattern_size,
                &"must be at least 1",
            ));
        }

        let mut table = Self {
            patterns: Vec::new(),
            frequencies: Vec::new(),
            pattern_size,
            symmetry,
        };
        let mut lookup: HashMap<Vec<S>, usize> = HashMap::new();

        for y in 0..raster.height() {
            for x in 0..raster.width() {
                let window = extract_toroidal(raster, x, y, pattern_size).ok_or_else(|| {
                    invalid_source(&format!("window at ({x}, {y}) could not be read"))
                })?;

                for variant in symmetry_variants(&window, symmetry) {
                    let pattern = Pattern::from_window(&variant).ok_or_else(|| {
                        invalid_source(&format!("window at ({x}, {y}) is not square"))
                    })?;
                    table.record(&mut lookup, pattern);
                }
            }
        }

        tracing::debug!(
            patterns = table.len(),
            windows = raster.width() * raster.height(),
            variants = symmetry.variant_count(),
            "extracted pattern table"
        );

        Ok(table)
    }

    fn record(&mut self, lookup: &mut HashMap<Vec<S>, usize>, pattern: Pattern<S>) {
        match lookup.entry(pattern.symbols.clone()) {
            Entry::Occupied(entry) => {
                if let Some(count) = self.frequencies.get_mut(*entry.get()) {
                    *count += 1;
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(self.patterns.len());
                self.patterns.push(pattern);
                self.frequencies.push(1);
            }
        }
    }

    /// Number of unique patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check whether no pattern was extracted
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Side length of every pattern
    pub const fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    /// Symmetry variants used during extraction
    pub const fn symmetry(&self) -> SymmetryMode {
        self.symmetry
    }

    /// All unique patterns in index order
    pub fn patterns(&self) -> &[Pattern<S>] {
        &self.patterns
    }

    /// Pattern at `index`
    pub fn pattern(&self, index: usize) -> Option<&Pattern<S>> {
        self.patterns.get(index)
    }

    /// Occurrence count of every pattern, indexed like [`Self::patterns`]
    pub fn frequencies(&self) -> &[usize] {
        &self.frequencies
    }

    /// Occurrence count of the pattern at `index`
    pub fn frequency(&self, index: usize) -> Option<usize> {
        self.frequencies.get(index).copied()
    }

    /// Sum of all occurrence counts
    pub fn total_frequency(&self) -> usize {
        self.frequencies.iter().sum()
    }

    /// Index of a pattern with exactly these symbols
    pub fn index_of(&self, symbols: &[S]) -> Option<usize> {
        self.patterns
            .iter()
            .position(|pattern| pattern.symbols() == symbols)
    }
}
