use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset over pattern indices
///
/// Used for cell domains and for adjacency sets. Indices are 0-based and
/// match positions in the pattern table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternBitset {
    bits: BitVec,
    capacity: usize,
}

impl PatternBitset {
    /// Create a bitset with no patterns present
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
            capacity,
        }
    }

    /// Create a bitset containing every pattern
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: bitvec![1; capacity],
            capacity,
        }
    }

    /// Create a bitset containing exactly one pattern
    pub fn singleton(capacity: usize, pattern: usize) -> Self {
        let mut bitset = Self::new(capacity);
        bitset.insert(pattern);
        bitset
    }

    /// Number of pattern slots
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a pattern index, ignoring indices past the capacity
    pub fn insert(&mut self, pattern: usize) {
        if pattern < self.capacity {
            self.bits.set(pattern, true);
        }
    }

    /// Test pattern membership
    pub fn contains(&self, pattern: usize) -> bool {
        self.bits.get(pattern).as_deref() == Some(&true)
    }

    /// Intersect this bitset with another in-place
    pub fn intersect_with(&mut self, other: &Self) {
        self.bits &= &other.bits;
    }

    /// Create a new bitset containing the intersection
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    /// Add every pattern of `other` to this bitset
    pub fn union_with(&mut self, other: &Self) {
        self.bits |= &other.bits;
    }

    /// Test whether every pattern in this bitset is also in `other`
    pub fn is_subset(&self, other: &Self) -> bool {
        self.bits.iter_ones().all(|pattern| other.contains(pattern))
    }

    /// Test if no patterns are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count patterns in the set
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Lowest pattern index in the set
    pub fn first(&self) -> Option<usize> {
        self.bits.first_one()
    }

    /// Iterate over present pattern indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Extract all pattern indices as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for PatternBitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatternBitset({} patterns: {:?})",
            self.count(),
            self.to_vec()
        )
    }
}
