//! Directed compatibility relation between patterns
//!
//! Two patterns may be neighbors when they agree on the `N - 1` rows or columns
//! where their windows would overlap. The relation is stored per pattern and
//! per direction as a bitset over pattern indices.

use crate::algorithm::bitset::PatternBitset;
use crate::analysis::patterns::{PatternTable, Symbol};
use crate::spatial::direction::Direction;

/// Legal neighbors of every pattern in each of the four directions
#[derive(Debug, Clone)]
pub struct AdjacencyRules {
    rules: Vec<[PatternBitset; 4]>,
    pattern_count: usize,
}

impl AdjacencyRules {
    /// Compare every ordered pair of patterns and record overlaps
    ///
    /// Each accepted pair is written in both directions at once, so the
    /// relation is symmetric under direction inversion by construction.
    pub fn build<S: Symbol>(table: &PatternTable<S>) -> Self {
        let pattern_count = table.len();
        let empty: [PatternBitset; 4] = std::array::from_fn(|_| PatternBitset::new(pattern_count));
        let mut rules = vec![empty; pattern_count];

        for (a, first) in table.patterns().iter().enumerate() {
            for (b, second) in table.patterns().iter().enumerate() {
                if first.accepts_west(second) {
                    Self::link(&mut rules, a, Direction::West, b);
                }
                if first.accepts_north(second) {
                    Self::link(&mut rules, a, Direction::North, b);
                }
            }
        }

        let adjacency = Self {
            rules,
            pattern_count,
        };
        tracing::debug!(
            patterns = pattern_count,
            links = adjacency.link_count(),
            "built adjacency rules"
        );
        adjacency
    }

    // Records `neighbor` on the `direction` side of `pattern` and the reverse link
    fn link(
        rules: &mut [[PatternBitset; 4]],
        pattern: usize,
        direction: Direction,
        neighbor: usize,
    ) {
        if let Some(set) = rules
            .get_mut(pattern)
            .and_then(|sets| sets.get_mut(direction.index()))
        {
            set.insert(neighbor);
        }
        if let Some(set) = rules
            .get_mut(neighbor)
            .and_then(|sets| sets.get_mut(direction.inverse().index()))
        {
            set.insert(pattern);
        }
    }

    /// Number of patterns covered by the relation
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Patterns allowed on the `direction` side of `pattern`
    pub fn compatible(&self, pattern: usize, direction: Direction) -> Option<&PatternBitset> {
        self.rules
            .get(pattern)
            .and_then(|sets| sets.get(direction.index()))
    }

    /// Check whether `neighbor` may sit on the `direction` side of `pattern`
    pub fn allows(&self, pattern: usize, direction: Direction, neighbor: usize) -> bool {
        self.compatible(pattern, direction)
            .is_some_and(|set| set.contains(neighbor))
    }

    /// Union of the legal `direction` neighbors of every pattern in `domain`
    pub fn admissible(&self, domain: &PatternBitset, direction: Direction) -> PatternBitset {
        let mut admissible = PatternBitset::new(self.pattern_count);
        for pattern in domain.iter() {
            if let Some(set) = self.compatible(pattern, direction) {
                admissible.union_with(set);
            }
        }
        admissible
    }

    /// Total number of directed links across all directions
    pub fn link_count(&self) -> usize {
        self.rules
            .iter()
            .flat_map(|sets| sets.iter())
            .map(PatternBitset::count)
            .sum()
    }

    /// Check that every link has its mirror in the opposite direction
    pub fn is_symmetric(&self) -> bool {
        (0..self.pattern_count).all(|pattern| {
            Direction::ALL.into_iter().all(|direction| {
                self.compatible(pattern, direction).is_some_and(|set| {
                    set.iter()
                        .all(|neighbor| self.allows(neighbor, direction.inverse(), pattern))
                })
            })
        })
    }
}
