//! Constraint propagation to a fixpoint or a contradiction
//!
//! After a collapse, every cell whose domain changed is queued and its
//! uncollapsed neighbors are narrowed to the patterns some candidate of the
//! changed cell allows on that side. The queue is first-in first-out and never
//! holds the same cell twice, which pins the traversal order for a given seed.

use crate::algorithm::selection::RandomSelector;
use crate::algorithm::wave::WaveState;
use crate::analysis::adjacency::AdjacencyRules;
use crate::spatial::direction::Direction;
use crate::spatial::grid::ToroidalGrid;
use bitvec::prelude::*;
use std::collections::VecDeque;

/// Queue of cells whose neighbors must be re-checked
pub struct Worklist {
    queue: VecDeque<usize>,
    pending: BitVec,
}

impl Worklist {
    /// Create an empty worklist for a grid of `cell_count` cells
    pub fn new(cell_count: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: bitvec![0; cell_count],
        }
    }

    /// Queue a cell, returning `false` if it is already waiting
    pub fn push(&mut self, cell: usize) -> bool {
        if cell >= self.pending.len() || self.pending.get(cell).as_deref() == Some(&true) {
            return false;
        }
        self.pending.set(cell, true);
        self.queue.push_back(cell);
        true
    }

    /// Remove and return the oldest queued cell
    pub fn pop(&mut self) -> Option<usize> {
        let cell = self.queue.pop_front()?;
        self.pending.set(cell, false);
        Some(cell)
    }

    /// Drop all queued cells
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.fill(false);
    }

    /// Check if the worklist is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Get the number of queued cells
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Counters collected during one propagation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Cells taken from the worklist
    pub visited: usize,
    /// Neighbor domains that were narrowed
    pub restricted: usize,
    /// Cells added to the worklist
    pub enqueued: usize,
}

/// Result of running propagation until the worklist drains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Every queued cell was processed without emptying a domain
    Stable(PropagationReport),
    /// A neighbor had no candidate left
    Contradiction {
        /// Cell whose domain produced the restriction
        source: usize,
        /// Neighbor whose domain would have become empty
        cell: usize,
        /// Direction from `source` to `cell`
        direction: Direction,
    },
}

/// Narrow neighbor domains until no queued cell remains
///
/// Collapsed neighbors are never touched. A neighbor already contained in the
/// admissible set is skipped without drawing a perturbation, so running this
/// on a stable wave changes nothing and queues nothing. On contradiction the
/// offending domain is left as it was and the remaining queue is abandoned.
pub fn propagate(
    wave: &mut WaveState,
    rules: &AdjacencyRules,
    grid: &ToroidalGrid,
    worklist: &mut Worklist,
    selector: &mut RandomSelector,
    epsilon: f64,
) -> Propagation {
    let mut report = PropagationReport::default();

    while let Some(cell) = worklist.pop() {
        report.visited += 1;
        let Some(current) = wave.domain(cell).cloned() else {
            continue;
        };

        for (direction, neighbor) in grid.neighbors(cell) {
            if wave.is_collapsed(neighbor) {
                continue;
            }
            let Some(available) = wave.domain(neighbor) else {
                continue;
            };

            let admissible = rules.admissible(&current, direction);
            if available.is_subset(&admissible) {
                continue;
            }

            let narrowed = available.intersection(&admissible);
            if narrowed.is_empty() {
                worklist.clear();
                return Propagation::Contradiction {
                    source: cell,
                    cell: neighbor,
                    direction,
                };
            }

            tracing::trace!(
                cell = neighbor,
                from = available.count(),
                to = narrowed.count(),
                %direction,
                "restricted domain"
            );

            let perturbation = selector.perturbation(epsilon);
            wave.restrict(neighbor, narrowed, perturbation);
            report.restricted += 1;
            if worklist.push(neighbor) {
                report.enqueued += 1;
            }
        }
    }

    Propagation::Stable(report)
}
