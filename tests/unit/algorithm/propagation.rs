//! Tests for the propagation worklist and fixpoint computation

#[cfg(test)]
mod tests {
    use ndarray::array;
    use wavetile::algorithm::propagation::{Propagation, PropagationReport, Worklist, propagate};
    use wavetile::algorithm::selection::RandomSelector;
    use wavetile::algorithm::wave::WaveState;
    use wavetile::analysis::adjacency::AdjacencyRules;
    use wavetile::analysis::patterns::PatternTable;
    use wavetile::spatial::direction::Direction;
    use wavetile::spatial::grid::ToroidalGrid;
    use wavetile::spatial::window::SymmetryMode;

    const EPSILON: f64 = 0.1;

    // Vertical stripes: pattern 0 and 1 alternate along x and repeat along y
    fn stripe_rules() -> AdjacencyRules {
        let raster = array![[0u8, 1]];
        let table = PatternTable::extract(&raster, 2, SymmetryMode::NONE)
            .expect("extraction should succeed");
        AdjacencyRules::build(&table)
    }

    fn collapse_and_propagate(
        grid: &ToroidalGrid,
        wave: &mut WaveState,
        selector: &mut RandomSelector,
        cell: usize,
        pattern: usize,
    ) -> Propagation {
        let rules = stripe_rules();
        let mut worklist = Worklist::new(grid.cell_count());
        wave.collapse(cell, pattern);
        worklist.push(cell);
        propagate(wave, &rules, grid, &mut worklist, selector, EPSILON)
    }

    // Tests FIFO order and set semantics of the worklist
    // Verified by using push_front instead of push_back
    #[test]
    fn test_worklist_fifo_without_duplicates() {
        let mut worklist = Worklist::new(5);
        assert!(worklist.push(3));
        assert!(worklist.push(1));
        assert!(!worklist.push(3));
        assert!(!worklist.push(5));
        assert_eq!(worklist.len(), 2);

        assert_eq!(worklist.pop(), Some(3));
        assert!(worklist.push(3));
        assert_eq!(worklist.pop(), Some(1));
        assert_eq!(worklist.pop(), Some(3));
        assert_eq!(worklist.pop(), None);
        assert!(worklist.is_empty());
    }

    // Tests clear empties both the queue and the membership bits
    // Verified by clearing only the queue
    #[test]
    fn test_worklist_clear() {
        let mut worklist = Worklist::new(3);
        worklist.push(0);
        worklist.push(2);
        worklist.clear();

        assert!(worklist.is_empty());
        assert!(worklist.push(2));
    }

    // Tests a single collapse determines every cell of a stripe grid
    // Verified by skipping neighbors reached through wraparound
    #[test]
    fn test_stripe_collapse_propagates_everywhere() {
        let grid = ToroidalGrid::new(4, 2);
        let mut selector = RandomSelector::new(3);
        let mut wave = WaveState::new(grid.cell_count(), 2, &mut selector);

        let result = collapse_and_propagate(&grid, &mut wave, &mut selector, 0, 0);
        assert_eq!(
            result,
            Propagation::Stable(PropagationReport {
                visited: 8,
                restricted: 7,
                enqueued: 7,
            })
        );

        for cell in 0..grid.cell_count() {
            let (x, _) = grid.coordinates(cell);
            assert_eq!(wave.assigned_pattern(cell), Some(x % 2));
        }
    }

    // Tests restricted cells get a perturbed uncertainty below their count
    // Verified by storing the plain candidate count
    #[test]
    fn test_restricted_uncertainty_is_perturbed() {
        let grid = ToroidalGrid::new(4, 2);
        let mut selector = RandomSelector::new(3);
        let mut wave = WaveState::new(grid.cell_count(), 2, &mut selector);

        collapse_and_propagate(&grid, &mut wave, &mut selector, 0, 0);
        for (_, value) in wave.uncertainties() {
            assert!(value > 1.0 - EPSILON && value <= 1.0);
        }
        assert_eq!(wave.uncertainties().count(), 7);
    }

    // Tests an odd stripe ring ends in a contradiction with the offending edge
    // Verified by intersecting into the neighbor before the emptiness check
    #[test]
    fn test_odd_ring_contradiction() {
        let grid = ToroidalGrid::new(3, 1);
        let mut selector = RandomSelector::new(3);
        let mut wave = WaveState::new(grid.cell_count(), 2, &mut selector);

        let result = collapse_and_propagate(&grid, &mut wave, &mut selector, 0, 0);
        assert_eq!(
            result,
            Propagation::Contradiction {
                source: 2,
                cell: 1,
                direction: Direction::West,
            }
        );
        // The conflicting domain is left as it was
        assert_eq!(wave.domain_size(1), 1);
    }

    // Tests collapsed neighbors are never narrowed
    // Verified by removing the is_collapsed check
    #[test]
    fn test_collapsed_neighbors_are_skipped() {
        let grid = ToroidalGrid::new(2, 1);
        let mut selector = RandomSelector::new(3);
        let mut wave = WaveState::new(grid.cell_count(), 2, &mut selector);
        wave.collapse(1, 0);

        let result = collapse_and_propagate(&grid, &mut wave, &mut selector, 0, 0);
        assert_eq!(
            result,
            Propagation::Stable(PropagationReport {
                visited: 1,
                restricted: 0,
                enqueued: 0,
            })
        );
        assert_eq!(wave.assigned_pattern(1), Some(0));
    }

    // Tests propagating a stable wave again changes nothing
    // Verified by drawing a perturbation before the subset check
    #[test]
    fn test_propagation_is_idempotent() {
        let grid = ToroidalGrid::new(4, 2);
        let rules = stripe_rules();
        let mut selector = RandomSelector::new(3);
        let mut wave = WaveState::new(grid.cell_count(), 2, &mut selector);
        collapse_and_propagate(&grid, &mut wave, &mut selector, 0, 0);

        let before: Vec<(usize, f64)> = wave.uncertainties().collect();
        let mut worklist = Worklist::new(grid.cell_count());
        for cell in 0..grid.cell_count() {
            worklist.push(cell);
        }
        let result = propagate(&mut wave, &rules, &grid, &mut worklist, &mut selector, EPSILON);

        assert_eq!(
            result,
            Propagation::Stable(PropagationReport {
                visited: 8,
                restricted: 0,
                enqueued: 0,
            })
        );
        assert_eq!(wave.uncertainties().collect::<Vec<_>>(), before);
    }
}
