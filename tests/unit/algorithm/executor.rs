//! Tests for solver configuration, stepping and run outcomes

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use wavetile::algorithm::executor::{
        Collapse, RunOutcome, Solver, SolverConfig, SolverStatus, StepOutcome,
    };
    use wavetile::analysis::adjacency::AdjacencyRules;
    use wavetile::analysis::patterns::PatternTable;
    use wavetile::io::configuration::{
        DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, DEFAULT_PATTERN_SIZE, DEFAULT_SEED,
        MAX_GRID_DIMENSION, MAX_PATTERN_SIZE, TIE_BREAK_EPSILON,
    };
    use wavetile::io::sink::{CollapseRecorder, NullSink};
    use wavetile::spatial::window::SymmetryMode;
    use wavetile::{Result, SynthesisError};

    fn config(width: usize, height: usize, pattern_size: usize, seed: u64) -> SolverConfig {
        SolverConfig {
            width,
            height,
            pattern_size,
            seed,
            ..SolverConfig::default()
        }
    }

    fn checkerboard_solver(seed: u64) -> Result<Solver<u8>> {
        Solver::new(&array![[0u8, 1], [1, 0]], config(4, 4, 2, seed))
    }

    fn rejected_parameter(result: Result<()>) -> Option<&'static str> {
        match result {
            Err(SynthesisError::InvalidParameter { parameter, .. }) => Some(parameter),
            _ => None,
        }
    }

    // Tests default configuration uses the configured constants
    // Verified by changing the default seed to 0
    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.width, DEFAULT_OUTPUT_WIDTH);
        assert_eq!(config.height, DEFAULT_OUTPUT_HEIGHT);
        assert_eq!(config.pattern_size, DEFAULT_PATTERN_SIZE);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.symmetry, SymmetryMode::ALL);
        assert!((config.tie_break_epsilon - TIE_BREAK_EPSILON).abs() < f64::EPSILON);
        assert!(config.validate_output().is_ok());
    }

    // Tests every out-of-range output parameter is rejected by name
    // Verified by allowing a zero height
    #[test]
    fn test_validate_output_rejects_bad_parameters() {
        assert_eq!(rejected_parameter(config(0, 4, 2, 0).validate_output()), Some("width"));
        assert_eq!(rejected_parameter(config(4, 0, 2, 0).validate_output()), Some("height"));
        assert_eq!(
            rejected_parameter(config(MAX_GRID_DIMENSION + 1, 4, 2, 0).validate_output()),
            Some("width")
        );
        assert_eq!(
            rejected_parameter(config(4, 4, 0, 0).validate_output()),
            Some("pattern_size")
        );
        assert_eq!(
            rejected_parameter(config(4, 4, MAX_PATTERN_SIZE + 1, 0).validate_output()),
            Some("pattern_size")
        );

        for epsilon in [-0.1, 1.0, f64::NAN] {
            let config = SolverConfig {
                tie_break_epsilon: epsilon,
                ..SolverConfig::default()
            };
            assert_eq!(
                rejected_parameter(config.validate_output()),
                Some("tie_break_epsilon")
            );
        }
    }

    // Tests pattern size is only rejected when it exceeds both raster sides
    // Verified by using || instead of && in the size check
    #[test]
    fn test_validate_pattern_size_against_raster() {
        let config = config(8, 8, 3, 0);
        assert_eq!(rejected_parameter(config.validate(2, 2)), Some("pattern_size"));
        assert!(config.validate(3, 2).is_ok());
        assert!(config.validate(1, 5).is_ok());
        assert!(matches!(
            config.validate(0, 4),
            Err(SynthesisError::InvalidSourceData { .. })
        ));
    }

    // Tests solver construction surfaces configuration errors
    // Verified by removing the validate call in Solver::new
    #[test]
    fn test_new_rejects_invalid_config() {
        let raster = array![[0u8, 1], [1, 0]];
        assert!(Solver::new(&raster, config(0, 4, 2, 0)).is_err());
        assert!(Solver::new(&raster, config(4, 4, 3, 0)).is_err());

        let empty: Array2<u8> = Array2::zeros((0, 2));
        assert!(Solver::new(&empty, config(4, 4, 1, 0)).is_err());
    }

    // Tests rules built for another table are rejected
    // Verified by removing the pattern count comparison
    #[test]
    fn test_from_model_rejects_mismatched_rules() -> Result<()> {
        let checker = PatternTable::extract(&array![[0u8, 1], [1, 0]], 2, SymmetryMode::ALL)?;
        let uniform = PatternTable::extract(&array![[0u8]], 1, SymmetryMode::ALL)?;
        let rules = AdjacencyRules::build(&uniform);

        let result = Solver::from_model(checker, rules, config(4, 4, 2, 0));
        assert!(matches!(
            result,
            Err(SynthesisError::InvalidParameter {
                parameter: "rules",
                ..
            })
        ));
        Ok(())
    }

    // Tests the first step collapses the lowered start cell
    // Verified by observing the maximum instead of the minimum
    #[test]
    fn test_first_step_collapses_start_cell() -> Result<()> {
        let mut solver = checkerboard_solver(5)?;
        let start = solver
            .wave()
            .uncertainties()
            .find(|&(_, value)| value < 2.0)
            .map(|(cell, _)| cell);

        let outcome = solver.step();
        let StepOutcome::Collapsed(Collapse { cell, .. }) = outcome else {
            return Err(wavetile::io::error::invalid_source(&format!("{outcome:?}")));
        };
        assert_eq!(Some(cell), start);
        assert_eq!(solver.iteration(), 1);
        assert_eq!(solver.history().len(), 1);
        assert_eq!(solver.status(), SolverStatus::Running);
        Ok(())
    }

    // Tests a checkerboard run collapses every cell exactly once
    // Verified by emitting before propagation settles
    #[test]
    fn test_checkerboard_run_completes() -> Result<()> {
        let mut solver = checkerboard_solver(1)?;
        let mut recorder = CollapseRecorder::new();

        assert_eq!(solver.run(&mut recorder, None), RunOutcome::Complete);
        assert_eq!(solver.status(), SolverStatus::Complete);
        assert_eq!(recorder.len(), 16);
        assert_eq!(solver.history().len(), 16);
        assert!(solver.assignment().iter().all(Option::is_some));

        let mut cells = recorder.cells();
        cells.sort_unstable();
        assert_eq!(cells, (0..16).collect::<Vec<_>>());

        // Terminal state is sticky
        assert_eq!(solver.step(), StepOutcome::Complete);
        assert_eq!(solver.history().len(), 16);
        Ok(())
    }

    // Tests the anchor grid of a completed checkerboard alternates
    // Verified by reading anchors from the last pattern symbol
    #[test]
    fn test_anchor_grid_alternates() -> Result<()> {
        let mut solver = checkerboard_solver(9)?;
        solver.run(&mut NullSink, None);

        let anchors = solver.anchor_grid();
        assert_eq!(anchors.dim(), (4, 4));
        for ((y, x), anchor) in anchors.indexed_iter() {
            let right = anchors.get((y, (x + 1) % 4)).copied().flatten();
            let below = anchors.get(((y + 1) % 4, x)).copied().flatten();
            assert!(anchor.is_some());
            assert_ne!(*anchor, right);
            assert_ne!(*anchor, below);
        }
        Ok(())
    }

    // Tests the step budget stops a run early and can be resumed
    // Verified by checking the budget after stepping
    #[test]
    fn test_budget_exhaustion_and_resume() -> Result<()> {
        let mut solver = checkerboard_solver(2)?;

        assert_eq!(
            solver.run(&mut NullSink, Some(3)),
            RunOutcome::BudgetExhausted { steps: 3 }
        );
        assert_eq!(solver.status(), SolverStatus::Running);
        assert_eq!(solver.history().len(), 3);

        assert_eq!(solver.run(&mut NullSink, Some(0)), RunOutcome::BudgetExhausted { steps: 0 });
        assert_eq!(solver.run(&mut NullSink, None), RunOutcome::Complete);
        assert_eq!(solver.history().len(), 16);
        Ok(())
    }

    // Tests an odd stripe ring ends in a contradiction without emitting
    // Verified by pushing the collapse to history before propagating
    #[test]
    fn test_contradiction_is_terminal() -> Result<()> {
        let config = SolverConfig {
            symmetry: SymmetryMode::NONE,
            ..config(3, 2, 2, 4)
        };
        let mut solver = Solver::new(&array![[0u8, 1]], config)?;
        let mut recorder = CollapseRecorder::new();

        let outcome = solver.run(&mut recorder, None);
        let RunOutcome::Contradiction(contradiction) = outcome else {
            return Err(wavetile::io::error::invalid_source(&format!("{outcome:?}")));
        };
        assert_eq!(solver.status(), SolverStatus::Contradiction(contradiction));
        assert!(contradiction.direction.is_some());
        assert_eq!(contradiction.iteration, 1);
        assert!(recorder.is_empty());
        assert!(solver.history().is_empty());

        assert_eq!(solver.step(), StepOutcome::Contradiction(contradiction));
        assert_eq!(solver.iteration(), 1);
        Ok(())
    }

    // Tests views after a contradiction only hold cells that were emitted
    // Verified by reading the assignment from singleton wave domains
    #[test]
    fn test_contradiction_leaves_only_committed_cells() -> Result<()> {
        for seed in 0..5 {
            let config = SolverConfig {
                symmetry: SymmetryMode::NONE,
                ..config(3, 2, 2, seed)
            };
            let mut solver = Solver::new(&array![[0u8, 1]], config)?;
            let mut recorder = CollapseRecorder::new();

            let outcome = solver.run(&mut recorder, None);
            assert!(matches!(outcome, RunOutcome::Contradiction(_)));

            let assignment = solver.assignment();
            assert_eq!(assignment.len(), 6);
            assert_eq!(assignment.iter().flatten().count(), solver.history().len());
            assert_eq!(assignment.iter().flatten().count(), recorder.len());
            assert_eq!(solver.anchor_grid().iter().flatten().count(), recorder.len());
            assert!(solver.wave().domain_sizes().contains(&1));
        }
        Ok(())
    }

    // Tests accessors expose the model the solver was built from
    // Verified by building the grid with width and height swapped
    #[test]
    fn test_accessors() -> Result<()> {
        let solver = Solver::new(&array![[0u8, 1], [1, 0]], config(6, 2, 2, 0))?;
        assert_eq!(solver.patterns().len(), 2);
        assert_eq!(solver.rules().pattern_count(), 2);
        assert_eq!(solver.grid().width(), 6);
        assert_eq!(solver.grid().height(), 2);
        assert_eq!(solver.wave().cell_count(), 12);
        assert_eq!(solver.config().pattern_size, 2);
        assert_eq!(solver.iteration(), 0);
        Ok(())
    }
}
