use crate::{
    algorithm::propagation::{Propagation, Worklist, propagate},
    algorithm::selection::{RandomSelector, choose_pattern, observe},
    algorithm::wave::WaveState,
    analysis::adjacency::AdjacencyRules,
    analysis::patterns::{PatternTable, Symbol},
    io::configuration::{
        DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, DEFAULT_PATTERN_SIZE, DEFAULT_SEED,
        MAX_GRID_DIMENSION, MAX_PATTERN_SIZE, TIE_BREAK_EPSILON,
    },
    io::error::{Result, invalid_parameter, invalid_source},
    io::raster::SymbolRaster,
    io::sink::OutputSink,
    spatial::direction::Direction,
    spatial::grid::ToroidalGrid,
    spatial::window::SymmetryMode,
};
use ndarray::Array2;

/// Run parameters for one synthesis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    /// Output grid width in cells
    pub width: usize,
    /// Output grid height in cells
    pub height: usize,
    /// Side length of extracted patterns
    pub pattern_size: usize,
    /// Seed of the run's only random source
    pub seed: u64,
    /// Symmetry variants generated per extracted window
    pub symmetry: SymmetryMode,
    /// Upper bound of the random tie-break subtracted from uncertainties
    pub tie_break_epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_OUTPUT_WIDTH,
            height: DEFAULT_OUTPUT_HEIGHT,
            pattern_size: DEFAULT_PATTERN_SIZE,
            seed: DEFAULT_SEED,
            symmetry: SymmetryMode::ALL,
            tie_break_epsilon: TIE_BREAK_EPSILON,
        }
    }
}

impl SolverConfig {
    /// Validate the configuration against the dimensions of the input raster
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The raster is empty
    /// - The pattern size is larger than both raster dimensions
    /// - Any check of [`Self::validate_output`] fails
    pub fn validate(&self, raster_width: usize, raster_height: usize) -> Result<()> {
        if raster_width == 0 || raster_height == 0 {
            return Err(invalid_source(&format!(
                "input raster is empty ({raster_width}x{raster_height})"
            )));
        }
        self.validate_output()?;
        // Wrapping on one axis is fine, but a window larger than the raster on
        // both axes only ever repeats the sample
        if self.pattern_size > raster_width && self.pattern_size > raster_height {
            return Err(invalid_parameter(
                "pattern_size",
                &self.pattern_size,
                &format!("exceeds both input dimensions ({raster_width}x{raster_height})"),
            ));
        }
        Ok(())
    }

    /// Validate the parameters that do not depend on the input raster
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Width or height is zero or above [`MAX_GRID_DIMENSION`]
    /// - The pattern size is zero or above [`MAX_PATTERN_SIZE`]
    /// - The tie-break epsilon is outside `[0, 1)`
    pub fn validate_output(&self) -> Result<()> {
        for (parameter, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        if self.pattern_size == 0 || self.pattern_size > MAX_PATTERN_SIZE {
            return Err(invalid_parameter(
                "pattern_size",
                &self.pattern_size,
                &format!("must be between 1 and {MAX_PATTERN_SIZE}"),
            ));
        }
        if !(0.0..1.0).contains(&self.tie_break_epsilon) {
            return Err(invalid_parameter(
                "tie_break_epsilon",
                &self.tie_break_epsilon,
                &"must lie in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// A cell committed to a single pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapse {
    /// Row-major cell index
    pub cell: usize,
    /// Index into the pattern table
    pub pattern: usize,
}

/// Where and why a run stopped without completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction {
    /// Cell left without any candidate
    pub cell: usize,
    /// Cell whose restriction emptied `cell`
    pub source: usize,
    /// Direction from `source` to `cell`, `None` if `cell` was empty when observed
    pub direction: Option<Direction>,
    /// Iteration in which the contradiction occurred
    pub iteration: usize,
}

/// Lifecycle of a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// More cells remain to be collapsed
    Running,
    /// Every cell has been collapsed
    Complete,
    /// Propagation emptied a domain; the run is over
    Contradiction(Contradiction),
}

impl SolverStatus {
    /// Check whether no further step can change the wave
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Result of a single solver step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One cell was collapsed and propagation reached a fixpoint
    Collapsed(Collapse),
    /// No uncollapsed cell remains
    Complete,
    /// The run hit a contradiction, now or in an earlier step
    Contradiction(Contradiction),
}

/// Result of driving a solver over several steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every cell was collapsed; the assignment is final
    Complete,
    /// The run stopped; only cells emitted so far are defined
    Contradiction(Contradiction),
    /// The step budget ran out before a terminal state
    BudgetExhausted {
        /// Number of collapses performed by this call
        steps: usize,
    },
}

/// Overlapping-model wave function collapse solver
///
/// Owns the read-only model (pattern table and adjacency rules) and the
/// mutable wave of one run. Each [`Solver::step`] observes the least certain
/// cell, collapses it with a frequency-weighted draw and propagates the
/// consequences. Presentation is left to an [`OutputSink`].
pub struct Solver<S> {
    config: SolverConfig,
    patterns: PatternTable<S>,
    rules: AdjacencyRules,
    grid: ToroidalGrid,
    wave: WaveState,
    random_selector: RandomSelector,
    worklist: Worklist,
    status: SolverStatus,
    history: Vec<Collapse>,
    iteration: usize,
}

impl<S: Symbol> Solver<S> {
    /// Extract the model from a raster and prepare a fresh wave
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for this raster or
    /// pattern extraction fails
    pub fn new<R>(raster: &R, config: SolverConfig) -> Result<Self>
    where
        R: SymbolRaster<S> + ?Sized,
    {
        config.validate(raster.width(), raster.height())?;
        let patterns = PatternTable::extract(raster, config.pattern_size, config.symmetry)?;
        let rules = AdjacencyRules::build(&patterns);
        Self::from_model(patterns, rules, config)
    }

    /// Prepare a fresh wave over an already built model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output dimensions or tie-break epsilon are invalid
    /// - The pattern table is empty
    /// - The adjacency rules were built for a different pattern count
    pub fn from_model(
        patterns: PatternTable<S>,
        rules: AdjacencyRules,
        config: SolverConfig,
    ) -> Result<Self> {
        config.validate_output()?;
        if patterns.is_empty() {
            return Err(invalid_source(&"no patterns were extracted"));
        }
        if rules.pattern_count() != patterns.len() {
            return Err(invalid_parameter(
                "rules",
                &rules.pattern_count(),
                &format!("expected rules for {} patterns", patterns.len()),
            ));
        }

        let grid = ToroidalGrid::new(config.width, config.height);
        let mut random_selector = RandomSelector::new(config.seed);
        let wave = WaveState::new(grid.cell_count(), patterns.len(), &mut random_selector);
        let worklist = Worklist::new(grid.cell_count());

        tracing::debug!(
            width = config.width,
            height = config.height,
            patterns = patterns.len(),
            seed = config.seed,
            "initialized wave"
        );

        Ok(Self {
            config,
            patterns,
            rules,
            grid,
            wave,
            random_selector,
            worklist,
            status: SolverStatus::Running,
            history: Vec::with_capacity(grid.cell_count()),
            iteration: 0,
        })
    }

    /// Run parameters
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Extracted patterns and their frequencies
    pub const fn patterns(&self) -> &PatternTable<S> {
        &self.patterns
    }

    /// Adjacency relation between patterns
    pub const fn rules(&self) -> &AdjacencyRules {
        &self.rules
    }

    /// Output grid addressing
    pub const fn grid(&self) -> &ToroidalGrid {
        &self.grid
    }

    /// Current wave
    pub const fn wave(&self) -> &WaveState {
        &self.wave
    }

    /// Current lifecycle state
    pub const fn status(&self) -> SolverStatus {
        self.status
    }

    /// Collapses reported so far, in order
    pub fn history(&self) -> &[Collapse] {
        &self.history
    }

    /// Number of collapse attempts made
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    /// Advance the run by one collapse
    ///
    /// Once a terminal state is reached, further calls return it again
    /// without touching the wave.
    pub fn step(&mut self) -> StepOutcome {
        match self.status {
            SolverStatus::Complete => return StepOutcome::Complete,
            SolverStatus::Contradiction(contradiction) => {
                return StepOutcome::Contradiction(contradiction);
            }
            SolverStatus::Running => {}
        }

        let Some(cell) = observe(&self.wave) else {
            self.status = SolverStatus::Complete;
            tracing::info!(
                cells = self.grid.cell_count(),
                iterations = self.iteration,
                "wave fully collapsed"
            );
            return StepOutcome::Complete;
        };
        self.iteration += 1;

        let chosen = self.wave.domain(cell).and_then(|domain| {
            choose_pattern(domain, self.patterns.frequencies(), &mut self.random_selector)
        });
        let Some(pattern) = chosen else {
            return self.halt(Contradiction {
                cell,
                source: cell,
                direction: None,
                iteration: self.iteration,
            });
        };

        self.wave.collapse(cell, pattern);
        tracing::debug!(iteration = self.iteration, cell, pattern, "collapsed cell");

        self.worklist.push(cell);
        match propagate(
            &mut self.wave,
            &self.rules,
            &self.grid,
            &mut self.worklist,
            &mut self.random_selector,
            self.config.tie_break_epsilon,
        ) {
            Propagation::Stable(report) => {
                tracing::trace!(
                    visited = report.visited,
                    restricted = report.restricted,
                    "propagation settled"
                );
                let collapse = Collapse { cell, pattern };
                self.history.push(collapse);
                StepOutcome::Collapsed(collapse)
            }
            Propagation::Contradiction {
                source,
                cell: conflict,
                direction,
            } => self.halt(Contradiction {
                cell: conflict,
                source,
                direction: Some(direction),
                iteration: self.iteration,
            }),
        }
    }

    fn halt(&mut self, contradiction: Contradiction) -> StepOutcome {
        tracing::warn!(
            cell = contradiction.cell,
            source = contradiction.source,
            iteration = contradiction.iteration,
            collapsed = self.history.len(),
            "contradiction reached"
        );
        self.status = SolverStatus::Contradiction(contradiction);
        StepOutcome::Contradiction(contradiction)
    }

    /// Advance by one collapse and report it to `sink`
    pub fn step_with<K>(&mut self, sink: &mut K) -> StepOutcome
    where
        K: OutputSink<S> + ?Sized,
    {
        let outcome = self.step();
        if let StepOutcome::Collapsed(collapse) = outcome
            && let Some(pattern) = self.patterns.pattern(collapse.pattern)
        {
            sink.emit(collapse.cell, pattern);
        }
        outcome
    }

    /// Step until a terminal state or until `budget` collapses were made
    pub fn run<K>(&mut self, sink: &mut K, budget: Option<usize>) -> RunOutcome
    where
        K: OutputSink<S> + ?Sized,
    {
        let mut steps = 0;
        loop {
            let settled = self.wave.is_settled() || self.status.is_terminal();
            if !settled && budget.is_some_and(|limit| steps >= limit) {
                return RunOutcome::BudgetExhausted { steps };
            }

            match self.step_with(sink) {
                StepOutcome::Collapsed(_) => steps += 1,
                StepOutcome::Complete => return RunOutcome::Complete,
                StepOutcome::Contradiction(contradiction) => {
                    return RunOutcome::Contradiction(contradiction);
                }
            }
        }
    }

    /// Pattern index of every committed cell, `None` elsewhere
    ///
    /// Only collapses recorded in the history count. After a contradiction
    /// the cell collapsed in the failing step and any cells propagation
    /// narrowed to one pattern stay `None`, matching what the sink received.
    pub fn assignment(&self) -> Vec<Option<usize>> {
        let mut assignment = vec![None; self.grid.cell_count()];
        for collapse in &self.history {
            if let Some(slot) = assignment.get_mut(collapse.cell) {
                *slot = Some(collapse.pattern);
            }
        }
        assignment
    }

    /// Anchor symbol of every committed cell, shaped (height, width)
    pub fn anchor_grid(&self) -> Array2<Option<S>> {
        let assignment = self.assignment();
        Array2::from_shape_fn((self.grid.height(), self.grid.width()), |(y, x)| {
            let cell = self.grid.cell_index(x as isize, y as isize);
            assignment
                .get(cell)
                .copied()
                .flatten()
                .and_then(|pattern| self.patterns.pattern(pattern))
                .map(|pattern| pattern.anchor())
        })
    }
}
