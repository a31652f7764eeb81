//! Output sinks receive collapsed cells in collapse order
//!
//! The solver never renders anything itself. A driver passes a sink to
//! [`Solver::step_with`](crate::algorithm::executor::Solver::step_with) or
//! [`Solver::run`](crate::algorithm::executor::Solver::run) and the sink is
//! told about each cell exactly once, after its propagation succeeded.

use crate::analysis::patterns::{Pattern, Symbol};

/// Receiver for collapsed cells
pub trait OutputSink<S> {
    /// Called once per collapsed cell with the pattern it was committed to
    fn emit(&mut self, cell: usize, pattern: &Pattern<S>);
}

impl<S, T: OutputSink<S> + ?Sized> OutputSink<S> for &mut T {
    fn emit(&mut self, cell: usize, pattern: &Pattern<S>) {
        (**self).emit(cell, pattern);
    }
}

impl<S, T: OutputSink<S>> OutputSink<S> for Option<T> {
    fn emit(&mut self, cell: usize, pattern: &Pattern<S>) {
        if let Some(sink) = self {
            sink.emit(cell, pattern);
        }
    }
}

impl<S, A: OutputSink<S>, B: OutputSink<S>> OutputSink<S> for (A, B) {
    fn emit(&mut self, cell: usize, pattern: &Pattern<S>) {
        self.0.emit(cell, pattern);
        self.1.emit(cell, pattern);
    }
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<S> OutputSink<S> for NullSink {
    fn emit(&mut self, _cell: usize, _pattern: &Pattern<S>) {}
}

/// Sink that keeps `(cell, anchor symbol)` pairs in emission order
#[derive(Debug, Clone)]
pub struct CollapseRecorder<S> {
    events: Vec<(usize, S)>,
}

impl<S> Default for CollapseRecorder<S> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<S: Symbol> CollapseRecorder<S> {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in emission order
    pub fn events(&self) -> &[(usize, S)] {
        &self.events
    }

    /// Cell indices in emission order
    pub fn cells(&self) -> Vec<usize> {
        self.events.iter().map(|&(cell, _)| cell).collect()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<S: Symbol> OutputSink<S> for CollapseRecorder<S> {
    fn emit(&mut self, cell: usize, pattern: &Pattern<S>) {
        self.events.push((cell, pattern.anchor()));
    }
}
