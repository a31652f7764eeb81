//! Overlapping-model wave function collapse for texture synthesis
//!
//! The system extracts every N×N window of a small sample (with wraparound and
//! optional rotations and reflections), derives which patterns may sit next to
//! each other, and fills a toroidal output grid one cell at a time while
//! constraint propagation keeps every remaining choice consistent.

#![forbid(unsafe_code)]

/// Solver state, observation, collapse and constraint propagation
pub mod algorithm;
/// Pattern extraction and adjacency analysis of the input sample
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Directions, toroidal addressing and window transformations
pub mod spatial;

pub use algorithm::executor::{RunOutcome, Solver, SolverConfig, SolverStatus, StepOutcome};
pub use io::error::{Result, SynthesisError};
