//! Spatial data structures and toroidal addressing
//!
//! This module contains spatial-related functionality including:
//! - Cardinal directions shared by adjacency building and propagation
//! - Row-major cell indexing with wraparound on both axes
//! - Window extraction and symmetry transformations

/// Cardinal directions and their offsets
pub mod direction;
/// Toroidal output grid addressing
pub mod grid;
/// Window extraction, rotation and reflection
pub mod window;

pub use direction::Direction;
pub use grid::ToroidalGrid;
