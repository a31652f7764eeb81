//! Square window extraction and symmetry transformations
//!
//! Windows are read from a raster with wraparound on both axes, so every
//! raster coordinate starts a full window even when the raster is smaller
//! than the window. Rotations and reflections multiply the sample data.

use crate::analysis::patterns::Symbol;
use crate::io::raster::SymbolRaster;
use ndarray::{Array2, Axis};

/// Which symmetry variants to generate for every extracted window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetryMode {
    /// Include the 90°, 180° and 270° rotations
    pub rotations: bool,
    /// Include the mirror image of every rotation
    pub reflections: bool,
}

impl SymmetryMode {
    /// All eight variants of the dihedral group
    pub const ALL: Self = Self {
        rotations: true,
        reflections: true,
    };

    /// The window as read, without transformations
    pub const NONE: Self = Self {
        rotations: false,
        reflections: false,
    };

    /// Number of variants produced per window (1, 2, 4 or 8)
    pub const fn variant_count(self) -> usize {
        let rotations = if self.rotations { 4 } else { 1 };
        let reflections = if self.reflections { 2 } else { 1 };
        rotations * reflections
    }
}

impl Default for SymmetryMode {
    fn default() -> Self {
        Self::ALL
    }
}

/// Read the `size` × `size` window whose top-left corner is `(x, y)`
///
/// Coordinates past the right or bottom edge wrap around. Returns `None` for
/// an empty raster or a raster that fails to yield an in-range symbol.
pub fn extract_toroidal<S, R>(raster: &R, x: usize, y: usize, size: usize) -> Option<Array2<S>>
where
    S: Symbol,
    R: SymbolRaster<S> + ?Sized,
{
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || height == 0 {
        return None;
    }

    let symbols = (0..size)
        .flat_map(|row| (0..size).map(move |col| (row, col)))
        .map(|(row, col)| raster.symbol((x + col) % width, (y + row) % height))
        .collect::<Option<Vec<S>>>()?;

    Array2::from_shape_vec((size, size), symbols).ok()
}

/// Rotate a window 90° clockwise
pub fn rotate_clockwise<S: Clone>(window: &Array2<S>) -> Array2<S> {
    // Reversing the rows then transposing maps (i, j) to (n - 1 - j, i)
    let mut view = window.view();
    view.invert_axis(Axis(0));
    view.reversed_axes().to_owned()
}

/// Mirror a window left to right
pub fn flip_horizontal<S: Clone>(window: &Array2<S>) -> Array2<S> {
    let mut view = window.view();
    view.invert_axis(Axis(1));
    view.to_owned()
}

/// Mirror a window top to bottom
pub fn flip_vertical<S: Clone>(window: &Array2<S>) -> Array2<S> {
    let mut view = window.view();
    view.invert_axis(Axis(0));
    view.to_owned()
}

/// Generate the symmetry variants of a window in a fixed order
///
/// The order is: identity, its mirror, 90° rotation, its mirror, and so on.
/// Variants are not deduplicated; symmetric windows contribute the same
/// pattern several times, which weights it accordingly.
pub fn symmetry_variants<S: Clone>(window: &Array2<S>, mode: SymmetryMode) -> Vec<Array2<S>> {
    let rotation_count = if mode.rotations { 4 } else { 1 };
    let mut variants = Vec::with_capacity(mode.variant_count());

    let mut current = window.clone();
    for _ in 0..rotation_count {
        let next = rotate_clockwise(&current);
        if mode.reflections {
            let mirrored = flip_horizontal(&current);
            variants.push(current);
            variants.push(mirrored);
        } else {
            variants.push(current);
        }
        current = next;
    }

    variants
}
