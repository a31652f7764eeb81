//! Output grid addressing with wraparound on both axes
//!
//! Cells are identified by a single row-major index in `[0, width * height)`.
//! Every cell has exactly four neighbors; stepping off an edge re-enters on the
//! opposite side.

use crate::spatial::direction::Direction;

/// Dimensions of a toroidal output grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToroidalGrid {
    width: usize,
    height: usize,
}

impl ToroidalGrid {
    /// Create a grid of `width` columns and `height` rows
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Convert a cell index to `(x, y)` coordinates
    pub const fn coordinates(&self, cell: usize) -> (usize, usize) {
        if self.width == 0 {
            return (0, 0);
        }
        (cell % self.width, cell / self.width)
    }

    /// Convert coordinates to a cell index, wrapping both axes
    pub fn cell_index(&self, x: isize, y: isize) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        let wrapped_x = x.rem_euclid(self.width as isize) as usize;
        let wrapped_y = y.rem_euclid(self.height as isize) as usize;
        wrapped_y * self.width + wrapped_x
    }

    /// Index of the neighbor of `cell` in `direction`
    pub fn neighbor(&self, cell: usize, direction: Direction) -> usize {
        let (x, y) = self.coordinates(cell);
        let (dx, dy) = direction.offset();
        self.cell_index(x as isize + dx, y as isize + dy)
    }

    /// All four neighbors of `cell`, paired with the direction leading to them
    pub fn neighbors(&self, cell: usize) -> impl Iterator<Item = (Direction, usize)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, self.neighbor(cell, direction)))
    }
}
