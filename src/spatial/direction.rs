//! Cardinal directions used by the adjacency model and constraint propagation
//!
//! The encoding is fixed: adjacency rules are stored per direction index and the
//! propagation step looks them up with the same index, so both sides must agree.

use std::fmt;

/// One of the four neighbors of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Negative x
    West,
    /// Positive x
    East,
    /// Negative y
    North,
    /// Positive y
    South,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Self; 4] = [Self::West, Self::East, Self::North, Self::South];

    /// Position of this direction in [`Direction::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::West => 0,
            Self::East => 1,
            Self::North => 2,
            Self::South => 3,
        }
    }

    /// Offset `(dx, dy)` to the neighboring cell
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::West => (-1, 0),
            Self::East => (1, 0),
            Self::North => (0, -1),
            Self::South => (0, 1),
        }
    }

    /// The direction pointing back from the neighbor
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::East => Self::West,
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::West => "west",
            Self::East => "east",
            Self::North => "north",
            Self::South => "south",
        };
        f.write_str(name)
    }
}
