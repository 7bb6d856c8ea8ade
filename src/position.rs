use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub(crate) type Coord = usize;
/// Side length of a square board.
pub type Dimension = NonZero<Coord>;

/// A position `(row, col)` on a board. The top left corner is `Position::new(0, 0)`.
///
/// Displays 1-indexed, as players see it: `Position::new(0, 2)` prints as `(1,3)`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    /// Zero-indexed row.
    pub row: Coord,
    /// Zero-indexed column.
    pub col: Coord,
}

impl Position {
    /// Construct a position from a zero-indexed row and column.
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.row, self.col)
    }

    pub(crate) fn within(&self, size: Dimension) -> bool {
        self.row < size.get() && self.col < size.get()
    }
}

impl From<(Ix, Ix)> for Position {
    fn from(value: (Ix, Ix)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row + 1, self.col + 1)
    }
}
