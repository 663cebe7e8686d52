//! Fixed-origin square grid used to bucket posts.
//!
//! The grid is anchored at (0°, 0°) and only its cell size depends on the
//! viewport, so panning without zooming never reshuffles cluster membership.

use serde::{Deserialize, Serialize};

use crate::coord::Coordinate;

/// A cell of the clustering grid, addressed by row (latitude) and column
/// (longitude) index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Latitude index: `floor(lat / cell_size)`.
    pub row: i64,
    /// Longitude index: `floor(lon / cell_size)`.
    pub col: i64,
}

impl GridCell {
    /// Create a cell from explicit indices.
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Cell containing `coord` for a grid of the given size (degrees).
    ///
    /// `cell_size` must be positive; callers derive it from a validated span.
    #[inline]
    pub fn containing(coord: &Coordinate, cell_size: f64) -> Self {
        debug_assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            row: (coord.latitude / cell_size).floor() as i64,
            col: (coord.longitude / cell_size).floor() as i64,
        }
    }

    /// This cell and its eight neighbours.
    pub fn neighbourhood(&self) -> impl Iterator<Item = GridCell> {
        let (row, col) = (self.row, self.col);
        (-1..=1).flat_map(move |dr| (-1..=1).map(move |dc| GridCell::new(row + dr, col + dc)))
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}
