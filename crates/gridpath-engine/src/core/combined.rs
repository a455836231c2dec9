use std::fmt;

use super::{Cell, GridState};

/// Returns the integer square root of `n` if `n` is a perfect square.
#[must_use]
pub fn exact_sqrt(n: usize) -> Option<usize> {
    let root = n.isqrt();
    (root * root == n).then_some(root)
}

/// The grids of a whole cohort tiled into one square picture.
///
/// Agent `i` of a cohort with `k × k` agents occupies tile row `i / k` and tile column
/// `i % k`. Every tile is one agent grid, so the combined side is `k * grid_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedGrid {
    tiles_per_side: usize,
    grid_size: usize,
    cells: Vec<Cell>,
}

impl CombinedGrid {
    /// Tiles `grids` together.
    ///
    /// Returns `None` if the grid count has no integer square root or if the grids do not
    /// all have the same size.
    pub fn compose<'a, I>(grids: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GridState>,
    {
        let grids = grids.into_iter().collect::<Vec<_>>();
        let tiles_per_side = exact_sqrt(grids.len()).filter(|k| *k > 0)?;
        let grid_size = usize::from(grids[0].size());
        if grids.iter().any(|g| usize::from(g.size()) != grid_size) {
            return None;
        }

        let side = tiles_per_side * grid_size;
        let mut cells = vec![Cell::Empty; side * side];
        for (i, grid) in grids.iter().enumerate() {
            let (tile_row, tile_col) = (i / tiles_per_side, i % tiles_per_side);
            for (y, row) in grid.rows().enumerate() {
                let offset = (tile_row * grid_size + y) * side + tile_col * grid_size;
                cells[offset..offset + grid_size].copy_from_slice(row);
            }
        }

        Some(Self {
            tiles_per_side,
            grid_size,
            cells,
        })
    }

    /// Number of tiles along one side.
    #[must_use]
    pub const fn tiles_per_side(&self) -> usize {
        self.tiles_per_side
    }

    /// Side of a single tile in cells.
    #[must_use]
    pub const fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Side of the combined picture in cells.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.tiles_per_side * self.grid_size
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        let side = self.side();
        (x < side && y < side).then(|| self.cells[y * side + x])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.side())
    }
}

impl fmt::Display for CombinedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
