//! Regular square-cell grid geometry.

use crate::error::SpaceError;
use smallvec::SmallVec;

/// A regular grid of square cells laid over projected coordinates (metres).
///
/// Cell `(row, col)` covers `x` in `[x_min + col·w, x_min + (col+1)·w)` and
/// `y` in `[y_min + row·w, y_min + (row+1)·w)`. Cells are stored row-major:
/// flat index `row * cols + col`.
///
/// Interior cells are those not on the outermost ring. Diffusion only
/// updates interior cells, so the outer ring acts as an absorbing boundary.
///
/// # Examples
///
/// ```
/// use vectra_space::GridGeometry;
///
/// let g = GridGeometry::new(0.0, 0.0, 5000.0, 4, 6).unwrap();
/// assert_eq!(g.cell_count(), 24);
/// assert_eq!(g.cell_of(7_500.0, 12_000.0), Some(2 * 6 + 1));
/// assert_eq!(g.cell_of(-1.0, 0.0), None);
/// assert!(g.is_interior(g.flat(1, 1)));
/// assert!(!g.is_interior(g.flat(0, 3)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    x_min: f64,
    y_min: f64,
    cell_width: f64,
    rows: usize,
    cols: usize,
}

impl GridGeometry {
    /// Create a grid with its lower-left corner at `(x_min, y_min)`.
    ///
    /// Returns `Err(SpaceError::EmptyGrid)` if either dimension is 0, or
    /// `Err(SpaceError::InvalidCellWidth)` for a non-positive width.
    pub fn new(
        x_min: f64,
        y_min: f64,
        cell_width: f64,
        rows: usize,
        cols: usize,
    ) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if !cell_width.is_finite() || cell_width <= 0.0 {
            return Err(SpaceError::InvalidCellWidth { width: cell_width });
        }
        Ok(Self {
            x_min,
            y_min,
            cell_width,
            rows,
            cols,
        })
    }

    /// Number of rows (northing axis).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (easting axis).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Side length of one cell.
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of `(row, col)`.
    pub fn flat(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.rows && col < self.cols);
        row * self.cols + col
    }

    /// `(row, col)` of a flat index.
    pub fn row_col(&self, cell: usize) -> (usize, usize) {
        (cell / self.cols, cell % self.cols)
    }

    /// The cell containing point `(x, y)`, or `None` outside the grid.
    pub fn cell_of(&self, x: f64, y: f64) -> Option<usize> {
        let col = ((x - self.x_min) / self.cell_width).floor();
        let row = ((y - self.y_min) / self.cell_width).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.flat(row, col))
    }

    /// Coordinates of the centre of a cell.
    pub fn cell_centre(&self, cell: usize) -> (f64, f64) {
        let (row, col) = self.row_col(cell);
        (
            self.x_min + (col as f64 + 0.5) * self.cell_width,
            self.y_min + (row as f64 + 0.5) * self.cell_width,
        )
    }

    /// Whether a cell lies off the outermost ring.
    pub fn is_interior(&self, cell: usize) -> bool {
        let (row, col) = self.row_col(cell);
        row > 0 && col > 0 && row + 1 < self.rows && col + 1 < self.cols
    }

    /// Flat indices of all interior cells in row-major order.
    pub fn interior_cells(&self) -> impl Iterator<Item = usize> + '_ {
        let rows = self.rows.saturating_sub(1);
        let cols = self.cols.saturating_sub(1);
        (1..rows).flat_map(move |r| (1..cols).map(move |c| r * self.cols + c))
    }

    /// Flat indices of the in-grid 4-connected neighbours of a cell
    /// (north, south, west, east).
    pub fn neighbours(&self, cell: usize) -> SmallVec<[usize; 4]> {
        let (row, col) = self.row_col(cell);
        let mut out = SmallVec::new();
        if row > 0 {
            out.push(cell - self.cols);
        }
        if row + 1 < self.rows {
            out.push(cell + self.cols);
        }
        if col > 0 {
            out.push(cell - 1);
        }
        if col + 1 < self.cols {
            out.push(cell + 1);
        }
        out
    }
}
