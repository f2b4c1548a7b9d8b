#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shifting Maze engine.
//!
//! This crate defines the vocabulary that connects the maze grid, the wall
//! state systems and presentation adapters. The grid crate carves a layout of
//! [`CellState`] values, the transition systems animate a continuous openness
//! value per [`Cell`], and adapters observe the result exclusively through the
//! [`WallPresenter`] capability so the algorithmic core never depends on a
//! rendering engine.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Openness quality describing a fully raised wall.
pub const CLOSED: f32 = 1.0;

/// Openness quality describing a fully lowered, passable cell.
pub const OPEN: f32 = 0.0;

/// Location of a single grid cell expressed as row and column coordinates.
///
/// Coordinates are signed so that the neighbours of edge cells remain
/// representable; such cells simply fail the grid's validity predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: i32,
    col: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }

    /// Returns the cell displaced by the provided row and column offsets.
    #[must_use]
    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row.saturating_add(rows),
            col: self.col.saturating_add(cols),
        }
    }

    /// Orthogonal neighbours in scan order: up, left, right, down.
    #[must_use]
    pub const fn orthogonal_neighbors(self) -> [Cell; 4] {
        [
            self.offset(-1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(1, 0),
        ]
    }

    /// Cell mirrored through `self` from `other`, i.e. the cell on the far
    /// side of `self` when looking from `other`.
    #[must_use]
    pub const fn mirrored(self, other: Cell) -> Self {
        Self {
            row: self.row.saturating_sub(other.row.saturating_sub(self.row)),
            col: self.col.saturating_sub(other.col.saturating_sub(self.col)),
        }
    }
}

/// Binary state of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Impassable wall cell.
    Wall,
    /// Carved maze passage.
    Maze,
}

impl CellState {
    /// Openness quality a freshly seeded field assigns to this state.
    #[must_use]
    pub const fn quality(self) -> f32 {
        match self {
            Self::Wall => CLOSED,
            Self::Maze => OPEN,
        }
    }
}

/// Inclusive rectangle of cells expressed as row and column bounds.
///
/// A region whose last bound lies before its first bound on either axis is
/// empty. Regions are not tied to a grid; consumers skip cells that fall
/// outside their own bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRegion {
    first_row: i32,
    last_row: i32,
    first_col: i32,
    last_col: i32,
}

impl CellRegion {
    /// Constructs a region from inclusive row and column bounds.
    #[must_use]
    pub const fn from_bounds(first_row: i32, last_row: i32, first_col: i32, last_col: i32) -> Self {
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    /// Constructs a region from inclusive row and column ranges.
    #[must_use]
    pub fn new(rows: RangeInclusive<i32>, cols: RangeInclusive<i32>) -> Self {
        Self::from_bounds(*rows.start(), *rows.end(), *cols.start(), *cols.end())
    }

    /// Region covering exactly one cell.
    #[must_use]
    pub const fn single(cell: Cell) -> Self {
        Self::from_bounds(cell.row(), cell.row(), cell.col(), cell.col())
    }

    /// First row included in the region.
    #[must_use]
    pub const fn first_row(&self) -> i32 {
        self.first_row
    }

    /// Last row included in the region.
    #[must_use]
    pub const fn last_row(&self) -> i32 {
        self.last_row
    }

    /// First column included in the region.
    #[must_use]
    pub const fn first_col(&self) -> i32 {
        self.first_col
    }

    /// Last column included in the region.
    #[must_use]
    pub const fn last_col(&self) -> i32 {
        self.last_col
    }

    /// Inclusive range of rows covered by the region.
    #[must_use]
    pub fn rows(&self) -> RangeInclusive<i32> {
        self.first_row..=self.last_row
    }

    /// Inclusive range of columns covered by the region.
    #[must_use]
    pub fn cols(&self) -> RangeInclusive<i32> {
        self.first_col..=self.last_col
    }

    /// Reports whether the region contains no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_row < self.first_row || self.last_col < self.first_col
    }

    /// Number of cells covered by the region.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let rows = i64::from(self.last_row) - i64::from(self.first_row) + 1;
        let cols = i64::from(self.last_col) - i64::from(self.first_col) + 1;
        usize::try_from(rows.saturating_mul(cols)).unwrap_or(usize::MAX)
    }

    /// Reports whether the cell lies inside the region.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row() >= self.first_row
            && cell.row() <= self.last_row
            && cell.col() >= self.first_col
            && cell.col() <= self.last_col
    }

    /// Shrinks the region by `amount` cells on every side.
    #[must_use]
    pub const fn inset(self, amount: i32) -> Self {
        Self {
            first_row: self.first_row.saturating_add(amount),
            last_row: self.last_row.saturating_sub(amount),
            first_col: self.first_col.saturating_add(amount),
            last_col: self.last_col.saturating_sub(amount),
        }
    }

    /// Intersects the region with a `num_rows`×`num_cols` lattice anchored at the origin.
    #[must_use]
    pub fn clamp_to(self, num_rows: u32, num_cols: u32) -> Self {
        let last_row = i32::try_from(num_rows).unwrap_or(i32::MAX).saturating_sub(1);
        let last_col = i32::try_from(num_cols).unwrap_or(i32::MAX).saturating_sub(1);
        Self {
            first_row: self.first_row.max(0),
            last_row: self.last_row.min(last_row),
            first_col: self.first_col.max(0),
            last_col: self.last_col.min(last_col),
        }
    }

    /// Iterates the region's cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols();
        self.rows()
            .flat_map(move |row| cols.clone().map(move |col| Cell::new(row, col)))
    }
}

/// Construction-time failures raised when building grids or fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// One of the requested dimensions was zero.
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    EmptyDimensions {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        cols: u32,
    },
    /// The requested dimensions cannot be addressed with signed cell coordinates.
    #[error("grid dimensions {rows}x{cols} exceed the addressable cell range")]
    DimensionsTooLarge {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        cols: u32,
    },
    /// A cell buffer did not match the declared dimensions.
    #[error("expected {expected} cell states, got {actual}")]
    CellCountMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
}

/// Capability implemented by the presentation layer to mirror wall motion.
///
/// The transition scheduler calls into this trait every time a cell's
/// displayed openness changes. Implementations translate the value into
/// whatever their engine requires.
pub trait WallPresenter {
    /// Reports the displayed openness quality of a cell in `[0, 1]`.
    fn set_openness(&mut self, cell: Cell, quality: f32);

    /// Reports whether the cell should currently be drawn as a wall.
    fn set_visible(&mut self, cell: Cell, visible: bool);
}

impl<P: WallPresenter + ?Sized> WallPresenter for &mut P {
    fn set_openness(&mut self, cell: Cell, quality: f32) {
        (**self).set_openness(cell, quality);
    }

    fn set_visible(&mut self, cell: Cell, visible: bool) {
        (**self).set_visible(cell, visible);
    }
}

/// Presenter that discards every update, for headless callers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl WallPresenter for NullPresenter {
    fn set_openness(&mut self, _cell: Cell, _quality: f32) {}

    fn set_visible(&mut self, _cell: Cell, _visible: bool) {}
}

/// Physical dimensions used to place wall blocks in world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallGeometry {
    wall_height: f32,
    cell_size: f32,
}

impl WallGeometry {
    /// Creates a geometry description from a wall height and horizontal cell size.
    #[must_use]
    pub const fn new(wall_height: f32, cell_size: f32) -> Self {
        Self {
            wall_height,
            cell_size,
        }
    }

    /// Height of a fully raised wall measured in world units.
    #[must_use]
    pub const fn wall_height(&self) -> f32 {
        self.wall_height
    }

    /// Width and depth of a single cell measured in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Vertical centre of a wall block drawn at the provided openness quality.
    ///
    /// A closed wall (`1.0`) sits with its base on the floor; an open cell
    /// (`0.0`) is sunk entirely below it.
    #[must_use]
    pub fn vertical_position(&self, quality: f32) -> f32 {
        -self.wall_height / 2.0 + quality * self.wall_height
    }

    /// Horizontal centre of the cell as `(x, z)`, with columns along `x`.
    #[must_use]
    pub fn cell_centre(&self, cell: Cell) -> (f32, f32) {
        let half = self.cell_size / 2.0;
        (
            cell.col() as f32 * self.cell_size + half,
            cell.row() as f32 * self.cell_size + half,
        )
    }
}

impl Default for WallGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Reports whether an openness quality counts as passable.
#[must_use]
pub fn is_passable(quality: f32) -> bool {
    quality <= OPEN
}
