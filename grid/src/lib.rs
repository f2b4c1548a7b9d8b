#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze grid for Shifting Maze.
//!
//! The grid stores one [`CellState`] per lattice position. It starts fully
//! walled, is carved by [`Grid::randomized_prim`] and optionally loosened by
//! [`Grid::decimate`], and is read-only from then on. Every query is total:
//! coordinates outside the lattice behave like walls that have already been
//! visited, so growth algorithms never select them.

mod carving;
mod decimation;

pub use decimation::Decimation;

use shifting_maze_core::{Cell, CellState, GridError};

/// Dense row-major grid of wall and maze cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    num_rows: u32,
    num_cols: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell walled.
    pub fn new(num_rows: u32, num_cols: u32) -> Result<Self, GridError> {
        let count = cell_count(num_rows, num_cols)?;
        Ok(Self {
            num_rows,
            num_cols,
            cells: vec![CellState::Wall; count],
        })
    }

    /// Rebuilds a grid from row-major cell states, e.g. an imported layout.
    pub fn from_states(
        num_rows: u32,
        num_cols: u32,
        cells: Vec<CellState>,
    ) -> Result<Self, GridError> {
        let expected = cell_count(num_rows, num_cols)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            num_rows,
            num_cols,
            cells,
        })
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn num_rows(&self) -> u32 {
        self.num_rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn num_cols(&self) -> u32 {
        self.num_cols
    }

    /// Cell states stored in row-major order.
    #[must_use]
    pub fn states(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterates every cell coordinate alongside its state in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        let width = self.num_cols as usize;
        self.cells.iter().enumerate().map(move |(index, state)| {
            let row = (index / width) as i32;
            let col = (index % width) as i32;
            (Cell::new(row, col), *state)
        })
    }

    /// Reports whether both coordinates fall inside the grid.
    #[must_use]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// State of the cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn state(&self, cell: Cell) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Carves the cell into the maze, returning whether the cell was valid.
    pub fn mark_cell(&mut self, cell: Cell) -> bool {
        self.set_state(cell, CellState::Maze)
    }

    /// Collects the orthogonal neighbours that are valid and still walled.
    #[must_use]
    pub fn get_walls(&self, cell: Cell) -> Vec<Cell> {
        cell.orthogonal_neighbors()
            .into_iter()
            .filter(|neighbor| self.state(*neighbor) == Some(CellState::Wall))
            .collect()
    }

    /// Reports whether the cell is out of range or already part of the maze.
    #[must_use]
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.state(cell).map_or(true, |state| state == CellState::Maze)
    }

    /// Reports whether the cell is valid and part of the maze.
    #[must_use]
    pub fn is_maze(&self, cell: Cell) -> bool {
        self.state(cell) == Some(CellState::Maze)
    }

    /// Reports whether the cell is out of range or walled.
    #[must_use]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.state(cell).map_or(true, |state| state == CellState::Wall)
    }

    /// Locates the two cells separated by the provided wall.
    ///
    /// The first orthogonal maze neighbour in scan order (up, left, right,
    /// down) is returned together with the cell mirrored through the wall
    /// from it. The mirrored cell may lie outside the grid. Returns an empty
    /// vector when no orthogonal neighbour belongs to the maze.
    #[must_use]
    pub fn divided_cells(&self, wall: Cell) -> Vec<Cell> {
        cell_neighbors_in_maze(self, wall)
            .map(|maze_side| vec![maze_side, wall.mirrored(maze_side)])
            .unwrap_or_default()
    }

    /// Number of walled cells in the grid.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|state| **state == CellState::Wall)
            .count()
    }

    /// Number of carved maze cells in the grid.
    #[must_use]
    pub fn maze_count(&self) -> usize {
        self.cells.len() - self.wall_count()
    }

    fn set_state(&mut self, cell: Cell, state: CellState) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = state;
                true
            }
            None => false,
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let col = u32::try_from(cell.col()).ok()?;
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        let width = usize::try_from(self.num_cols).ok()?;
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        Some(row * width + col)
    }
}

fn cell_neighbors_in_maze(grid: &Grid, wall: Cell) -> Option<Cell> {
    wall.orthogonal_neighbors()
        .into_iter()
        .find(|neighbor| grid.is_maze(*neighbor))
}

fn cell_count(num_rows: u32, num_cols: u32) -> Result<usize, GridError> {
    if num_rows == 0 || num_cols == 0 {
        return Err(GridError::EmptyDimensions {
            rows: num_rows,
            cols: num_cols,
        });
    }

    let too_large = GridError::DimensionsTooLarge {
        rows: num_rows,
        cols: num_cols,
    };
    if i32::try_from(num_rows).is_err() || i32::try_from(num_cols).is_err() {
        return Err(too_large);
    }

    let rows = usize::try_from(num_rows).map_err(|_| too_large)?;
    let cols = usize::try_from(num_cols).map_err(|_| too_large)?;
    rows.checked_mul(cols).ok_or(too_large)
}
