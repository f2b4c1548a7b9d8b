//! Continuous per-cell openness values seeded from a maze grid.

use shifting_maze_core::{is_passable, Cell, GridError, CLOSED, OPEN};
use shifting_maze_grid::Grid;

/// Dense openness field parallel to a [`Grid`].
///
/// Each cell carries two qualities in `[0, 1]`. The settled quality is the
/// value the cell rests at once every transition targeting it has completed;
/// scheduling and repair read it. The displayed quality follows in-flight
/// transitions and is what presentation adapters observe.
#[derive(Clone, Debug, PartialEq)]
pub struct OpennessField {
    num_rows: u32,
    num_cols: u32,
    settled: Vec<f32>,
    displayed: Vec<f32>,
}

impl OpennessField {
    /// Seeds a field from the grid: `1.0` for walls, `0.0` for maze cells.
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let settled: Vec<f32> = grid.states().iter().map(|state| state.quality()).collect();
        Self {
            num_rows: grid.num_rows(),
            num_cols: grid.num_cols(),
            displayed: settled.clone(),
            settled,
        }
    }

    /// Creates a field with every cell resting at the same quality.
    pub fn filled(num_rows: u32, num_cols: u32, quality: f32) -> Result<Self, GridError> {
        let grid = Grid::new(num_rows, num_cols)?;
        let quality = clamp_quality(quality);
        let count = grid.states().len();
        Ok(Self {
            num_rows,
            num_cols,
            settled: vec![quality; count],
            displayed: vec![quality; count],
        })
    }

    /// Number of rows covered by the field.
    #[must_use]
    pub const fn num_rows(&self) -> u32 {
        self.num_rows
    }

    /// Number of columns covered by the field.
    #[must_use]
    pub const fn num_cols(&self) -> u32 {
        self.num_cols
    }

    /// Reports whether the cell lies inside the field.
    #[must_use]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Settled quality of the cell, or `None` outside the field.
    #[must_use]
    pub fn settled(&self, cell: Cell) -> Option<f32> {
        self.index(cell).map(|index| self.settled[index])
    }

    /// Displayed quality of the cell, or `None` outside the field.
    #[must_use]
    pub fn displayed(&self, cell: Cell) -> Option<f32> {
        self.index(cell).map(|index| self.displayed[index])
    }

    /// Reports whether the cell's settled quality is passable.
    ///
    /// Cells outside the field are never open.
    #[must_use]
    pub fn is_open(&self, cell: Cell) -> bool {
        self.settled(cell).is_some_and(is_passable)
    }

    /// Overwrites the settled quality without touching the displayed value.
    pub fn set_settled(&mut self, cell: Cell, quality: f32) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.settled[index] = clamp_quality(quality);
                true
            }
            None => false,
        }
    }

    /// Overwrites the displayed quality without touching the settled value.
    pub fn set_displayed(&mut self, cell: Cell, quality: f32) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.displayed[index] = clamp_quality(quality);
                true
            }
            None => false,
        }
    }

    /// Rests the cell at `quality`, updating both settled and displayed values.
    pub fn settle(&mut self, cell: Cell, quality: f32) -> bool {
        match self.index(cell) {
            Some(index) => {
                let quality = clamp_quality(quality);
                self.settled[index] = quality;
                self.displayed[index] = quality;
                true
            }
            None => false,
        }
    }

    /// Iterates every cell with its displayed quality in row-major order.
    pub fn iter_displayed(&self) -> impl Iterator<Item = (Cell, f32)> + '_ {
        let width = self.num_cols as usize;
        self.displayed
            .iter()
            .enumerate()
            .map(move |(index, quality)| {
                let cell = Cell::new((index / width) as i32, (index % width) as i32);
                (cell, *quality)
            })
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let col = u32::try_from(cell.col()).ok()?;
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        let width = usize::try_from(self.num_cols).ok()?;
        Some(usize::try_from(row).ok()? * width + usize::try_from(col).ok()?)
    }
}

pub(crate) fn clamp_quality(quality: f32) -> f32 {
    if quality.is_nan() {
        return CLOSED;
    }
    quality.clamp(OPEN, CLOSED)
}
