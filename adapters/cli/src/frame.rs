//! Terminal presenter that mirrors wall motion into a printable frame.

use serde::Serialize;
use shifting_maze_core::{Cell, WallGeometry, WallPresenter, CLOSED, OPEN};
use shifting_maze_system_transitions::OpennessField;

/// Last state reported for every cell of the field.
#[derive(Clone, Debug)]
pub(crate) struct FrameRecorder {
    num_rows: u32,
    num_cols: u32,
    openness: Vec<f32>,
    visible: Vec<bool>,
}

/// Serialised form of one cell in the `json` output.
#[derive(Debug, Serialize)]
pub(crate) struct CellFrame {
    row: i32,
    col: i32,
    openness: f32,
    visible: bool,
    x: f32,
    y: f32,
    z: f32,
}

impl FrameRecorder {
    /// Seeds the frame from the field's displayed values.
    #[must_use]
    pub(crate) fn new(field: &OpennessField) -> Self {
        let (openness, visible) = field
            .iter_displayed()
            .map(|(_, quality)| (quality, quality > OPEN))
            .unzip();
        Self {
            num_rows: field.num_rows(),
            num_cols: field.num_cols(),
            openness,
            visible,
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let row = u32::try_from(cell.row()).ok()?;
        let col = u32::try_from(cell.col()).ok()?;
        (row < self.num_rows && col < self.num_cols)
            .then(|| row as usize * self.num_cols as usize + col as usize)
    }

    fn cells(&self) -> impl Iterator<Item = (Cell, f32, bool)> + '_ {
        let num_cols = self.num_cols as usize;
        self.openness
            .iter()
            .zip(&self.visible)
            .enumerate()
            .map(move |(index, (&quality, &visible))| {
                let cell = Cell::new((index / num_cols) as i32, (index % num_cols) as i32);
                (cell, quality, visible)
            })
    }

    /// Renders one character per cell, one line per row.
    #[must_use]
    pub(crate) fn render_ascii(&self) -> String {
        let mut output = String::with_capacity(self.openness.len() + self.num_rows as usize);
        for (cell, quality, visible) in self.cells() {
            let glyph = if !visible {
                '.'
            } else if quality >= CLOSED {
                '#'
            } else {
                '+'
            };
            output.push(glyph);
            if cell.col() as u32 + 1 == self.num_cols {
                output.push('\n');
            }
        }
        output
    }

    /// Builds the per-cell records placed in world space by `geometry`.
    #[must_use]
    pub(crate) fn frames(&self, geometry: WallGeometry) -> Vec<CellFrame> {
        self.cells()
            .map(|(cell, openness, visible)| {
                let (x, z) = geometry.cell_centre(cell);
                CellFrame {
                    row: cell.row(),
                    col: cell.col(),
                    openness,
                    visible,
                    x,
                    y: geometry.vertical_position(openness),
                    z,
                }
            })
            .collect()
    }
}

impl WallPresenter for FrameRecorder {
    fn set_openness(&mut self, cell: Cell, quality: f32) {
        if let Some(index) = self.index(cell) {
            self.openness[index] = quality;
        }
    }

    fn set_visible(&mut self, cell: Cell, visible: bool) {
        if let Some(index) = self.index(cell) {
            self.visible[index] = visible;
        }
    }
}
