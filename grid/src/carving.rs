//! Randomized Prim maze carving.

use log::debug;
use rand::Rng;
use shifting_maze_core::{Cell, GridError};

use crate::Grid;

impl Grid {
    /// Carves a spanning-tree maze with randomized frontier growth.
    ///
    /// Growth starts at `start`. Each step picks a random frontier wall and
    /// carves it, together with the unvisited cell beyond it, only when the
    /// wall separates the maze from unvisited territory. Walls whose divided
    /// cells are both visited would close a loop and are discarded, so every
    /// carved cell is joined to the start by exactly one path.
    ///
    /// An out-of-range start leaves the grid fully walled.
    pub fn randomized_prim<R>(
        num_rows: u32,
        num_cols: u32,
        start: Cell,
        rng: &mut R,
    ) -> Result<Self, GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Self::new(num_rows, num_cols)?;
        if !grid.mark_cell(start) {
            debug!("carving skipped: start {start:?} lies outside {num_rows}x{num_cols}");
            return Ok(grid);
        }

        let mut frontier = grid.get_walls(start);
        let mut carved_walls = 0_usize;
        let mut discarded_walls = 0_usize;

        while !frontier.is_empty() {
            let index = rng.gen_range(0..frontier.len());
            let wall = frontier.swap_remove(index);

            let divided = grid.divided_cells(wall);
            let [first, second] = divided.as_slice() else {
                discarded_walls += 1;
                continue;
            };

            let unvisited = match (grid.is_visited(*first), grid.is_visited(*second)) {
                (true, true) => {
                    discarded_walls += 1;
                    continue;
                }
                (true, false) => *second,
                (false, _) => *first,
            };

            let _ = grid.mark_cell(wall);
            let _ = grid.mark_cell(unvisited);
            frontier.extend(grid.get_walls(unvisited));
            carved_walls += 1;
        }

        debug!(
            "carved {num_rows}x{num_cols} maze from {start:?}: {carved_walls} passages, \
             {discarded_walls} frontier walls discarded, {} maze cells",
            grid.maze_count()
        );
        Ok(grid)
    }
}
