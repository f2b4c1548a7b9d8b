#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Connectivity-preserving repair of over-wide passages.
//!
//! Carving, decimation and clearings can leave passages wider than a single
//! cell. The repairer finds 2×2 blocks whose settled qualities are all open
//! and raises one corner back into a wall, but only a corner whose closure
//! keeps every open cell around the block connected. Connectivity is checked
//! inside the 4×4 window that surrounds the block with one ring of padding.
//! Every neighbour of a corner lies inside that window, so a closure that
//! keeps the window's open cells connected cannot split open cells elsewhere.

use std::collections::VecDeque;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};
use shifting_maze_core::{Cell, CellRegion, CLOSED};
use shifting_maze_system_transitions::{OpennessField, Timing, WallManager};

const WINDOW: usize = 4;

/// Reports whether the cell is inside the field and its settled quality is passable.
#[must_use]
pub fn is_open(field: &OpennessField, cell: Cell) -> bool {
    field.is_open(cell)
}

/// Reports whether the 2×2 block whose lowest row and column is `origin` is fully open.
#[must_use]
pub fn is_open_2x2(field: &OpennessField, origin: Cell) -> bool {
    block_cells(origin)
        .into_iter()
        .all(|cell| is_open(field, cell))
}

/// Reports whether closing `corner` keeps every open cell of the 4×4 window
/// around the block at `origin` mutually reachable.
///
/// The flood fill starts from the block cell beside the corner in the same
/// row and never leaves the window. Corners outside the block are rejected.
#[must_use]
pub fn all_opens_reachable(field: &OpennessField, origin: Cell, corner: Cell) -> bool {
    if !block_cells(origin).contains(&corner) {
        return false;
    }

    let window_origin = origin.offset(-1, -1);
    let mut open = [[false; WINDOW]; WINDOW];
    let mut open_count = 0;
    for (row, line) in open.iter_mut().enumerate() {
        for (col, slot) in line.iter_mut().enumerate() {
            let cell = window_origin.offset(row as i32, col as i32);
            if cell != corner && is_open(field, cell) {
                *slot = true;
                open_count += 1;
            }
        }
    }

    let sibling_col = if corner.col() == origin.col() {
        origin.col() + 1
    } else {
        origin.col()
    };
    let start = Cell::new(corner.row(), sibling_col);
    let Some(start_slot) = window_slot(window_origin, start) else {
        return false;
    };
    if !open[start_slot.0][start_slot.1] {
        return open_count == 0;
    }

    let mut reached = [[false; WINDOW]; WINDOW];
    let mut reached_count = 1;
    reached[start_slot.0][start_slot.1] = true;
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.orthogonal_neighbors() {
            let Some((row, col)) = window_slot(window_origin, neighbor) else {
                continue;
            };
            if !open[row][col] || reached[row][col] {
                continue;
            }
            reached[row][col] = true;
            reached_count += 1;
            queue.push_back(neighbor);
        }
    }

    reached_count == open_count
}

/// Thins wide passages using a generator shared across every sweep.
#[derive(Debug)]
pub struct PathwayRepairer<R> {
    rng: R,
}

impl<R: Rng> PathwayRepairer<R> {
    /// Creates a repairer drawing its choices from `rng`.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Closes one safely removable corner of the block at `origin`.
    ///
    /// When the block is fully open, the corners that pass
    /// [`all_opens_reachable`] are collected and one is chosen uniformly. Its
    /// closure is scheduled over `timing` and its settled quality is raised at
    /// once so later checks in the same sweep treat it as a wall. Returns the
    /// closed cell, or `None` when the block was not open or no corner was safe.
    pub fn fix_2x2(
        &mut self,
        manager: &mut WallManager,
        origin: Cell,
        timing: Timing,
    ) -> Option<Cell> {
        if !is_open_2x2(manager.field(), origin) {
            return None;
        }

        let candidates: Vec<Cell> = block_cells(origin)
            .into_iter()
            .filter(|corner| all_opens_reachable(manager.field(), origin, *corner))
            .collect();
        let Some(&corner) = candidates.choose(&mut self.rng) else {
            trace!("wide pathway at {origin:?} has no safe corner");
            return None;
        };

        let _ = manager.block_interpolate(CellRegion::single(corner), timing, CLOSED);
        let _ = manager.field_mut().set_settled(corner, CLOSED);
        trace!(
            "closing {corner:?} of wide pathway at {origin:?} ({} candidates)",
            candidates.len()
        );
        Some(corner)
    }

    /// Sweeps every block origin inside `region` in row-major order.
    ///
    /// Origins outside the field are skipped without being visited. Returns
    /// the cells scheduled for closure.
    pub fn fix_wide_pathways(
        &mut self,
        manager: &mut WallManager,
        region: CellRegion,
        timing: Timing,
    ) -> Vec<Cell> {
        let field = manager.field();
        let origins = region.clamp_to(field.num_rows(), field.num_cols());
        let closed: Vec<Cell> = origins
            .cells()
            .filter_map(|origin| self.fix_2x2(manager, origin, timing))
            .collect();
        debug!(
            "wide pathway sweep over {region:?} closed {} cells",
            closed.len()
        );
        closed
    }
}

fn block_cells(origin: Cell) -> [Cell; 4] {
    [
        origin,
        origin.offset(0, 1),
        origin.offset(1, 0),
        origin.offset(1, 1),
    ]
}

fn window_slot(window_origin: Cell, cell: Cell) -> Option<(usize, usize)> {
    let row = usize::try_from(cell.row().checked_sub(window_origin.row())?).ok()?;
    let col = usize::try_from(cell.col().checked_sub(window_origin.col())?).ok()?;
    (row < WINDOW && col < WINDOW).then_some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_field(rows: u32, cols: u32) -> OpennessField {
        OpennessField::filled(rows, cols, 0.0).expect("field")
    }

    #[test]
    fn cells_outside_the_field_are_never_open() {
        let field = open_field(2, 2);
        assert!(is_open(&field, Cell::new(0, 0)));
        assert!(!is_open(&field, Cell::new(-1, 0)));
        assert!(is_open_2x2(&field, Cell::new(0, 0)));
        assert!(!is_open_2x2(&field, Cell::new(1, 1)));
    }

    #[test]
    fn any_corner_of_an_isolated_open_block_is_safe() {
        let mut field = OpennessField::filled(4, 4, 1.0).expect("field");
        for cell in block_cells(Cell::new(1, 1)) {
            let _ = field.settle(cell, 0.0);
        }

        for corner in block_cells(Cell::new(1, 1)) {
            assert!(all_opens_reachable(&field, Cell::new(1, 1), corner));
        }
    }

    #[test]
    fn corner_bridging_to_an_outer_cell_is_unsafe() {
        let mut field = OpennessField::filled(4, 4, 1.0).expect("field");
        for cell in block_cells(Cell::new(1, 1)) {
            let _ = field.settle(cell, 0.0);
        }
        let _ = field.settle(Cell::new(0, 1), 0.0);

        assert!(
            !all_opens_reachable(&field, Cell::new(1, 1), Cell::new(1, 1)),
            "closing the only link to (0, 1) must be rejected"
        );
        assert!(all_opens_reachable(&field, Cell::new(1, 1), Cell::new(2, 2)));
    }

    #[test]
    fn corners_outside_the_block_are_rejected() {
        let field = open_field(4, 4);
        assert!(!all_opens_reachable(&field, Cell::new(1, 1), Cell::new(0, 0)));
    }
}
