//! Rectangular room compositions built from block and outline transitions.

use shifting_maze_core::{CellRegion, CLOSED, OPEN};

use crate::{Timing, WallManager};

/// Lowers every cell of `region`.
pub fn create_clearing(manager: &mut WallManager, region: CellRegion, timing: Timing) -> usize {
    manager.block_interpolate(region, timing, OPEN)
}

/// Raises the border of `region` and lowers everything inside it.
pub fn create_walled_clearing(
    manager: &mut WallManager,
    region: CellRegion,
    timing: Timing,
) -> usize {
    let walls = manager.outline_interpolate(region, timing, CLOSED);
    walls + create_clearing(manager, region.inset(1), timing)
}

/// Lowers the border of `region` and places a walled clearing one ring inside.
///
/// The result is a walled room surrounded by an open moat.
pub fn create_cleared_walled_clearing(
    manager: &mut WallManager,
    region: CellRegion,
    timing: Timing,
) -> usize {
    let moat = manager.outline_interpolate(region, timing, OPEN);
    moat + create_walled_clearing(manager, region.inset(1), timing)
}
