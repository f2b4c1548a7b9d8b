use std::collections::{HashSet, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shifting_maze_core::{Cell, CellState};
use shifting_maze_grid::Grid;

fn open_cells(grid: &Grid) -> HashSet<Cell> {
    grid.iter()
        .filter(|(_, state)| *state == CellState::Maze)
        .map(|(cell, _)| cell)
        .collect()
}

fn reachable_from(start: Cell, open: &HashSet<Cell>) -> HashSet<Cell> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    if open.contains(&start) {
        let _ = seen.insert(start);
        queue.push_back(start);
    }
    while let Some(cell) = queue.pop_front() {
        for neighbor in cell.orthogonal_neighbors() {
            if open.contains(&neighbor) && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    seen
}

fn adjacent_open_pairs(open: &HashSet<Cell>) -> usize {
    open.iter()
        .map(|cell| {
            [cell.offset(0, 1), cell.offset(1, 0)]
                .into_iter()
                .filter(|neighbor| open.contains(neighbor))
                .count()
        })
        .sum()
}

#[test]
fn carved_maze_is_a_connected_tree() {
    for (seed, rows, cols) in [(1, 9, 9), (7, 15, 21), (42, 10, 13), (99, 2, 7)] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = Grid::randomized_prim(rows, cols, Cell::new(0, 0), &mut rng).expect("grid");
        let open = open_cells(&grid);

        assert!(open.len() > 1, "a {rows}x{cols} maze should carve passages");
        assert_eq!(
            reachable_from(Cell::new(0, 0), &open).len(),
            open.len(),
            "every carved cell must be reachable from the start (seed {seed})"
        );
        assert_eq!(
            adjacent_open_pairs(&open),
            open.len() - 1,
            "carved cells must form a tree without loops (seed {seed})"
        );
    }
}

#[test]
fn removing_any_passage_disconnects_the_maze() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let grid = Grid::randomized_prim(7, 7, Cell::new(0, 0), &mut rng).expect("grid");
    let open = open_cells(&grid);

    for cell in open.iter().filter(|cell| (cell.row() + cell.col()) % 2 == 1) {
        let mut without = open.clone();
        let _ = without.remove(cell);
        let survivor = *without.iter().next().expect("other cells remain");
        assert!(
            reachable_from(survivor, &without).len() < without.len(),
            "passage {cell:?} should be a bridge of the spanning tree"
        );
    }
}

#[test]
fn carving_from_an_interior_start_spans_from_that_cell() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let start = Cell::new(3, 4);
    let grid = Grid::randomized_prim(8, 9, start, &mut rng).expect("grid");
    let open = open_cells(&grid);

    assert!(grid.is_maze(start));
    assert_eq!(reachable_from(start, &open).len(), open.len());
    assert_eq!(adjacent_open_pairs(&open), open.len() - 1);
}

#[test]
fn single_cell_grid_opens_only_the_start() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let grid = Grid::randomized_prim(1, 1, Cell::new(0, 0), &mut rng).expect("grid");

    assert_eq!(grid.maze_count(), 1);
    assert!(grid.is_maze(Cell::new(0, 0)));
}

#[test]
fn invalid_start_leaves_the_grid_walled() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let grid = Grid::randomized_prim(5, 5, Cell::new(5, 0), &mut rng).expect("grid");

    assert_eq!(grid.maze_count(), 0, "out-of-range start must be a no-op");
}

#[test]
fn carving_is_reproducible_for_a_fixed_seed() {
    let first = Grid::randomized_prim(
        12,
        17,
        Cell::new(0, 0),
        &mut ChaCha8Rng::seed_from_u64(2024),
    )
    .expect("grid");
    let second = Grid::randomized_prim(
        12,
        17,
        Cell::new(0, 0),
        &mut ChaCha8Rng::seed_from_u64(2024),
    )
    .expect("grid");

    assert_eq!(first, second, "carving diverged between identical seeds");
}

#[test]
fn decimation_bounds_hold_for_both_rounding_modes() {
    for allow_ratio_high in [false, true] {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut grid = Grid::randomized_prim(9, 9, Cell::new(0, 0), &mut rng).expect("grid");
        let walls = grid.wall_count();

        let nothing = grid.decimate_with_report(0.0, allow_ratio_high, &mut rng);
        assert_eq!(nothing.removed, 0);
        assert_eq!(grid.wall_count(), walls, "ratio 0 must not remove walls");

        let everything = grid.decimate_with_report(1.0, allow_ratio_high, &mut rng);
        assert_eq!(everything.removed, walls);
        assert_eq!(grid.wall_count(), 0, "ratio 1 must remove every wall");
        assert_eq!(everything.targeted, 1.0);
    }
}

#[test]
fn decimation_reports_the_targeted_ratio() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut grid = Grid::new(2, 5).expect("grid");

    let targeted = grid.decimate(0.25, false, &mut rng);

    assert_eq!(grid.wall_count(), 8, "floor(10 * 0.25) = 2 walls removed");
    assert!((targeted - 0.2).abs() < 1e-6, "targeted ratio was {targeted}");
}
