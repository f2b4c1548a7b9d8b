use std::collections::{HashMap, VecDeque};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shifting_maze_core::{Cell, CellRegion, NullPresenter};
use shifting_maze_grid::Grid;
use shifting_maze_system_repair::{is_open, is_open_2x2, PathwayRepairer};
use shifting_maze_system_transitions::{OpennessField, Timing, WallManager};

fn whole_field(field: &OpennessField) -> CellRegion {
    CellRegion::from_bounds(0, field.num_rows() as i32 - 1, 0, field.num_cols() as i32 - 1)
}

/// Labels every open cell with the index of its connected component.
fn components(field: &OpennessField) -> HashMap<Cell, usize> {
    let mut labels = HashMap::new();
    let mut next_label = 0;
    for cell in whole_field(field).cells() {
        if !is_open(field, cell) || labels.contains_key(&cell) {
            continue;
        }
        let _ = labels.insert(cell, next_label);
        let mut queue = VecDeque::from([cell]);
        while let Some(current) = queue.pop_front() {
            for neighbor in current.orthogonal_neighbors() {
                if is_open(field, neighbor) && !labels.contains_key(&neighbor) {
                    let _ = labels.insert(neighbor, next_label);
                    queue.push_back(neighbor);
                }
            }
        }
        next_label += 1;
    }
    labels
}

fn assert_connectivity_preserved(before: &HashMap<Cell, usize>, after: &HashMap<Cell, usize>) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    for (cell, old_label) in before {
        let Some(new_label) = after.get(cell) else {
            continue;
        };
        let expected = *mapping.entry(*old_label).or_insert(*new_label);
        assert_eq!(
            expected, *new_label,
            "open cell {cell:?} was cut off from its former region"
        );
    }
}

#[test]
fn sweeping_a_fully_open_block_keeps_it_connected() {
    let field = OpennessField::filled(4, 4, 0.0).expect("field");
    let mut manager = WallManager::from_field(field);
    let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(17));
    let before = components(manager.field());

    let closed =
        repairer.fix_wide_pathways(&mut manager, CellRegion::new(0..=3, 0..=3), Timing::new(0.0, 1.0));
    let after = components(manager.field());

    assert!(!closed.is_empty(), "a fully open field must be thinned");
    assert_eq!(after.len(), 16 - closed.len());
    assert_connectivity_preserved(&before, &after);
    let regions: std::collections::HashSet<usize> = after.values().copied().collect();
    assert_eq!(regions.len(), 1, "the remaining open cells must stay one region");
}

#[test]
fn repair_never_disconnects_decimated_mazes() {
    for seed in 0..24_u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::randomized_prim(13, 13, Cell::new(0, 0), &mut rng).expect("grid");
        let _ = grid.decimate(0.6, true, &mut rng);
        let mut manager = WallManager::new(&grid);
        let mut repairer = PathwayRepairer::new(rng);
        let before = components(manager.field());

        let region = whole_field(manager.field());
        let _ = repairer.fix_wide_pathways(&mut manager, region, Timing::new(0.0, 0.5));
        let after = components(manager.field());

        assert_connectivity_preserved(&before, &after);
    }
}

#[test]
fn each_closure_removes_a_wide_pathway() {
    let field = OpennessField::filled(6, 6, 0.0).expect("field");
    let mut manager = WallManager::from_field(field);
    let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(4));

    let closed = repairer.fix_wide_pathways(
        &mut manager,
        CellRegion::new(0..=5, 0..=5),
        Timing::new(0.0, 1.0),
    );

    assert_eq!(
        manager.scheduler().len(),
        closed.len(),
        "one closing transition per repaired corner"
    );
    for cell in &closed {
        assert_eq!(manager.field().settled(*cell), Some(1.0));
        assert_eq!(
            manager.field().displayed(*cell),
            Some(0.0),
            "the wall only rises once the transition runs"
        );
    }
}

#[test]
fn closures_rise_once_the_scheduler_runs() {
    let field = OpennessField::filled(2, 2, 0.0).expect("field");
    let mut manager = WallManager::from_field(field);
    let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(9));

    let corner = repairer
        .fix_2x2(&mut manager, Cell::new(0, 0), Timing::new(1.0, 2.0))
        .expect("fully open block must be repaired");
    let _ = manager.update(2.0, &mut NullPresenter);
    assert_eq!(manager.field().displayed(corner), Some(0.5));

    let _ = manager.update(3.0, &mut NullPresenter);
    assert_eq!(manager.field().displayed(corner), Some(1.0));
    assert!(!is_open_2x2(manager.field(), Cell::new(0, 0)));
    assert!(manager.scheduler().is_empty());
}

#[test]
fn closed_blocks_are_left_untouched() {
    let mut field = OpennessField::filled(3, 3, 0.0).expect("field");
    let _ = field.settle(Cell::new(1, 1), 1.0);
    let mut manager = WallManager::from_field(field);
    let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(1));

    assert_eq!(
        repairer.fix_2x2(&mut manager, Cell::new(0, 0), Timing::new(0.0, 1.0)),
        None
    );
    assert!(manager.scheduler().is_empty());
}

#[test]
fn repair_choices_replay_for_a_fixed_seed() {
    let run = |seed: u64| {
        let field = OpennessField::filled(8, 8, 0.0).expect("field");
        let mut manager = WallManager::from_field(field);
        let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(seed));
        repairer.fix_wide_pathways(&mut manager, CellRegion::new(0..=7, 0..=7), Timing::new(0.0, 1.0))
    };

    assert_eq!(run(31), run(31), "repair diverged between identical seeds");
}

#[test]
fn oversized_sweeps_match_a_sweep_of_the_field() {
    let sweep = |region: CellRegion| {
        let field = OpennessField::filled(4, 4, 0.0).expect("field");
        let mut manager = WallManager::from_field(field);
        let mut repairer = PathwayRepairer::new(ChaCha8Rng::seed_from_u64(23));
        repairer.fix_wide_pathways(&mut manager, region, Timing::new(0.0, 1.0))
    };

    let exact = sweep(CellRegion::new(0..=3, 0..=3));
    let oversized = sweep(CellRegion::new(-20_000..=i32::MAX, 0..=i32::MAX));

    assert!(!exact.is_empty());
    assert_eq!(exact, oversized, "cells beyond the field must not change the sweep");
}
