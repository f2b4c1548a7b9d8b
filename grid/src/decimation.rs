//! Probabilistic wall thinning applied after carving.

use log::debug;
use rand::{seq::SliceRandom, Rng};
use shifting_maze_core::{Cell, CellState};

use crate::Grid;

/// Ratio reported when a decimation request was rejected without changes.
const UNCHANGED_RATIO: f32 = 1.0;

/// Outcome of a decimation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decimation {
    /// Fraction of walls the caller asked to remove.
    pub requested: f32,
    /// Fraction of walls targeted after rounding the removal count.
    pub targeted: f32,
    /// Fraction of the original walls that were actually converted.
    pub achieved: f32,
    /// Number of walls present before the pass.
    pub walls_before: usize,
    /// Number of walls converted into maze cells.
    pub removed: usize,
}

impl Decimation {
    fn unchanged(requested: f32, walls_before: usize) -> Self {
        Self {
            requested,
            targeted: UNCHANGED_RATIO,
            achieved: 0.0,
            walls_before,
            removed: 0,
        }
    }
}

impl Grid {
    /// Converts a fraction of the remaining walls into maze cells.
    ///
    /// `desired_ratio` is the share of current walls to remove, not the share
    /// to keep: `0.0` removes nothing and `1.0` removes every wall. The removal
    /// count is rounded down, or up when `allow_ratio_high` permits exceeding
    /// the request. Ratios outside `[0, 1]` leave the grid untouched and
    /// return `1.0`. The returned ratio is the one targeted before removal.
    ///
    /// Decimation ignores the spanning-tree structure and may introduce loops.
    pub fn decimate<R>(&mut self, desired_ratio: f32, allow_ratio_high: bool, rng: &mut R) -> f32
    where
        R: Rng + ?Sized,
    {
        self.decimate_with_report(desired_ratio, allow_ratio_high, rng)
            .targeted
    }

    /// Same as [`Grid::decimate`], reporting requested, targeted and achieved ratios.
    pub fn decimate_with_report<R>(
        &mut self,
        desired_ratio: f32,
        allow_ratio_high: bool,
        rng: &mut R,
    ) -> Decimation
    where
        R: Rng + ?Sized,
    {
        let mut walls: Vec<Cell> = self
            .iter()
            .filter(|(_, state)| *state == CellState::Wall)
            .map(|(cell, _)| cell)
            .collect();
        let walls_before = walls.len();

        if !(0.0..=1.0).contains(&desired_ratio) {
            debug!("decimation ratio {desired_ratio} rejected");
            return Decimation::unchanged(desired_ratio, walls_before);
        }
        if walls_before == 0 {
            return Decimation {
                requested: desired_ratio,
                targeted: desired_ratio,
                achieved: 0.0,
                walls_before,
                removed: 0,
            };
        }

        let exact = walls_before as f64 * f64::from(desired_ratio);
        let rounded = if allow_ratio_high {
            exact.ceil()
        } else {
            exact.floor()
        };
        let target = (rounded as usize).min(walls_before);

        let (chosen, _) = walls.partial_shuffle(rng, target);
        let mut removed = 0;
        for cell in chosen.iter() {
            if self.mark_cell(*cell) {
                removed += 1;
            }
        }

        let report = Decimation {
            requested: desired_ratio,
            targeted: target as f32 / walls_before as f32,
            achieved: removed as f32 / walls_before as f32,
            walls_before,
            removed,
        };
        debug!("decimated {removed} of {walls_before} walls: {report:?}");
        report
    }
}
