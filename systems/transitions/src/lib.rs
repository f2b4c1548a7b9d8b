#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall state management for Shifting Maze.
//!
//! An [`OpennessField`] holds a continuous openness value per cell, a
//! [`TransitionScheduler`] animates batches of cells between values over time
//! windows, and the [`clearing`] compositions express rooms and nested
//! clearings in terms of block and outline transitions. [`WallManager`] pairs
//! a field with its scheduler and is driven by a caller-owned loop through
//! [`WallManager::update`].

pub mod clearing;
mod field;
mod scheduler;

pub use field::OpennessField;
pub use scheduler::{
    linterp, quality, PendingTransition, Timing, TransitionScheduler, UpdateSummary,
};

use log::debug;
use shifting_maze_core::{CellRegion, WallPresenter};
use shifting_maze_grid::Grid;

/// Openness field paired with the transitions animating it.
#[derive(Clone, Debug)]
pub struct WallManager {
    field: OpennessField,
    scheduler: TransitionScheduler,
    now: f32,
}

impl WallManager {
    /// Seeds a manager from the carved grid with no pending transitions.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self::from_field(OpennessField::from_grid(grid))
    }

    /// Wraps an existing field.
    #[must_use]
    pub fn from_field(field: OpennessField) -> Self {
        Self {
            field,
            scheduler: TransitionScheduler::new(),
            now: 0.0,
        }
    }

    /// Read access to the openness field.
    #[must_use]
    pub fn field(&self) -> &OpennessField {
        &self.field
    }

    /// Write access to the openness field.
    pub fn field_mut(&mut self) -> &mut OpennessField {
        &mut self.field
    }

    /// Read access to the pending transitions.
    #[must_use]
    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    /// Time passed to the most recent [`WallManager::update`] call.
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }

    /// Window of `duration` seconds opening at the manager's current time.
    #[must_use]
    pub fn timing_now(&self, duration: f32) -> Timing {
        Timing::new(self.now, duration)
    }

    /// Schedules every cell of `region` towards `final_value`.
    pub fn block_interpolate(
        &mut self,
        region: CellRegion,
        timing: Timing,
        final_value: f32,
    ) -> usize {
        self.scheduler
            .block_interpolate(&self.field, region, timing, final_value)
    }

    /// Schedules the border cells of `region` towards `final_value`.
    pub fn outline_interpolate(
        &mut self,
        region: CellRegion,
        timing: Timing,
        final_value: f32,
    ) -> usize {
        self.scheduler
            .outline_interpolate(&self.field, region, timing, final_value)
    }

    /// Advances all pending transitions to `now`, reporting changes to `presenter`.
    ///
    /// Callers must supply a non-decreasing `now` once per frame.
    pub fn update<P>(&mut self, now: f32, presenter: &mut P) -> UpdateSummary
    where
        P: WallPresenter + ?Sized,
    {
        if now < self.now {
            debug!("update clock moved backwards from {} to {now}", self.now);
        }
        self.now = now;
        self.scheduler.update(&mut self.field, now, presenter)
    }
}
