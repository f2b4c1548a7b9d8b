//! Time-windowed openness transitions.

use log::trace;
use shifting_maze_core::{Cell, CellRegion, WallPresenter, OPEN};

use crate::field::{clamp_quality, OpennessField};

/// Normalises `t` into the window `[a, b]`.
///
/// Yields `0.0` at `a` and `1.0` at `b`, extrapolating linearly outside the
/// window. A zero-length window counts as complete and yields `1.0`.
#[must_use]
pub fn quality(t: f32, a: f32, b: f32) -> f32 {
    if a == b {
        return 1.0;
    }
    (t - a) / (b - a)
}

/// Linear interpolation between `a` and `b`.
#[must_use]
pub fn linterp(q: f32, a: f32, b: f32) -> f32 {
    a + q * (b - a)
}

/// Start time and length of a transition window, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    start: f32,
    duration: f32,
}

impl Timing {
    /// Creates a window starting at `start` and lasting `duration`.
    ///
    /// Negative durations collapse to zero-length windows.
    #[must_use]
    pub fn new(start: f32, duration: f32) -> Self {
        Self {
            start,
            duration: duration.max(0.0),
        }
    }

    /// Time at which the window opens.
    #[must_use]
    pub const fn start(&self) -> f32 {
        self.start
    }

    /// Length of the window.
    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Time at which the window closes.
    #[must_use]
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// One scheduled change of a single cell's openness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingTransition {
    /// Cell whose openness is animated.
    pub cell: Cell,
    /// Quality at the start of the window.
    pub start_value: f32,
    /// Quality the cell settles at when the window completes.
    pub end_value: f32,
    /// Time at which the window opens.
    pub start_time: f32,
    /// Length of the window.
    pub duration: f32,
}

impl PendingTransition {
    /// Normalised progress of the transition at `now`.
    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        quality(now, self.start_time, self.start_time + self.duration)
    }
}

/// Counts of transitions touched by a single [`TransitionScheduler::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Transitions whose window had not opened yet.
    pub waiting: usize,
    /// Transitions that moved their cell part of the way.
    pub in_flight: usize,
    /// Transitions that completed and were removed.
    pub settled: usize,
}

/// Unordered collection of pending transitions driven by a caller-owned clock.
///
/// Transitions targeting the same cell are never merged or cancelled: each
/// runs independently and the last one to complete decides where the cell
/// rests.
#[derive(Clone, Debug, Default)]
pub struct TransitionScheduler {
    pending: Vec<PendingTransition>,
}

impl TransitionScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Transitions that have not yet completed, in scheduling order.
    #[must_use]
    pub fn pending(&self) -> &[PendingTransition] {
        &self.pending
    }

    /// Number of transitions that have not yet completed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no transition is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queues a single transition.
    pub fn enqueue(&mut self, transition: PendingTransition) {
        self.pending.push(transition);
    }

    /// Schedules every valid cell of `region` to move from its settled quality
    /// to `final_value` over `timing`. Returns the number of cells scheduled.
    ///
    /// The region is clipped to the field first, so its extent never bounds the work.
    pub fn block_interpolate(
        &mut self,
        field: &OpennessField,
        region: CellRegion,
        timing: Timing,
        final_value: f32,
    ) -> usize {
        let final_value = clamp_quality(final_value);
        let region = region.clamp_to(field.num_rows(), field.num_cols());
        let before = self.pending.len();
        for cell in region.cells() {
            let Some(start_value) = field.settled(cell) else {
                continue;
            };
            self.pending.push(PendingTransition {
                cell,
                start_value,
                end_value: final_value,
                start_time: timing.start(),
                duration: timing.duration(),
            });
        }
        self.pending.len() - before
    }

    /// Schedules only the border of `region`: the full top and bottom rows
    /// plus the left and right columns between them.
    pub fn outline_interpolate(
        &mut self,
        field: &OpennessField,
        region: CellRegion,
        timing: Timing,
        final_value: f32,
    ) -> usize {
        if region.is_empty() {
            return 0;
        }

        let (top, bottom) = (region.first_row(), region.last_row());
        let (left, right) = (region.first_col(), region.last_col());

        let mut scheduled = self.block_interpolate(
            field,
            CellRegion::from_bounds(top, top, left, right),
            timing,
            final_value,
        );
        if bottom > top {
            scheduled += self.block_interpolate(
                field,
                CellRegion::from_bounds(bottom, bottom, left, right),
                timing,
                final_value,
            );
        }

        let (inner_top, inner_bottom) = (top.saturating_add(1), bottom.saturating_sub(1));
        scheduled += self.block_interpolate(
            field,
            CellRegion::from_bounds(inner_top, inner_bottom, left, left),
            timing,
            final_value,
        );
        if right > left {
            scheduled += self.block_interpolate(
                field,
                CellRegion::from_bounds(inner_top, inner_bottom, right, right),
                timing,
                final_value,
            );
        }
        scheduled
    }

    /// Advances every pending transition to `now`.
    ///
    /// Transitions whose window has not opened are left untouched. Completed
    /// transitions settle their cell and are removed; the rest update the
    /// displayed quality. Every change is mirrored to `presenter`.
    pub fn update<P>(
        &mut self,
        field: &mut OpennessField,
        now: f32,
        presenter: &mut P,
    ) -> UpdateSummary
    where
        P: WallPresenter + ?Sized,
    {
        let mut summary = UpdateSummary::default();
        self.pending.retain(|transition| {
            let progress = transition.progress(now);
            if progress.is_nan() || progress < 0.0 {
                summary.waiting += 1;
                return true;
            }

            if progress >= 1.0 {
                let _ = field.settle(transition.cell, transition.end_value);
                present(&mut *presenter, transition.cell, transition.end_value);
                trace!(
                    "settled {:?} at {} (t = {now})",
                    transition.cell,
                    transition.end_value
                );
                summary.settled += 1;
                return false;
            }

            let value = linterp(progress, transition.start_value, transition.end_value);
            let _ = field.set_displayed(transition.cell, value);
            present(&mut *presenter, transition.cell, value);
            summary.in_flight += 1;
            true
        });
        summary
    }
}

fn present<P>(presenter: &mut P, cell: Cell, value: f32)
where
    P: WallPresenter + ?Sized,
{
    presenter.set_openness(cell, value);
    presenter.set_visible(cell, value > OPEN);
}
