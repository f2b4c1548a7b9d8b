//! TOML level scripts describing when clearings open and passages are thinned.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rand::Rng;
use serde::Deserialize;
use shifting_maze_core::CellRegion;
use shifting_maze_system_repair::PathwayRepairer;
use shifting_maze_system_transitions::{clearing, Timing, WallManager};

const SUPPORTED_VERSION: u32 = 1;

/// Kind of change applied by a scripted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ActionKind {
    /// Opens every cell of the region.
    Clearing,
    /// Opens the region and raises its border.
    WalledClearing,
    /// Opens the region and raises a room wall one cell inside its border.
    ClearedWalledClearing,
    /// Thins passages wider than one cell inside the region.
    FixWidePathways,
}

/// Single scripted change.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptAction {
    /// What the action does.
    pub(crate) kind: ActionKind,
    /// First and last row of the affected region.
    pub(crate) rows: [i32; 2],
    /// First and last column of the affected region.
    pub(crate) cols: [i32; 2],
    /// Time in seconds at which the action is dispatched and its window opens.
    pub(crate) at: f32,
    /// Length in seconds of the transition window.
    #[serde(default)]
    pub(crate) duration: f32,
}

impl ScriptAction {
    fn region(&self) -> CellRegion {
        CellRegion::from_bounds(self.rows[0], self.rows[1], self.cols[0], self.cols[1])
    }

    fn timing(&self) -> Timing {
        Timing::new(self.at, self.duration)
    }

    /// Applies the action, returning the number of cells it scheduled.
    pub(crate) fn apply<R: Rng>(
        &self,
        manager: &mut WallManager,
        repairer: &mut PathwayRepairer<R>,
    ) -> usize {
        let region = self.region();
        let timing = self.timing();
        match self.kind {
            ActionKind::Clearing => clearing::create_clearing(manager, region, timing),
            ActionKind::WalledClearing => clearing::create_walled_clearing(manager, region, timing),
            ActionKind::ClearedWalledClearing => {
                clearing::create_cleared_walled_clearing(manager, region, timing)
            }
            ActionKind::FixWidePathways => {
                repairer.fix_wide_pathways(manager, region, timing).len()
            }
        }
    }
}

/// Level script loaded from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelScript {
    version: u32,
    #[serde(default)]
    actions: Vec<ScriptAction>,
}

impl LevelScript {
    /// Reads and validates a script file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level script {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse level script {}", path.display()))
    }

    /// Parses and validates a script from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let script: Self = toml::from_str(contents).context("invalid level script TOML")?;
        if script.version != SUPPORTED_VERSION {
            bail!(
                "unsupported level script version {} (expected {SUPPORTED_VERSION})",
                script.version
            );
        }
        for (index, action) in script.actions.iter().enumerate() {
            if !action.at.is_finite() || action.at < 0.0 {
                bail!("action {index} has an invalid start time {}", action.at);
            }
            if !action.duration.is_finite() || action.duration < 0.0 {
                bail!("action {index} has an invalid duration {}", action.duration);
            }
        }
        Ok(script)
    }

    /// Script used when none is supplied: a walled room in the middle, a
    /// moated room in the upper left, then a sweep of the whole grid.
    #[must_use]
    pub(crate) fn demo(num_rows: u32, num_cols: u32) -> Self {
        let last_row = num_rows.saturating_sub(1) as i32;
        let last_col = num_cols.saturating_sub(1) as i32;
        let quarter = |last: i32| last / 4;
        let centre = ScriptAction {
            kind: ActionKind::WalledClearing,
            rows: [quarter(last_row), last_row - quarter(last_row)],
            cols: [quarter(last_col), last_col - quarter(last_col)],
            at: 0.5,
            duration: 2.0,
        };
        let corner = ScriptAction {
            kind: ActionKind::ClearedWalledClearing,
            rows: [0, last_row / 2],
            cols: [0, last_col / 2],
            at: 3.0,
            duration: 1.5,
        };
        let sweep = ScriptAction {
            kind: ActionKind::FixWidePathways,
            rows: [0, last_row],
            cols: [0, last_col],
            at: 5.0,
            duration: 1.0,
        };
        Self {
            version: SUPPORTED_VERSION,
            actions: vec![centre, corner, sweep],
        }
    }

    /// Time at which the last scripted window closes.
    #[must_use]
    pub(crate) fn end_time(&self) -> f32 {
        self.actions
            .iter()
            .map(|action| action.timing().end())
            .fold(0.0, f32::max)
    }
}

/// Dispatches scripted actions as the clock passes their start times.
#[derive(Debug)]
pub(crate) struct ScriptRunner {
    actions: Vec<ScriptAction>,
    next: usize,
}

impl ScriptRunner {
    /// Orders the script's actions by start time, keeping file order for ties.
    #[must_use]
    pub(crate) fn new(script: LevelScript) -> Self {
        let mut actions = script.actions;
        actions.sort_by(|left, right| left.at.total_cmp(&right.at));
        info!("level script holds {} actions", actions.len());
        Self { actions, next: 0 }
    }

    /// Applies every action whose start time is at or before `now`.
    ///
    /// Returns the number of actions dispatched.
    pub(crate) fn dispatch_due<R: Rng>(
        &mut self,
        now: f32,
        manager: &mut WallManager,
        repairer: &mut PathwayRepairer<R>,
    ) -> usize {
        let due = self.actions[self.next..]
            .iter()
            .take_while(|action| action.at <= now)
            .count();
        for action in &self.actions[self.next..self.next + due] {
            let scheduled = action.apply(manager, repairer);
            debug!(
                "t={now}: {:?} over rows {:?} cols {:?} scheduled {scheduled} cells",
                action.kind, action.rows, action.cols
            );
        }
        self.next += due;
        due
    }

    /// Reports whether every action has been dispatched.
    #[must_use]
    pub(crate) fn is_finished(&self) -> bool {
        self.next == self.actions.len()
    }
}
