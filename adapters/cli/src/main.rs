#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that carves a maze and plays a level script over it.

mod frame;
mod layout_transfer;
mod script;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shifting_maze_core::{Cell, WallGeometry};
use shifting_maze_grid::Grid;
use shifting_maze_system_repair::PathwayRepairer;
use shifting_maze_system_transitions::WallManager;

use crate::{
    frame::FrameRecorder,
    layout_transfer::MazeLayoutSnapshot,
    script::{LevelScript, ScriptRunner},
};

/// Upper bound on the number of simulated frames in one run.
const MAX_TICKS: u64 = 10_000_000;

/// Output produced once the simulation stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One glyph per cell.
    Ascii,
    /// Per-cell records with world-space wall heights.
    Json,
    /// Single-line layout transfer string of the carved grid.
    Layout,
}

/// Carves a maze, animates its walls and prints the final frame.
#[derive(Debug, Parser)]
#[command(name = "shifting-maze", version, about)]
struct CliArgs {
    /// Number of grid rows.
    #[arg(long, default_value_t = 21)]
    rows: u32,
    /// Number of grid columns.
    #[arg(long, default_value_t = 21)]
    cols: u32,
    /// Row of the cell carving starts from.
    #[arg(long, default_value_t = 0)]
    start_row: i32,
    /// Column of the cell carving starts from.
    #[arg(long, default_value_t = 0)]
    start_col: i32,
    /// Seed for every random choice; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Share of walls to knock down after carving.
    #[arg(long)]
    decimate: Option<f32>,
    /// Round the number of removed walls up instead of down.
    #[arg(long)]
    allow_ratio_high: bool,
    /// TOML level script; a built-in demo runs when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Layout transfer string to load instead of carving.
    #[arg(long, conflicts_with_all = ["rows", "cols", "start_row", "start_col"])]
    layout: Option<String>,
    /// Simulated time in seconds at which to stop; defaults to the end of the script.
    #[arg(long)]
    until: Option<f32>,
    /// Length of one simulated frame in seconds.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    step: f32,
    /// Height of a fully raised wall.
    #[arg(long, default_value_t = 1.0)]
    wall_height: f32,
    /// Edge length of one cell.
    #[arg(long, default_value_t = 1.0)]
    cell_size: f32,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
}

/// Entry point for the Shifting Maze command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = CliArgs::parse();
    let output = run(&args)?;
    print!("{output}");
    Ok(())
}

fn run(args: &CliArgs) -> Result<String> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("using seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = build_grid(args, &mut rng)?;

    match args.format {
        OutputFormat::Layout => {
            let encoded = MazeLayoutSnapshot::capture(&grid)
                .encode()
                .context("failed to encode layout")?;
            Ok(format!("{encoded}\n"))
        }
        OutputFormat::Ascii => Ok(simulate(args, &grid, rng)?.render_ascii()),
        OutputFormat::Json => {
            let frame = simulate(args, &grid, rng)?;
            let geometry = WallGeometry::new(args.wall_height, args.cell_size);
            let mut json = serde_json::to_string_pretty(&frame.frames(geometry))
                .context("failed to serialise frame")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Plays the level script over `grid` on a fixed-step clock.
fn simulate(args: &CliArgs, grid: &Grid, rng: ChaCha8Rng) -> Result<FrameRecorder> {
    if !args.step.is_finite() || args.step <= 0.0 {
        bail!("--step must be a positive number of seconds, got {}", args.step);
    }

    let script = match &args.script {
        Some(path) => LevelScript::load(path)?,
        None => LevelScript::demo(grid.num_rows(), grid.num_cols()),
    };
    let until = args.until.unwrap_or_else(|| script.end_time());
    if !until.is_finite() || until < 0.0 {
        bail!("--until must be a non-negative number of seconds, got {until}");
    }

    let mut manager = WallManager::new(grid);
    let mut repairer = PathwayRepairer::new(rng);
    let mut frame = FrameRecorder::new(manager.field());
    let mut runner = ScriptRunner::new(script);

    let ticks = (f64::from(until) / f64::from(args.step)).ceil();
    if ticks > MAX_TICKS as f64 {
        bail!(
            "--until {until} with --step {} needs {ticks} frames, more than the limit of {MAX_TICKS}",
            args.step
        );
    }
    let ticks = ticks as u64;
    for tick in 0..=ticks {
        let now = (tick as f32 * args.step).min(until);
        let _ = runner.dispatch_due(now, &mut manager, &mut repairer);
        let _ = manager.update(now, &mut frame);
    }
    if !runner.is_finished() {
        warn!("stopped at t={until} before every scripted action was dispatched");
    }
    info!(
        "stopped at t={until} with {} transitions pending",
        manager.scheduler().len()
    );

    Ok(frame)
}

fn build_grid(args: &CliArgs, rng: &mut ChaCha8Rng) -> Result<Grid> {
    let mut grid = match &args.layout {
        Some(layout) => MazeLayoutSnapshot::decode(layout)
            .and_then(MazeLayoutSnapshot::into_grid)
            .context("failed to load layout")?,
        None => Grid::randomized_prim(
            args.rows,
            args.cols,
            Cell::new(args.start_row, args.start_col),
            rng,
        )
        .context("failed to carve maze")?,
    };

    if let Some(ratio) = args.decimate {
        let report = grid.decimate_with_report(ratio, args.allow_ratio_high, rng);
        info!(
            "decimation removed {} of {} walls (requested {}, targeted {}, achieved {})",
            report.removed, report.walls_before, report.requested, report.targeted, report.achieved
        );
    }

    Ok(grid)
}
