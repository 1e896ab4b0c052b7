//! Simulate command - run one series end to end
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_series(), play_series(), report_results()
//! - Level 3: per-map logging, aggregation
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use spikesim_core::{MatchSetup, Side};
use spikesim_series::{Series, SeriesFormat, SeriesRunner, SimConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Match setup JSON file (rosters, map pool, format)
    #[arg(long, value_name = "FILE")]
    pub setup: PathBuf,

    /// Override the setup file's series format (BO1/BO3/BO5)
    #[arg(long)]
    pub format: Option<String>,

    /// Safety cap on rounds per map
    #[arg(long, default_value = "50")]
    pub max_rounds: u32,

    /// Print every round of every map
    #[arg(long)]
    pub rounds: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// This function reads like a table of contents:
/// 1. Load the setup and build the series
/// 2. Play every map to completion
/// 3. Report results
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let series = load_series(&args)?;

    tracing::info!(
        "Starting series: {} vs {} ({:?}, opening on {})",
        series.state.team_a.name,
        series.state.team_b.name,
        series.format,
        series.current_map()
    );

    let series = play_series(series, &args, seed);

    report_results(&series, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the setup file and build a fresh series
fn load_series(args: &SimulateArgs) -> Result<Series> {
    let setup = MatchSetup::load(&args.setup)
        .with_context(|| format!("Failed to load setup: {}", args.setup.display()))?;

    let format = match &args.format {
        Some(value) => SeriesFormat::parse(value),
        None => SeriesFormat::parse(&setup.format),
    };

    let (team_a, team_b) = setup.teams();
    Ok(Series::new(team_a, team_b, setup.map_pool(), format))
}

/// Play every map of the series
fn play_series(series: Series, args: &SimulateArgs, seed: Option<u64>) -> Series {
    let config = SimConfig {
        seed,
        max_rounds_per_map: args.max_rounds,
    };
    let mut runner = SeriesRunner::new(series, &config);

    loop {
        let maps_before = runner.series().snapshots().len();
        let Some(result) = runner.step() else {
            break;
        };

        if args.rounds {
            println!(
                "  round {:2}: {:?} wins by {:?}",
                result.round, result.winner, result.condition
            );
        }

        if let Some(snapshot) = runner.series().snapshots().get(maps_before) {
            tracing::info!(
                "Map {} ({}): {:?} wins {}-{}",
                snapshot.map_number,
                snapshot.map,
                snapshot.winner,
                snapshot.score_a,
                snapshot.score_b
            );
        }
    }

    runner.into_series()
}

/// Report series results
fn report_results(series: &Series, args: &SimulateArgs) {
    if args.json {
        print_json_results(series);
    } else {
        print_text_results(series);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn team_name(series: &Series, side: Side) -> &str {
    match side {
        Side::A => &series.state.team_a.name,
        Side::B => &series.state.team_b.name,
    }
}

/// Print results as JSON
fn print_json_results(series: &Series) {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        team_a: &'a str,
        team_b: &'a str,
        format: SeriesFormat,
        wins_a: u32,
        wins_b: u32,
        maps: &'a [spikesim_series::MapSnapshot],
        aggregated_stats: Vec<spikesim_series::PlayerStatLine>,
    }

    let output = JsonOutput {
        team_a: &series.state.team_a.name,
        team_b: &series.state.team_b.name,
        format: series.format,
        wins_a: series.wins_a,
        wins_b: series.wins_b,
        maps: series.snapshots(),
        aggregated_stats: series.aggregated_stats(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(series: &Series) {
    println!("\n=== Series Results ===");
    println!(
        "{} {} - {} {}",
        series.state.team_a.name, series.wins_a, series.wins_b, series.state.team_b.name
    );

    for snapshot in series.snapshots() {
        println!(
            "  Map {} {:10} {:>2}-{:<2}  ({} takes it)",
            snapshot.map_number,
            snapshot.map,
            snapshot.score_a,
            snapshot.score_b,
            team_name(series, snapshot.winner)
        );
    }

    println!("\n--- Player Totals ---");
    for line in series.aggregated_stats() {
        println!(
            "  {:12} {:>3}K {:>3}D {:>3}A",
            line.name, line.kills, line.deaths, line.assists
        );
    }
}
