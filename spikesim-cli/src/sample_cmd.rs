//! Sample command - batch series simulation for win-probability estimates
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_setup(), run_batches(), report_results()
//! - Level 3: merge_reports()
//! - Level 4: formatting and output utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use spikesim_core::{MatchSetup, Side, Team};
use spikesim_series::{run_sample, SampleConfig, SampleReport, SeriesFormat};

/// Batch size between progress-bar updates
const CHUNK: usize = 100;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SampleArgs {
    /// Match setup JSON file (rosters, map pool, format)
    #[arg(long, value_name = "FILE")]
    pub setup: PathBuf,

    /// Number of series to simulate
    #[arg(long, default_value = "1000")]
    pub runs: usize,

    /// Override the setup file's series format (BO1/BO3/BO5)
    #[arg(long)]
    pub format: Option<String>,

    /// Safety cap on rounds per map
    #[arg(long, default_value = "50")]
    pub max_rounds: u32,

    /// Disable parallel execution
    #[arg(long)]
    pub sequential: bool,

    /// Write the report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output results as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run sample command
///
/// This function reads like a table of contents:
/// 1. Load the setup
/// 2. Run the batch with a progress bar
/// 3. Report aggregate results
pub fn run(args: SampleArgs, seed: Option<u64>) -> Result<()> {
    let (team_a, team_b, maps, format) = load_setup(&args)?;

    tracing::info!(
        "Sampling {} series: {} vs {} ({:?})",
        args.runs,
        team_a.name,
        team_b.name,
        format
    );

    let report = run_batches(&team_a, &team_b, &maps, format, &args, seed);

    report_results(&report, &team_a, &team_b, format, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load rosters, map pool, and format from the setup file
fn load_setup(args: &SampleArgs) -> Result<(Team, Team, Vec<String>, SeriesFormat)> {
    let setup = MatchSetup::load(&args.setup)
        .with_context(|| format!("Failed to load setup: {}", args.setup.display()))?;

    let format = match &args.format {
        Some(value) => SeriesFormat::parse(value),
        None => SeriesFormat::parse(&setup.format),
    };

    let (team_a, team_b) = setup.teams();
    Ok((team_a, team_b, setup.map_pool(), format))
}

/// Run the sample in chunks so the progress bar stays live. Seeds are
/// derived from the global run index, so chunking does not change outcomes.
fn run_batches(
    team_a: &Team,
    team_b: &Team,
    maps: &[String],
    format: SeriesFormat,
    args: &SampleArgs,
    seed: Option<u64>,
) -> SampleReport {
    let base_seed = seed.unwrap_or(42);
    let bar = ProgressBar::new(args.runs as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} series ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut partials = Vec::new();
    let mut start = 0;
    while start < args.runs {
        let chunk = CHUNK.min(args.runs - start);
        let config = SampleConfig {
            runs: chunk,
            seed: Some(base_seed.wrapping_add(start as u64)),
            parallel: !args.sequential,
            max_rounds_per_map: args.max_rounds,
        };
        partials.push(run_sample(team_a, team_b, maps, format, &config));
        bar.inc(chunk as u64);
        start += chunk;
    }
    bar.finish_and_clear();

    merge_reports(&partials)
}

/// Report batch results
fn report_results(
    report: &SampleReport,
    team_a: &Team,
    team_b: &Team,
    format: SeriesFormat,
    args: &SampleArgs,
) -> Result<()> {
    if let Some(path) = &args.output {
        write_json_report(report, team_a, team_b, format, path)?;
    }
    if args.json {
        print_json_results(report, team_a, team_b, format);
    } else {
        print_text_results(report, team_a, team_b);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Combine chunked reports into one
fn merge_reports(partials: &[SampleReport]) -> SampleReport {
    let mut merged = SampleReport {
        runs: 0,
        series_wins_a: 0,
        series_wins_b: 0,
        map_wins_a: 0,
        map_wins_b: 0,
        avg_maps_per_series: 0.0,
        avg_rounds_per_map: 0.0,
    };

    let mut total_maps = 0.0f32;
    let mut total_rounds = 0.0f32;
    for partial in partials {
        merged.runs += partial.runs;
        merged.series_wins_a += partial.series_wins_a;
        merged.series_wins_b += partial.series_wins_b;
        merged.map_wins_a += partial.map_wins_a;
        merged.map_wins_b += partial.map_wins_b;

        let maps = partial.avg_maps_per_series * partial.runs as f32;
        total_maps += maps;
        total_rounds += partial.avg_rounds_per_map * maps;
    }

    if merged.runs > 0 {
        merged.avg_maps_per_series = total_maps / merged.runs as f32;
    }
    if total_maps > 0.0 {
        merged.avg_rounds_per_map = total_rounds / total_maps;
    }

    merged
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    generated_at: String,
    team_a: &'a str,
    team_b: &'a str,
    format: SeriesFormat,
    report: &'a SampleReport,
}

fn json_output<'a>(
    report: &'a SampleReport,
    team_a: &'a Team,
    team_b: &'a Team,
    format: SeriesFormat,
) -> JsonOutput<'a> {
    JsonOutput {
        generated_at: chrono::Utc::now().to_rfc3339(),
        team_a: &team_a.name,
        team_b: &team_b.name,
        format,
        report,
    }
}

/// Write the report to a JSON file
fn write_json_report(
    report: &SampleReport,
    team_a: &Team,
    team_b: &Team,
    format: SeriesFormat,
    path: &PathBuf,
) -> Result<()> {
    let output = json_output(report, team_a, team_b, format);
    let json = serde_json::to_string_pretty(&output)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Print results as JSON
fn print_json_results(report: &SampleReport, team_a: &Team, team_b: &Team, format: SeriesFormat) {
    let output = json_output(report, team_a, team_b, format);
    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(report: &SampleReport, team_a: &Team, team_b: &Team) {
    println!("\n=== Sample Results ===");
    println!("Series simulated: {}", report.runs);
    println!(
        "{:12} {:>5} series wins ({:.1}%), {} map wins",
        team_a.name,
        report.series_wins_a,
        report.series_win_rate(Side::A) * 100.0,
        report.map_wins_a
    );
    println!(
        "{:12} {:>5} series wins ({:.1}%), {} map wins",
        team_b.name,
        report.series_wins_b,
        report.series_win_rate(Side::B) * 100.0,
        report.map_wins_b
    );
    println!(
        "Avg maps/series: {:.2}, avg rounds/map: {:.1}",
        report.avg_maps_per_series, report.avg_rounds_per_map
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_reports_weighted_averages() {
        let r1 = SampleReport {
            runs: 10,
            series_wins_a: 6,
            series_wins_b: 4,
            map_wins_a: 14,
            map_wins_b: 10,
            avg_maps_per_series: 2.4,
            avg_rounds_per_map: 22.0,
        };
        let r2 = SampleReport {
            runs: 10,
            series_wins_a: 5,
            series_wins_b: 5,
            map_wins_a: 12,
            map_wins_b: 14,
            avg_maps_per_series: 2.6,
            avg_rounds_per_map: 24.0,
        };

        let merged = merge_reports(&[r1, r2]);
        assert_eq!(merged.runs, 20);
        assert_eq!(merged.series_wins_a, 11);
        assert_eq!(merged.map_wins_b, 24);
        assert!((merged.avg_maps_per_series - 2.5).abs() < 1e-3);
        assert!(merged.avg_rounds_per_map > 22.0 && merged.avg_rounds_per_map < 24.0);
    }

    #[test]
    fn test_merge_reports_empty() {
        let merged = merge_reports(&[]);
        assert_eq!(merged.runs, 0);
        assert_eq!(merged.avg_maps_per_series, 0.0);
    }
}
