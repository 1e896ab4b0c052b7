//! SPIKESIM CLI - Command-line interface
//!
//! Commands:
//! - simulate: Run one series from a setup file
//! - sample: Estimate win probability over many simulated series

use clap::{Parser, Subcommand};

mod sample_cmd;
mod simulate_cmd;

#[derive(Parser)]
#[command(name = "spikesim")]
#[command(about = "Round-based 5v5 tactical match simulator")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full series from a match setup file
    Simulate(simulate_cmd::SimulateArgs),
    /// Run many seeded series and report aggregate outcomes
    Sample(sample_cmd::SampleArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate_cmd::run(args, cli.seed),
        Commands::Sample(args) => sample_cmd::run(args, cli.seed),
    }
}
