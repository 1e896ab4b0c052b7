//! SPIKESIM Series - best-of-N orchestration over the core simulator
//!
//! This crate provides series infrastructure:
//! - Series formats and simulation configuration
//! - Map progression with per-map stat snapshots
//! - A seeded runner for deterministic replay
//! - Batch sampling for win-probability estimates

mod config;
mod runner;
mod sampler;
mod series;

pub use config::{SeriesFormat, SimConfig};
pub use runner::{create_rng, SeriesRunner};
pub use sampler::{run_sample, SampleConfig, SampleReport};
pub use series::{MapSnapshot, PlayerStatLine, Series, SeriesStatus};
