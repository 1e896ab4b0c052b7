//! Configuration types for series simulation

use serde::{Deserialize, Serialize};

/// Best-of-N series format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesFormat {
    Bo1,
    Bo3,
    Bo5,
}

impl Default for SeriesFormat {
    fn default() -> Self {
        SeriesFormat::Bo1
    }
}

impl SeriesFormat {
    /// Map wins needed to take the series
    pub fn wins_needed(self) -> u32 {
        match self {
            SeriesFormat::Bo1 => 1,
            SeriesFormat::Bo3 => 2,
            SeriesFormat::Bo5 => 3,
        }
    }

    /// Parse a format string; unrecognized values fall back to single-map
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "BO3" => SeriesFormat::Bo3,
            "BO5" => SeriesFormat::Bo5,
            _ => SeriesFormat::Bo1,
        }
    }
}

/// Simulation configuration
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Safety cap when fast-forwarding a single map
    pub max_rounds_per_map: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds_per_map: 50,
        }
    }
}

impl SimConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
