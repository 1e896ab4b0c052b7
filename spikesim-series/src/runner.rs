//! Series runner - drives a series round by round with an owned RNG

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use spikesim_core::{RoundResult, Side};

use crate::config::SimConfig;
use crate::series::{Series, SeriesStatus};

/// Seeded RNG for reproducibility, entropy otherwise
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Owns a series and the random source that resolves it. All progression
/// goes through `step` so replays with the same seed are identical.
pub struct SeriesRunner {
    series: Series,
    rng: ChaCha8Rng,
    max_rounds_per_map: u32,
}

impl SeriesRunner {
    pub fn new(series: Series, config: &SimConfig) -> Self {
        Self {
            series,
            rng: create_rng(config.seed),
            max_rounds_per_map: config.max_rounds_per_map,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn into_series(self) -> Series {
        self.series
    }

    /// Resolve one round. When the round decides the map, the map is
    /// finalized and the series advances. Returns `None` once the series is
    /// decided.
    pub fn step(&mut self) -> Option<RoundResult> {
        if self.series.status() != SeriesStatus::InProgress {
            return None;
        }

        let result = self.series.state.play_round(&mut self.rng)?;
        self.series.finalize_map();
        Some(result)
    }

    /// Fast-forward the current map to completion, bounded by the per-map
    /// safety cap. Returns the map winner, or `None` if the cap was hit.
    pub fn fast_forward_map(&mut self) -> Option<Side> {
        let start_maps = self.series.snapshots().len();

        for _ in 0..self.max_rounds_per_map {
            if self.step().is_none() {
                break;
            }
            if self.series.snapshots().len() > start_maps {
                return self.series.snapshots().last().map(|s| s.winner);
            }
        }

        // No snapshot was appended this call: either the series was already
        // decided or the map ran into the safety cap
        if self.series.status() == SeriesStatus::InProgress {
            warn!(
                cap = self.max_rounds_per_map,
                "map hit the round safety cap without finishing"
            );
        }
        None
    }

    /// Run the whole series to its end. Returns the series winner.
    pub fn play_to_completion(&mut self) -> Side {
        loop {
            if let SeriesStatus::Complete(winner) = self.series.status() {
                return winner;
            }
            if self.step().is_none() {
                // Unreachable while in progress unless the state machine
                // stalls; pick by map wins as a last resort
                return if self.series.wins_a >= self.series.wins_b {
                    Side::A
                } else {
                    Side::B
                };
            }
        }
    }
}
