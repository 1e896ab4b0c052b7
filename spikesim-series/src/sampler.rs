//! Batch sampling - many seeded series runs for win-probability estimates

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use spikesim_core::{Side, Team};

use crate::config::{SeriesFormat, SimConfig};
use crate::runner::SeriesRunner;
use crate::series::Series;

/// Batch configuration
#[derive(Clone, Debug)]
pub struct SampleConfig {
    /// Number of independent series to simulate
    pub runs: usize,
    /// Base seed; run i uses base.wrapping_add(i) (None = 42)
    pub seed: Option<u64>,
    /// Whether to run series in parallel
    pub parallel: bool,
    /// Safety cap per map, passed through to each runner
    pub max_rounds_per_map: u32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            runs: 1000,
            seed: None,
            parallel: true,
            max_rounds_per_map: 50,
        }
    }
}

/// Aggregate outcome of a sample batch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleReport {
    pub runs: usize,
    pub series_wins_a: u32,
    pub series_wins_b: u32,
    pub map_wins_a: u32,
    pub map_wins_b: u32,
    pub avg_maps_per_series: f32,
    pub avg_rounds_per_map: f32,
}

impl SampleReport {
    pub fn series_win_rate(&self, side: Side) -> f32 {
        if self.runs == 0 {
            return 0.0;
        }
        let wins = match side {
            Side::A => self.series_wins_a,
            Side::B => self.series_wins_b,
        };
        wins as f32 / self.runs as f32
    }
}

struct RunOutcome {
    winner: Side,
    wins_a: u32,
    wins_b: u32,
    maps_played: u32,
    rounds_played: u32,
}

fn run_one(
    team_a: &Team,
    team_b: &Team,
    maps: &[String],
    format: SeriesFormat,
    seed: u64,
    max_rounds_per_map: u32,
) -> RunOutcome {
    let series = Series::new(team_a.clone(), team_b.clone(), maps.to_vec(), format);
    let config = SimConfig {
        seed: Some(seed),
        max_rounds_per_map,
    };

    let mut runner = SeriesRunner::new(series, &config);
    let winner = runner.play_to_completion();
    let series = runner.into_series();

    let rounds_played = series
        .snapshots()
        .iter()
        .map(|s| s.score_a + s.score_b)
        .sum();

    RunOutcome {
        winner,
        wins_a: series.wins_a,
        wins_b: series.wins_b,
        maps_played: series.snapshots().len() as u32,
        rounds_played,
    }
}

/// Simulate `config.runs` independent series and aggregate the outcomes.
/// Each run gets its own derived seed, so batches are reproducible and
/// parallel execution gives identical results to sequential.
pub fn run_sample(
    team_a: &Team,
    team_b: &Team,
    maps: &[String],
    format: SeriesFormat,
    config: &SampleConfig,
) -> SampleReport {
    let base_seed = config.seed.unwrap_or(42);

    let outcomes: Vec<RunOutcome> = if config.parallel {
        (0..config.runs)
            .into_par_iter()
            .map(|i| {
                let seed = base_seed.wrapping_add(i as u64);
                run_one(team_a, team_b, maps, format, seed, config.max_rounds_per_map)
            })
            .collect()
    } else {
        (0..config.runs)
            .map(|i| {
                let seed = base_seed.wrapping_add(i as u64);
                run_one(team_a, team_b, maps, format, seed, config.max_rounds_per_map)
            })
            .collect()
    };

    let mut report = SampleReport {
        runs: config.runs,
        series_wins_a: 0,
        series_wins_b: 0,
        map_wins_a: 0,
        map_wins_b: 0,
        avg_maps_per_series: 0.0,
        avg_rounds_per_map: 0.0,
    };

    let mut total_maps = 0u32;
    let mut total_rounds = 0u32;
    for outcome in &outcomes {
        match outcome.winner {
            Side::A => report.series_wins_a += 1,
            Side::B => report.series_wins_b += 1,
        }
        report.map_wins_a += outcome.wins_a;
        report.map_wins_b += outcome.wins_b;
        total_maps += outcome.maps_played;
        total_rounds += outcome.rounds_played;
    }

    if config.runs > 0 {
        report.avg_maps_per_series = total_maps as f32 / config.runs as f32;
    }
    if total_maps > 0 {
        report.avg_rounds_per_map = total_rounds as f32 / total_maps as f32;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikesim_core::{Attributes, Player, Role, TEAM_SIZE};

    fn roster(name: &str, aim: u32) -> Team {
        let attrs = Attributes {
            aim,
            ..Attributes::default()
        };
        let players = (0..TEAM_SIZE)
            .map(|i| Player::new(format!("{name}{i}"), Role::Flex, attrs, 50))
            .collect();
        Team::new(name, players)
    }

    fn maps() -> Vec<String> {
        vec!["Ascent".into(), "Haven".into(), "Split".into()]
    }

    #[test]
    fn test_sample_accounting() {
        let a = roster("a", 12);
        let b = roster("b", 12);
        let config = SampleConfig {
            runs: 20,
            seed: Some(1),
            parallel: false,
            max_rounds_per_map: 50,
        };

        let report = run_sample(&a, &b, &maps(), SeriesFormat::Bo3, &config);
        assert_eq!(report.runs, 20);
        assert_eq!(report.series_wins_a + report.series_wins_b, 20);
        assert!(report.avg_maps_per_series >= 2.0);
        assert!(report.avg_maps_per_series <= 3.0);
        // A map needs at least 13 rounds
        assert!(report.avg_rounds_per_map >= 13.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let a = roster("a", 13);
        let b = roster("b", 11);
        let sequential = SampleConfig {
            runs: 10,
            seed: Some(5),
            parallel: false,
            max_rounds_per_map: 50,
        };
        let parallel = SampleConfig {
            parallel: true,
            ..sequential.clone()
        };

        let r1 = run_sample(&a, &b, &maps(), SeriesFormat::Bo3, &sequential);
        let r2 = run_sample(&a, &b, &maps(), SeriesFormat::Bo3, &parallel);
        assert_eq!(r1.series_wins_a, r2.series_wins_a);
        assert_eq!(r1.map_wins_a, r2.map_wins_a);
    }

    #[test]
    fn test_stronger_roster_wins_the_sample() {
        let a = roster("a", 18);
        let b = roster("b", 9);
        let config = SampleConfig {
            runs: 50,
            seed: Some(2),
            parallel: false,
            max_rounds_per_map: 50,
        };

        let report = run_sample(&a, &b, &maps(), SeriesFormat::Bo1, &config);
        assert!(
            report.series_win_rate(Side::A) > 0.6,
            "18-aim roster won only {} of 50",
            report.series_wins_a
        );
    }
}
