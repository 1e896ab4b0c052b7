//! Series state - map progression, snapshots, cross-map statistics

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use spikesim_core::{MatchState, MatchStatus, Side, Team, WinCondition};

use crate::config::SeriesFormat;

/// Whether the series is live or decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesStatus {
    InProgress,
    Complete(Side),
}

/// One player's stat totals, used both per map and aggregated
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

fn stat_lines(team: &Team) -> Vec<PlayerStatLine> {
    team.players
        .iter()
        .map(|p| PlayerStatLine {
            name: p.name.clone(),
            kills: p.stats.kills,
            deaths: p.stats.deaths,
            assists: p.stats.assists,
        })
        .collect()
}

/// Record of one finished map. Immutable once appended to the series
/// history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub map: String,
    /// 1-based position in the series
    pub map_number: u32,
    pub winner: Side,
    pub score_a: u32,
    pub score_b: u32,
    pub stats_a: Vec<PlayerStatLine>,
    pub stats_b: Vec<PlayerStatLine>,
    /// How many rounds ended by each win condition
    pub conditions: FxHashMap<WinCondition, u32>,
}

/// A best-of-N series between two rosters across a map pool
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Series {
    pub format: SeriesFormat,
    maps: Vec<String>,
    map_index: usize,
    pub wins_a: u32,
    pub wins_b: u32,
    pub state: MatchState,
    snapshots: Vec<MapSnapshot>,
}

impl Series {
    /// Start a series. The map pool must be non-empty (MatchSetup validation
    /// guarantees this upstream).
    pub fn new(team_a: Team, team_b: Team, maps: Vec<String>, format: SeriesFormat) -> Self {
        assert!(!maps.is_empty(), "series requires at least one map");
        Self {
            format,
            maps,
            map_index: 0,
            wins_a: 0,
            wins_b: 0,
            state: MatchState::new(team_a, team_b),
            snapshots: Vec::new(),
        }
    }

    pub fn current_map(&self) -> &str {
        &self.maps[self.map_index]
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.wins_a,
            Side::B => self.wins_b,
        }
    }

    pub fn status(&self) -> SeriesStatus {
        let needed = self.format.wins_needed();
        if self.wins_a >= needed {
            SeriesStatus::Complete(Side::A)
        } else if self.wins_b >= needed {
            SeriesStatus::Complete(Side::B)
        } else {
            SeriesStatus::InProgress
        }
    }

    pub fn snapshots(&self) -> &[MapSnapshot] {
        &self.snapshots
    }

    /// Record the finished map and, if the series continues, advance to the
    /// next map with fresh match state. No-op while the map is still live.
    pub fn finalize_map(&mut self) -> Option<&MapSnapshot> {
        let MatchStatus::Complete(winner) = self.state.status() else {
            return None;
        };

        let mut conditions: FxHashMap<WinCondition, u32> = FxHashMap::default();
        for entry in &self.state.history {
            *conditions.entry(entry.condition).or_insert(0) += 1;
        }

        self.snapshots.push(MapSnapshot {
            map: self.current_map().to_string(),
            map_number: self.snapshots.len() as u32 + 1,
            winner,
            score_a: self.state.score_a,
            score_b: self.state.score_b,
            stats_a: stat_lines(&self.state.team_a),
            stats_b: stat_lines(&self.state.team_b),
            conditions,
        });

        match winner {
            Side::A => self.wins_a += 1,
            Side::B => self.wins_b += 1,
        }

        if self.status() == SeriesStatus::InProgress {
            self.map_index += 1;
            if self.map_index >= self.maps.len() {
                // Pool shorter than the format needs is a setup mistake;
                // keep the series playable by wrapping
                warn!(
                    pool = self.maps.len(),
                    "map pool exhausted before series end, wrapping to first map"
                );
                self.map_index = 0;
            }
            self.state.reset_for_new_map();
        }

        self.snapshots.last()
    }

    /// Per-player kill/death/assist totals summed across every finished map,
    /// keyed by player name
    pub fn aggregated_stats(&self) -> Vec<PlayerStatLine> {
        let mut totals: FxHashMap<String, PlayerStatLine> = FxHashMap::default();

        for snapshot in &self.snapshots {
            for line in snapshot.stats_a.iter().chain(snapshot.stats_b.iter()) {
                let entry = totals
                    .entry(line.name.clone())
                    .or_insert_with(|| PlayerStatLine {
                        name: line.name.clone(),
                        kills: 0,
                        deaths: 0,
                        assists: 0,
                    });
                entry.kills += line.kills;
                entry.deaths += line.deaths;
                entry.assists += line.assists;
            }
        }

        let mut lines: Vec<PlayerStatLine> = totals.into_values().collect();
        lines.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));
        lines
    }
}
