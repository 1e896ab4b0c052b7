//! Match setup loading - rosters, map pool, series format

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::player::{
    Attributes, Player, Role, Team, DEFAULT_ATTRIBUTE, DEFAULT_OVERALL, TEAM_SIZE,
};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("team '{team}' has {count} players, rosters must have exactly {TEAM_SIZE}")]
    RosterSize { team: String, count: usize },
    #[error("map pool is empty")]
    EmptyMapPool,
}

/// Raw per-player attribute block; any missing field defaults to 10
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsSpec {
    pub aim: Option<u32>,
    pub gamesense: Option<u32>,
    pub support: Option<u32>,
    pub clutch: Option<u32>,
    pub mental: Option<u32>,
}

impl StatsSpec {
    fn to_attributes(&self) -> Attributes {
        Attributes {
            aim: self.aim.unwrap_or(DEFAULT_ATTRIBUTE),
            gamesense: self.gamesense.unwrap_or(DEFAULT_ATTRIBUTE),
            support: self.support.unwrap_or(DEFAULT_ATTRIBUTE),
            clutch: self.clutch.unwrap_or(DEFAULT_ATTRIBUTE),
            mental: self.mental.unwrap_or(DEFAULT_ATTRIBUTE),
        }
    }
}

/// One player as it appears in a setup file. Photo and cosmetic fields in
/// the source data are simply not declared here and get dropped on parse.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub stats: StatsSpec,
    pub overall: Option<u32>,
}

impl PlayerSpec {
    fn to_player(&self) -> Player {
        Player::new(
            self.name.clone(),
            Role::parse(&self.role),
            self.stats.to_attributes(),
            self.overall.unwrap_or(DEFAULT_OVERALL),
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamSpec {
    pub name: String,
    pub players: Vec<PlayerSpec>,
}

impl TeamSpec {
    fn to_team(&self) -> Team {
        Team::new(
            self.name.clone(),
            self.players.iter().map(PlayerSpec::to_player).collect(),
        )
    }
}

/// Full match setup as loaded from JSON
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSetup {
    pub team_a: TeamSpec,
    pub team_b: TeamSpec,
    /// Multi-map pool; a single-map setup may use `map` instead
    #[serde(default)]
    pub maps: Vec<String>,
    pub map: Option<String>,
    #[serde(default)]
    pub format: String,
}

impl MatchSetup {
    /// Load and validate a setup file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let setup: MatchSetup = serde_json::from_str(&content)?;
        setup.validate()?;
        Ok(setup)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        for spec in [&self.team_a, &self.team_b] {
            if spec.players.len() != TEAM_SIZE {
                return Err(SetupError::RosterSize {
                    team: spec.name.clone(),
                    count: spec.players.len(),
                });
            }
        }
        if self.map_pool().is_empty() {
            return Err(SetupError::EmptyMapPool);
        }
        Ok(())
    }

    /// The maps this series plays, in order
    pub fn map_pool(&self) -> Vec<String> {
        if !self.maps.is_empty() {
            return self.maps.clone();
        }
        match &self.map {
            Some(map) => vec![map.clone()],
            None => Vec::new(),
        }
    }

    pub fn teams(&self) -> (Team, Team) {
        (self.team_a.to_team(), self.team_b.to_team())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_json() -> &'static str {
        r#"{
            "team_a": {
                "name": "Crimson",
                "players": [
                    {"name": "ace", "role": "Duelist", "stats": {"aim": 14, "gamesense": 11}},
                    {"name": "smoke", "role": "Controller", "stats": {"aim": 10}},
                    {"name": "scan", "role": "Initiator"},
                    {"name": "lock", "role": "Sentinel", "overall": 72},
                    {"name": "igl", "role": "IGL"}
                ]
            },
            "team_b": {
                "name": "Cobalt",
                "players": [
                    {"name": "b1", "role": "Duelist"},
                    {"name": "b2", "role": "Controller"},
                    {"name": "b3", "role": "Initiator"},
                    {"name": "b4", "role": "Sentinel"},
                    {"name": "b5", "role": "Flex"}
                ]
            },
            "maps": ["Ascent", "Haven", "Split"],
            "format": "BO3"
        }"#
    }

    #[test]
    fn test_parse_full_setup() {
        let setup: MatchSetup = serde_json::from_str(setup_json()).unwrap();
        setup.validate().unwrap();

        let (a, b) = setup.teams();
        assert_eq!(a.name, "Crimson");
        assert_eq!(b.players.len(), TEAM_SIZE);
        assert_eq!(setup.map_pool(), vec!["Ascent", "Haven", "Split"]);
    }

    #[test]
    fn test_missing_stats_default_to_ten() {
        let setup: MatchSetup = serde_json::from_str(setup_json()).unwrap();
        let (a, _) = setup.teams();

        assert_eq!(a.players[0].attributes.aim, 14);
        assert_eq!(a.players[0].attributes.support, DEFAULT_ATTRIBUTE);
        assert_eq!(a.players[2].attributes.aim, DEFAULT_ATTRIBUTE);
        assert_eq!(a.players[0].overall, DEFAULT_OVERALL);
        assert_eq!(a.players[3].overall, 72);
    }

    #[test]
    fn test_unknown_role_becomes_flex() {
        let setup: MatchSetup = serde_json::from_str(setup_json()).unwrap();
        let (a, _) = setup.teams();
        assert_eq!(a.players[4].role, Role::Flex);
    }

    #[test]
    fn test_roster_size_rejected() {
        let mut setup: MatchSetup = serde_json::from_str(setup_json()).unwrap();
        setup.team_b.players.pop();
        match setup.validate() {
            Err(SetupError::RosterSize { team, count }) => {
                assert_eq!(team, "Cobalt");
                assert_eq!(count, 4);
            }
            other => panic!("expected roster-size error, got {other:?}"),
        }
    }

    #[test]
    fn test_single_map_field() {
        let mut setup: MatchSetup = serde_json::from_str(setup_json()).unwrap();
        setup.maps.clear();
        setup.map = Some("Bind".to_string());
        setup.validate().unwrap();
        assert_eq!(setup.map_pool(), vec!["Bind"]);

        setup.map = None;
        assert!(matches!(setup.validate(), Err(SetupError::EmptyMapPool)));
    }
}
