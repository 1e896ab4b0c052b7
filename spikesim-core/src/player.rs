//! Players, roles, and team rosters

use serde::{Deserialize, Serialize};

/// Roster size per team
pub const TEAM_SIZE: usize = 5;

/// Default value for a missing skill attribute
pub const DEFAULT_ATTRIBUTE: u32 = 10;

/// Default overall rating when the source data carries none
pub const DEFAULT_OVERALL: u32 = 50;

/// Team side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Player role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Duelist,
    Controller,
    Initiator,
    Sentinel,
    Flex,
}

impl Role {
    /// Parse a role name; unknown names fall back to Flex
    pub fn parse(name: &str) -> Self {
        match name {
            "Duelist" => Role::Duelist,
            "Controller" => Role::Controller,
            "Initiator" => Role::Initiator,
            "Sentinel" => Role::Sentinel,
            _ => Role::Flex,
        }
    }
}

/// Skill attribute set
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Attributes {
    pub aim: u32,
    pub gamesense: u32,
    pub support: u32,
    pub clutch: u32,
    pub mental: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            aim: DEFAULT_ATTRIBUTE,
            gamesense: DEFAULT_ATTRIBUTE,
            support: DEFAULT_ATTRIBUTE,
            clutch: DEFAULT_ATTRIBUTE,
            mental: DEFAULT_ATTRIBUTE,
        }
    }
}

impl Attributes {
    /// Raw combat skill before gear and utility factors
    pub fn base_skill(&self) -> f32 {
        self.aim as f32 * 2.0
            + self.gamesense as f32 * 1.5
            + self.support as f32 * 1.0
            + self.clutch as f32 * 0.5
    }
}

/// Cumulative combat statistics for the current map
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub round_kills: u32,
}

/// A single player on a roster
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub overall: u32,
    pub attributes: Attributes,
    pub stats: CombatStats,
    pub is_dead: bool,
    pub survived: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, attributes: Attributes, overall: u32) -> Self {
        Self {
            name: name.into(),
            role,
            overall,
            attributes,
            stats: CombatStats::default(),
            is_dead: false,
            survived: true,
        }
    }

    /// Ordinary per-round clear (kept survival flag feeds the next round)
    pub fn clear_round_flags(&mut self) {
        self.is_dead = false;
        self.stats.round_kills = 0;
    }

    /// Full flag reset at a half boundary (rounds 13 and 25)
    pub fn clear_half_flags(&mut self) {
        self.survived = false;
        self.is_dead = false;
        self.stats.round_kills = 0;
    }

    /// Wipe map statistics when moving to the next map in a series
    pub fn reset_stats(&mut self) {
        self.stats = CombatStats::default();
        self.is_dead = false;
        self.survived = true;
    }
}

/// A five-player roster
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            players,
        }
    }

    /// Mean gamesense across the roster
    pub fn average_gamesense(&self) -> f32 {
        if self.players.is_empty() {
            return 0.0;
        }
        let total: u32 = self.players.iter().map(|p| p.attributes.gamesense).sum();
        total as f32 / self.players.len() as f32
    }

    pub fn living(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_dead)
    }
}
