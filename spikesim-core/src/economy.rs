//! Team economy - credits, loss streaks, and round-end rewards

use serde::{Deserialize, Serialize};

use crate::player::{Side, TEAM_SIZE};

// ============================================================================
// CONSTANTS
// ============================================================================

pub const MAX_CREDITS: u32 = 9000;
pub const INITIAL_CREDITS: u32 = 800;
pub const OVERTIME_CREDITS: u32 = 5000;

pub const WIN_BONUS: u32 = 3000;
pub const KILL_BONUS: u32 = 200;
pub const SPIKE_PLANT_BONUS: u32 = 300;

/// Credits a team must be able to field next round for an eco-round
/// Sheriff steal to be worth it
pub const MIN_NEXT_ROUND_BUY: u32 = 3300;

/// Loss-streak bonus; caps at the third consecutive loss
pub fn loss_bonus(streak: u32) -> u32 {
    match streak {
        0 | 1 => 1900,
        2 => 2400,
        _ => 2900,
    }
}

// ============================================================================
// ECONOMY STATE
// ============================================================================

/// One team's economic state
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TeamEconomy {
    pub credits: [u32; TEAM_SIZE],
    pub loss_streak: u32,
}

impl TeamEconomy {
    fn with_credits(credits: u32) -> Self {
        Self {
            credits: [credits; TEAM_SIZE],
            loss_streak: 0,
        }
    }

    /// Integer-floor mean of the five credit balances
    pub fn average(&self) -> u32 {
        self.credits.iter().sum::<u32>() / TEAM_SIZE as u32
    }
}

/// Both teams' credits and loss streaks
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Economy {
    team_a: TeamEconomy,
    team_b: TeamEconomy,
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

impl Economy {
    /// Fresh economy: both rosters at pistol-round credits
    pub fn new() -> Self {
        Self {
            team_a: TeamEconomy::with_credits(INITIAL_CREDITS),
            team_b: TeamEconomy::with_credits(INITIAL_CREDITS),
        }
    }

    /// Side swap at round 13: full credit and streak reset for both teams,
    /// regardless of score
    pub fn reset_halftime(&mut self) {
        *self = Self::new();
    }

    /// Overtime entry: both rosters jump to overtime credits
    pub fn initialize_overtime(&mut self) {
        self.team_a = TeamEconomy::with_credits(OVERTIME_CREDITS);
        self.team_b = TeamEconomy::with_credits(OVERTIME_CREDITS);
    }

    pub fn team(&self, side: Side) -> &TeamEconomy {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamEconomy {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    pub fn team_average(&self, side: Side) -> u32 {
        self.team(side).average()
    }

    pub fn loss_streak(&self, side: Side) -> u32 {
        self.team(side).loss_streak
    }

    pub fn credits(&self, side: Side, player: usize) -> u32 {
        self.team(side).credits[player]
    }

    /// Deduct a purchase; balances never go negative
    pub fn spend(&mut self, side: Side, player: usize, amount: u32) {
        let credits = &mut self.team_mut(side).credits[player];
        *credits = credits.saturating_sub(amount);
    }

    /// Distribute round-end rewards. Must run exactly once per round, after
    /// kill attribution is final.
    ///
    /// Winners each earn the win bonus, the spike-plant bonus when the spike
    /// went down this round (either side's plant), and kill bonuses for their
    /// own kills. Losers earn the streak bonus plus their kill bonuses.
    pub fn update_after_round(
        &mut self,
        winner: Side,
        spike_planted: bool,
        winner_kills: &[u32; TEAM_SIZE],
        loser_kills: &[u32; TEAM_SIZE],
    ) {
        let loser = winner.opponent();

        self.team_mut(winner).loss_streak = 0;
        self.team_mut(loser).loss_streak += 1;

        let plant_bonus = if spike_planted { SPIKE_PLANT_BONUS } else { 0 };
        let streak_bonus = loss_bonus(self.team(loser).loss_streak);

        for (i, credits) in self.team_mut(winner).credits.iter_mut().enumerate() {
            let earned = WIN_BONUS + plant_bonus + winner_kills[i] * KILL_BONUS;
            *credits = (*credits + earned).min(MAX_CREDITS);
        }

        for (i, credits) in self.team_mut(loser).credits.iter_mut().enumerate() {
            let earned = streak_bonus + loser_kills[i] * KILL_BONUS;
            *credits = (*credits + earned).min(MAX_CREDITS);
        }
    }
}
