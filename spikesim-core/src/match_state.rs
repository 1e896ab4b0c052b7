//! Match state machine - round progression, halftime, overtime, completion

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::balance::decide_utility_tier;
use crate::economy::Economy;
use crate::loadout::{decide_buy_state, get_loadout, BuyState};
use crate::player::{Side, Team, TEAM_SIZE};
use crate::round::{resolve_round, side_a_defends, PlayerGear, RoundResult, WinCondition};

/// Score a side needs in regulation to close out the map
pub const ROUNDS_TO_WIN: u32 = 13;

/// Overtime requires winning by this margin
pub const OVERTIME_MARGIN: u32 = 2;

/// Whether the map is live or decided
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    InProgress,
    Complete(Side),
}

/// One line of the round history log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundLogEntry {
    pub round: u32,
    pub winner: Side,
    pub condition: WinCondition,
    pub score: String,
}

/// Full state for one map of a series. Owns both rosters and the economy;
/// every round mutates through `play_round` and nothing else.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    pub team_a: Team,
    pub team_b: Team,
    pub economy: Economy,
    pub round: u32,
    pub score_a: u32,
    pub score_b: u32,
    pub overtime: bool,
    pub history: Vec<RoundLogEntry>,
    last_winner: Option<Side>,
}

impl MatchState {
    pub fn new(team_a: Team, team_b: Team) -> Self {
        Self {
            team_a,
            team_b,
            economy: Economy::new(),
            round: 1,
            score_a: 0,
            score_b: 0,
            overtime: false,
            history: Vec::new(),
            last_winner: None,
        }
    }

    pub fn status(&self) -> MatchStatus {
        if !self.overtime {
            if self.score_a >= ROUNDS_TO_WIN {
                return MatchStatus::Complete(Side::A);
            }
            if self.score_b >= ROUNDS_TO_WIN {
                return MatchStatus::Complete(Side::B);
            }
        } else {
            let diff = self.score_a.abs_diff(self.score_b);
            if diff >= OVERTIME_MARGIN {
                let winner = if self.score_a > self.score_b {
                    Side::A
                } else {
                    Side::B
                };
                return MatchStatus::Complete(winner);
            }
        }
        MatchStatus::InProgress
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    fn clear_flags(&mut self) {
        // Rounds 13 and 25 start a new half: survival streaks reset too
        let half_boundary = self.round == 13 || self.round == 25;
        for p in self
            .team_a
            .players
            .iter_mut()
            .chain(self.team_b.players.iter_mut())
        {
            if half_boundary {
                p.clear_half_flags();
            } else {
                p.clear_round_flags();
            }
        }
    }

    /// Run the buy phase for one side: weapon purchase first, then a utility
    /// tier from whatever is left
    fn buy_phase<R: Rng>(&mut self, side: Side, rng: &mut R) -> (BuyState, [PlayerGear; TEAM_SIZE]) {
        let average = self.economy.team_average(side);
        let enemy_average = self.economy.team_average(side.opponent());
        let streak = self.economy.loss_streak(side);
        let won_last = self.last_winner == Some(side);

        let buy = decide_buy_state(average, enemy_average, streak, self.round, won_last);
        let is_defense = match side {
            Side::A => side_a_defends(self.round),
            Side::B => !side_a_defends(self.round),
        };

        let roles: [crate::player::Role; TEAM_SIZE] =
            std::array::from_fn(|i| self.team(side).players[i].role);

        let gear = std::array::from_fn(|i| {
            let credits = self.economy.credits(side, i);
            let loadout = get_loadout(roles[i], buy, credits, self.round, streak, rng);
            self.economy.spend(side, i, loadout.cost);

            let remaining = self.economy.credits(side, i);
            let utility = decide_utility_tier(roles[i], remaining, buy, is_defense);
            self.economy.spend(side, i, utility.cost());

            PlayerGear { loadout, utility }
        });

        (buy, gear)
    }

    /// Resolve the next round. Returns `None` once the map is decided.
    pub fn play_round<R: Rng>(&mut self, rng: &mut R) -> Option<RoundResult> {
        if self.status() != MatchStatus::InProgress {
            return None;
        }

        // Overtime entry happens before the round is played
        if self.score_a == 12 && self.score_b == 12 && !self.overtime {
            self.overtime = true;
            self.economy.initialize_overtime();
        }

        self.clear_flags();

        // Side swap: economies restart from pistol-round credits
        if self.round == 13 {
            self.economy.reset_halftime();
        }

        let (buy_a, gear_a) = self.buy_phase(Side::A, rng);
        let (buy_b, gear_b) = self.buy_phase(Side::B, rng);

        let result = resolve_round(
            &mut self.team_a,
            &mut self.team_b,
            &gear_a,
            &gear_b,
            buy_a,
            buy_b,
            self.round,
            rng,
        );

        let loser = result.winner.opponent();
        self.economy.update_after_round(
            result.winner,
            result.spike_planted,
            result.kills(result.winner),
            result.kills(loser),
        );

        for p in self
            .team_a
            .players
            .iter_mut()
            .chain(self.team_b.players.iter_mut())
        {
            p.survived = !p.is_dead;
        }

        match result.winner {
            Side::A => self.score_a += 1,
            Side::B => self.score_b += 1,
        }
        self.last_winner = Some(result.winner);

        self.history.push(RoundLogEntry {
            round: result.round,
            winner: result.winner,
            condition: result.condition,
            score: format!("{}-{}", self.score_a, self.score_b),
        });

        // The round counter only advances while the map is still live
        if self.status() == MatchStatus::InProgress {
            self.round += 1;
        }

        Some(result)
    }

    /// Fresh map: same rosters, everything else back to round 1
    pub fn reset_for_new_map(&mut self) {
        for p in self
            .team_a
            .players
            .iter_mut()
            .chain(self.team_b.players.iter_mut())
        {
            p.reset_stats();
        }
        self.economy = Economy::new();
        self.round = 1;
        self.score_a = 0;
        self.score_b = 0;
        self.overtime = false;
        self.history.clear();
        self.last_winner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Attributes, Player, Role};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

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

    fn fresh_match() -> MatchState {
        MatchState::new(roster("a", 12), roster("b", 12))
    }

    #[test]
    fn test_match_runs_to_completion() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut state = fresh_match();

        let mut rounds = 0;
        while state.play_round(&mut rng).is_some() {
            rounds += 1;
            assert!(rounds < 100, "match never terminated");
        }

        let MatchStatus::Complete(winner) = state.status() else {
            panic!("loop exited while still in progress");
        };
        assert!(state.score(winner) >= ROUNDS_TO_WIN || state.overtime);
        assert_eq!(state.history.len(), rounds);

        // A decided map refuses further rounds
        assert!(state.play_round(&mut rng).is_none());
    }

    #[test]
    fn test_scores_match_history() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut state = fresh_match();
        while state.play_round(&mut rng).is_some() {}

        let a_wins = state
            .history
            .iter()
            .filter(|e| e.winner == Side::A)
            .count() as u32;
        assert_eq!(a_wins, state.score_a);
        assert_eq!(state.history.len() as u32, state.score_a + state.score_b);

        let last = state.history.last().unwrap();
        assert_eq!(last.score, format!("{}-{}", state.score_a, state.score_b));
    }

    #[test]
    fn test_overtime_entry_resets_economy() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut state = fresh_match();
        state.score_a = 12;
        state.score_b = 12;
        state.round = 25;

        state.play_round(&mut rng);
        assert!(state.overtime);
        // Both teams bought from a fresh 5000 bank and then earned either the
        // win bonus or the loss bonus, so neither can be broke
        assert!(state.economy.team_average(Side::A) >= 1900);
        assert!(state.economy.team_average(Side::B) >= 1900);
    }

    #[test]
    fn test_no_overtime_at_12_11() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut state = fresh_match();
        state.score_a = 12;
        state.score_b = 11;
        state.round = 24;

        state.play_round(&mut rng);
        assert!(!state.overtime || (state.score_a == 12 && state.score_b == 12));
    }

    #[test]
    fn test_halftime_resets_credits() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut state = fresh_match();

        // Play the first half
        while state.round < 13 {
            state.play_round(&mut rng);
        }
        assert_eq!(state.round, 13);

        state.play_round(&mut rng);
        // Round 13 buys from a fresh 800-credit pistol economy, then the
        // round-end reward lands on top: winner 3800/4100, loser 2700
        for side in [Side::A, Side::B] {
            let average = state.economy.team_average(side);
            assert!(
                average <= 800 + 3000 + 300 + 200,
                "halftime reset missing: {side:?} average {average}"
            );
        }
    }

    #[test]
    fn test_reset_for_new_map() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = fresh_match();
        while state.play_round(&mut rng).is_some() {}

        state.reset_for_new_map();
        assert_eq!(state.round, 1);
        assert_eq!(state.score_a, 0);
        assert_eq!(state.score_b, 0);
        assert!(!state.overtime);
        assert!(state.history.is_empty());
        assert_eq!(state.status(), MatchStatus::InProgress);
        for p in state.team_a.players.iter().chain(state.team_b.players.iter()) {
            assert_eq!(p.stats.kills, 0);
            assert_eq!(p.stats.deaths, 0);
        }
    }

    #[test]
    fn test_round_one_is_pistol_for_both() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut state = fresh_match();
        let (buy_a, _) = state.buy_phase(Side::A, &mut rng);
        let (buy_b, _) = state.buy_phase(Side::B, &mut rng);
        assert_eq!(buy_a, BuyState::Pistol);
        assert_eq!(buy_b, BuyState::Pistol);
    }
}
