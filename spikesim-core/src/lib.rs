//! SPIKESIM Core - Match simulation engine
//!
//! This crate provides the core simulation logic for SPIKESIM:
//! - Players, roles, and skill attributes
//! - Team economy with loss streaks and round rewards
//! - Buy-state and loadout decision heuristics
//! - Stochastic round resolution with kill attribution
//! - Match state machine (halftime, overtime, completion)

pub mod balance;
pub mod economy;
pub mod loadout;
pub mod match_state;
pub mod player;
pub mod round;
pub mod setup;
pub mod weapons;

// Re-exports for convenient access
pub use balance::{decide_utility_tier, eco_variance, utility_multiplier, UtilityTier};
pub use economy::{Economy, INITIAL_CREDITS, MAX_CREDITS, OVERTIME_CREDITS};
pub use loadout::{decide_buy_state, get_loadout, team_multiplier, BuyState, Loadout};
pub use match_state::{MatchState, MatchStatus, RoundLogEntry, ROUNDS_TO_WIN};
pub use player::{Attributes, CombatStats, Player, Role, Side, Team, TEAM_SIZE};
pub use round::{resolve_round, side_a_defends, PlayerGear, RoundResult, WinCondition};
pub use setup::{MatchSetup, SetupError};
pub use weapons::{weapon_power, weapon_price, Armor, Weapon, WEAPONS};
