//! Balance tables - pure lookups, no mutable state

use serde::{Deserialize, Serialize};

use crate::loadout::BuyState;
use crate::player::Role;

// ============================================================================
// UTILITY TIERS
// ============================================================================

/// How much a player invests in utility for a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UtilityTier {
    None,
    Low,
    Med,
    High,
}

impl UtilityTier {
    pub fn cost(self) -> u32 {
        match self {
            UtilityTier::None => 0,
            UtilityTier::Low => 200,
            UtilityTier::Med => 400,
            UtilityTier::High => 500,
        }
    }

    pub fn bonus(self) -> f32 {
        match self {
            UtilityTier::None => 0.0,
            UtilityTier::Low => 0.05,
            UtilityTier::Med => 0.10,
            UtilityTier::High => 0.18,
        }
    }
}

// ============================================================================
// LOOKUPS
// ============================================================================

/// Penalty applied after losing the opening duel, by team gamesense
pub fn first_kill_penalty(average_gamesense: f32) -> f32 {
    if average_gamesense >= 15.0 {
        0.10
    } else if average_gamesense >= 10.0 {
        0.15
    } else {
        0.25
    }
}

/// Expected winner survivor bucket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurvivorRange {
    pub min: u32,
    pub max: u32,
}

/// Expected winner survivors for a round win probability (0.0 - 1.0)
pub fn kill_distribution(win_chance: f32) -> SurvivorRange {
    let pct = win_chance * 100.0;
    if pct >= 80.0 {
        SurvivorRange { min: 5, max: 6 }
    } else if pct >= 65.0 {
        SurvivorRange { min: 4, max: 5 }
    } else if pct >= 55.0 {
        SurvivorRange { min: 3, max: 4 }
    } else {
        SurvivorRange { min: 2, max: 3 }
    }
}

/// Role-specific utility impact adjustments
struct UtilityRoleMod {
    no_penalty: f32,
    low_penalty: f32,
    high_bonus: f32,
}

fn utility_role_mod(role: Role) -> UtilityRoleMod {
    match role {
        Role::Controller | Role::Sentinel => UtilityRoleMod {
            no_penalty: -0.15,
            low_penalty: -0.05,
            high_bonus: 0.05,
        },
        Role::Initiator => UtilityRoleMod {
            no_penalty: -0.10,
            low_penalty: -0.03,
            high_bonus: 0.05,
        },
        Role::Duelist => UtilityRoleMod {
            no_penalty: 0.0,
            low_penalty: 0.0,
            high_bonus: 0.10,
        },
        Role::Flex => UtilityRoleMod {
            no_penalty: -0.05,
            low_penalty: -0.02,
            high_bonus: 0.03,
        },
    }
}

/// Combat multiplier for a role at a utility tier, on top of `base`
pub fn utility_multiplier(role: Role, tier: UtilityTier, base: f32) -> f32 {
    let mut multiplier = base + tier.bonus();
    let mods = utility_role_mod(role);

    match tier {
        UtilityTier::None => multiplier += mods.no_penalty,
        UtilityTier::Low => multiplier += mods.low_penalty,
        UtilityTier::High => multiplier += mods.high_bonus,
        UtilityTier::Med => {}
    }

    multiplier
}

/// Extra outcome variance for under-equipped teams
pub fn eco_variance(team_buy: BuyState, enemy_buy: BuyState) -> f32 {
    match (team_buy, enemy_buy) {
        (BuyState::Eco, BuyState::FullBuy) => 0.30,
        (BuyState::ForceBuy, BuyState::FullBuy) => 0.15,
        _ => 0.0,
    }
}

// ============================================================================
// UTILITY TIER DECISION
// ============================================================================

/// Force-round scan order. The per-role posture table, including the
/// sentinel attack/defense split, collapses to the same ladder under
/// current tuning.
fn force_scan_order(_role: Role, _is_defense: bool) -> &'static [UtilityTier] {
    &[UtilityTier::High, UtilityTier::Med, UtilityTier::Low]
}

/// Decide which utility tier a player buys this round
pub fn decide_utility_tier(
    role: Role,
    available_credits: u32,
    buy_state: BuyState,
    is_defense: bool,
) -> UtilityTier {
    match buy_state {
        // Pistol loadouts budget their own utility; strict ecos only chip in
        // when flush
        BuyState::Pistol => UtilityTier::None,
        BuyState::Eco => {
            if available_credits > 1500 {
                UtilityTier::Low
            } else {
                UtilityTier::None
            }
        }
        BuyState::FullBuy | BuyState::HeroBuy => {
            if available_credits >= UtilityTier::High.cost() {
                UtilityTier::High
            } else if available_credits >= UtilityTier::Med.cost() {
                UtilityTier::Med
            } else if available_credits >= UtilityTier::Low.cost() {
                UtilityTier::Low
            } else {
                UtilityTier::None
            }
        }
        BuyState::ForceBuy => force_scan_order(role, is_defense)
            .iter()
            .copied()
            .find(|tier| available_credits >= tier.cost())
            .unwrap_or(UtilityTier::None),
    }
}
