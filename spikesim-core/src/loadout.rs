//! Buy-state decisions and per-player loadout selection

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::economy::{loss_bonus, MIN_NEXT_ROUND_BUY};
use crate::player::{Role, Team};
use crate::weapons::{weapon_price, Armor};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Average credits at which a team commits to rifles plus heavy armor
pub const FULL_BUY_THRESHOLD: u32 = 3700;

/// Average credits at which a force buy becomes viable
pub const FORCE_BUY_THRESHOLD: u32 = 2000;

/// A force buy above this per-player balance skips the utility reservation
const RICH_FORCE_CREDITS: u32 = 2800;

// ============================================================================
// TYPES
// ============================================================================

/// A round's equipment-purchase posture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuyState {
    Pistol,
    Eco,
    ForceBuy,
    FullBuy,
    HeroBuy,
}

/// One player's purchased gear for a round. Recomputed every round, never
/// persisted.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Loadout {
    pub weapon: &'static str,
    pub armor: Armor,
    pub cost: u32,
    pub multiplier: f32,
}

impl Loadout {
    fn new(weapon: &'static str, armor: Armor, cost: u32, multiplier: f32) -> Self {
        Self {
            weapon,
            armor,
            cost,
            multiplier,
        }
    }
}

// ============================================================================
// ROLE DECISION TABLE
// ============================================================================

/// Per-role buy preferences
#[derive(Clone, Debug)]
pub struct RoleLoadout {
    pub role: Role,
    pub eco_weapon: &'static str,
    pub force_weapon: &'static str,
    pub full_weapon: &'static str,
    pub eco_multiplier: f32,
    pub force_multiplier: f32,
    pub full_multiplier: f32,
    pub utility_dependency: f32,
}

pub static ROLE_LOADOUTS: [RoleLoadout; 5] = [
    RoleLoadout {
        role: Role::Duelist,
        eco_weapon: "sheriff",
        force_weapon: "spectre",
        full_weapon: "vandal",
        eco_multiplier: 0.6,
        force_multiplier: 0.8,
        full_multiplier: 1.0,
        utility_dependency: 0.2,
    },
    RoleLoadout {
        role: Role::Controller,
        eco_weapon: "sheriff",
        force_weapon: "stinger",
        full_weapon: "phantom",
        eco_multiplier: 0.4,
        force_multiplier: 0.65,
        full_multiplier: 1.0,
        utility_dependency: 0.4,
    },
    RoleLoadout {
        role: Role::Initiator,
        eco_weapon: "ghost",
        force_weapon: "spectre",
        full_weapon: "phantom",
        eco_multiplier: 0.4,
        force_multiplier: 0.7,
        full_multiplier: 1.0,
        utility_dependency: 0.5,
    },
    RoleLoadout {
        role: Role::Sentinel,
        eco_weapon: "sheriff",
        force_weapon: "stinger",
        full_weapon: "vandal",
        eco_multiplier: 0.5,
        force_multiplier: 0.75,
        full_multiplier: 1.0,
        utility_dependency: 0.3,
    },
    RoleLoadout {
        role: Role::Flex,
        eco_weapon: "sheriff",
        force_weapon: "spectre",
        full_weapon: "vandal",
        eco_multiplier: 0.5,
        force_multiplier: 0.75,
        full_multiplier: 1.0,
        utility_dependency: 0.3,
    },
];

/// Buy preferences for a role; Flex is the catch-all entry
pub fn role_loadout(role: Role) -> &'static RoleLoadout {
    ROLE_LOADOUTS
        .iter()
        .find(|c| c.role == role)
        .unwrap_or(&ROLE_LOADOUTS[4])
}

// ============================================================================
// BUY STATE
// ============================================================================

/// Decide a team's buy posture for the round.
///
/// `enemy_average` is part of the call contract but not yet consumed by the
/// threshold ladder.
pub fn decide_buy_state(
    average_credits: u32,
    _enemy_average: u32,
    loss_streak: u32,
    round: u32,
    won_last_round: bool,
) -> BuyState {
    // Rounds 1 and 13 are pistol rounds, economy is irrelevant
    if round == 1 || round == 13 {
        return BuyState::Pistol;
    }

    // Post-pistol: winner presses the advantage, loser saves
    if round == 2 || round == 14 {
        return if won_last_round {
            BuyState::ForceBuy
        } else {
            BuyState::Eco
        };
    }

    if won_last_round {
        if average_credits >= FULL_BUY_THRESHOLD {
            return BuyState::FullBuy;
        }
        if average_credits >= FORCE_BUY_THRESHOLD {
            return BuyState::ForceBuy;
        }
        return BuyState::Eco;
    }

    if loss_streak == 1 && average_credits < FULL_BUY_THRESHOLD {
        return BuyState::Eco;
    }
    if loss_streak == 2 {
        return if average_credits >= FULL_BUY_THRESHOLD {
            BuyState::FullBuy
        } else {
            BuyState::Eco
        };
    }
    if loss_streak >= 3 {
        if average_credits >= FULL_BUY_THRESHOLD {
            return BuyState::FullBuy;
        }
        if average_credits >= FORCE_BUY_THRESHOLD {
            return BuyState::ForceBuy;
        }
        return BuyState::Eco;
    }

    // Streak 0 after a loss is inconsistent bookkeeping; use the default
    // ladder
    if average_credits >= FULL_BUY_THRESHOLD {
        return BuyState::FullBuy;
    }
    if average_credits >= FORCE_BUY_THRESHOLD && loss_streak >= 2 {
        return BuyState::ForceBuy;
    }
    BuyState::Eco
}

// ============================================================================
// LOADOUT SELECTION
// ============================================================================

/// Pistol-round buy. A fixed probability ladder, deliberately rolled per
/// player so one team's pistol loadouts come out heterogeneous.
pub fn pistol_loadout<R: Rng>(role: Role, rng: &mut R) -> Loadout {
    let roll: f32 = rng.gen();

    // Aggressive roles take the armored classic half the time
    if matches!(role, Role::Duelist | Role::Flex) && roll < 0.5 {
        return Loadout::new("classic", Armor::Light, 400, 0.85);
    }

    if roll < 0.35 {
        return Loadout::new("ghost", Armor::None, 500, 0.9);
    }

    // Support roles keep credits back for utility
    if matches!(role, Role::Controller | Role::Initiator | Role::Sentinel) && roll < 0.7 {
        return Loadout::new("classic", Armor::None, 0, 0.75);
    }

    // The occasional duelist Sheriff gamble
    if role == Role::Duelist && roll > 0.8 {
        return Loadout::new("sheriff", Armor::None, 800, 1.1);
    }

    Loadout::new("classic", Armor::Light, 400, 0.8)
}

/// Select a concrete weapon/armor purchase for one player
pub fn get_loadout<R: Rng>(
    role: Role,
    buy_state: BuyState,
    credits: u32,
    round: u32,
    loss_streak: u32,
    rng: &mut R,
) -> Loadout {
    let config = role_loadout(role);

    // Reserve utility money on committed buys; a rich force buys through the
    // reservation
    let is_rich_force = buy_state == BuyState::ForceBuy && credits > RICH_FORCE_CREDITS;
    let weapon_budget = if !is_rich_force
        && matches!(buy_state, BuyState::FullBuy | BuyState::ForceBuy)
    {
        if config.utility_dependency >= 0.4 {
            credits.saturating_sub(600)
        } else if config.utility_dependency >= 0.3 {
            credits.saturating_sub(400)
        } else {
            credits
        }
    } else {
        credits
    };

    match buy_state {
        BuyState::Pistol => pistol_loadout(role, rng),
        BuyState::Eco => eco_loadout(config, credits, round, loss_streak),
        BuyState::ForceBuy => {
            force_loadout(config, weapon_budget, round, is_rich_force, rng)
        }
        BuyState::FullBuy | BuyState::HeroBuy => full_loadout(config, weapon_budget),
    }
}

/// Eco buy: try a Sheriff round-steal, otherwise the role's eco weapon
fn eco_loadout(config: &RoleLoadout, credits: u32, round: u32, loss_streak: u32) -> Loadout {
    // Round 2 gates the Sheriff on still affording a full buy in round 3
    // after the incoming loss bonus; later ecos just need spare credits
    let can_buy_sheriff = if round == 2 {
        let next_bonus = loss_bonus((loss_streak + 1).min(3));
        let future_credits = credits as i64 - 800 + next_bonus as i64;
        future_credits >= MIN_NEXT_ROUND_BUY as i64
    } else {
        credits > 1400
    };

    if can_buy_sheriff {
        return Loadout::new("sheriff", Armor::None, 800, config.eco_multiplier + 0.1);
    }

    if config.eco_weapon == "sheriff" {
        // Configured Sheriff without the credits for it drops to the free
        // Classic
        return Loadout::new("classic", Armor::None, 0, 0.8);
    }

    Loadout::new(
        config.eco_weapon,
        Armor::None,
        weapon_price(config.eco_weapon),
        config.eco_multiplier,
    )
}

/// Force buy: post-pistol rounds get two upgraded tiers before the generic
/// ladder
fn force_loadout<R: Rng>(
    config: &RoleLoadout,
    weapon_budget: u32,
    round: u32,
    is_rich_force: bool,
    rng: &mut R,
) -> Loadout {
    if round == 2 || round == 14 {
        let full_price = weapon_price(config.full_weapon);

        // Aggressive double-buy after winning the pistol: rifle + light armor
        if weapon_budget >= full_price + 400 {
            return Loadout::new(
                config.full_weapon,
                Armor::Light,
                full_price + 400,
                config.full_multiplier * 0.95,
            );
        }

        // Safe option: Bulldog + heavy armor
        if weapon_budget >= 3050 {
            return Loadout::new("bulldog", Armor::Heavy, 3050, config.force_multiplier + 0.25);
        }
    }

    // Generic force ladder
    let mut loadout = if weapon_budget >= 2450 {
        if weapon_budget >= 2650 && rng.gen::<f32>() > 0.7 {
            Loadout::new("guardian", Armor::None, 2250, config.force_multiplier + 0.2)
        } else {
            Loadout::new("bulldog", Armor::None, 2050, config.force_multiplier + 0.15)
        }
    } else {
        Loadout::new(
            config.force_weapon,
            Armor::None,
            weapon_price(config.force_weapon),
            config.force_multiplier,
        )
    };

    if is_rich_force && weapon_budget.saturating_sub(loadout.cost) >= 1000 {
        loadout.armor = Armor::Heavy;
        loadout.cost += 1000;
    } else if weapon_budget.saturating_sub(loadout.cost) >= 400 {
        loadout.armor = Armor::Light;
        loadout.cost += 400;
    }

    loadout
}

/// Full buy priority ladder with proportional downgrade multipliers
fn full_loadout(config: &RoleLoadout, weapon_budget: u32) -> Loadout {
    let meta_price = weapon_price(config.full_weapon);
    let heavy = Armor::Heavy.price();

    if weapon_budget >= meta_price + heavy {
        return Loadout::new(
            config.full_weapon,
            Armor::Heavy,
            meta_price + heavy,
            config.full_multiplier,
        );
    }

    if weapon_budget >= 2050 + heavy {
        return Loadout::new("bulldog", Armor::Heavy, 2050 + heavy, config.full_multiplier * 0.9);
    }

    // Glass cannon: meta rifle, light armor
    if weapon_budget >= meta_price + 400 {
        return Loadout::new(
            config.full_weapon,
            Armor::Light,
            meta_price + 400,
            config.full_multiplier * 0.95,
        );
    }

    // Guaranteed fallback
    Loadout::new("spectre", Armor::Heavy, 1600 + heavy, config.force_multiplier)
}

/// Mean role multiplier across a roster for a buy posture
pub fn team_multiplier(team: &Team, buy_state: BuyState) -> f32 {
    if team.players.is_empty() {
        return 1.0;
    }

    let total: f32 = team
        .players
        .iter()
        .map(|p| {
            let config = role_loadout(p.role);
            match buy_state {
                BuyState::Eco => config.eco_multiplier,
                BuyState::ForceBuy => config.force_multiplier,
                BuyState::FullBuy | BuyState::HeroBuy => config.full_multiplier,
                BuyState::Pistol => 1.0,
            }
        })
        .sum();

    total / team.players.len() as f32
}
