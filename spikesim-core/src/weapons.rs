//! Equipment tables - shop prices and combat power

use serde::{Deserialize, Serialize};

/// Armor tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Armor {
    None,
    Light,
    Heavy,
}

impl Armor {
    pub fn price(self) -> u32 {
        match self {
            Armor::None => 0,
            Armor::Light => 400,
            Armor::Heavy => 1000,
        }
    }
}

/// Shop tier a weapon is listed under
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponTier {
    Eco,
    Force,
    Meta,
    Power,
}

/// A purchasable weapon
#[derive(Clone, Debug)]
pub struct Weapon {
    pub id: &'static str,
    pub tier: WeaponTier,
    pub price: u32,
}

/// The shop: every weapon the buy heuristics can select
pub static WEAPONS: [Weapon; 14] = [
    // Eco tier
    Weapon { id: "classic", tier: WeaponTier::Eco, price: 0 },
    Weapon { id: "shorty", tier: WeaponTier::Eco, price: 300 },
    Weapon { id: "ghost", tier: WeaponTier::Eco, price: 500 },
    Weapon { id: "sheriff", tier: WeaponTier::Eco, price: 800 },
    // Force tier
    Weapon { id: "stinger", tier: WeaponTier::Force, price: 1100 },
    Weapon { id: "spectre", tier: WeaponTier::Force, price: 1600 },
    Weapon { id: "judge", tier: WeaponTier::Force, price: 1850 },
    // Meta tier
    Weapon { id: "bulldog", tier: WeaponTier::Meta, price: 2050 },
    Weapon { id: "guardian", tier: WeaponTier::Meta, price: 2250 },
    Weapon { id: "outlaw", tier: WeaponTier::Meta, price: 2400 },
    Weapon { id: "vandal", tier: WeaponTier::Meta, price: 2900 },
    Weapon { id: "phantom", tier: WeaponTier::Meta, price: 2900 },
    // Power tier
    Weapon { id: "odin", tier: WeaponTier::Power, price: 3200 },
    Weapon { id: "operator", tier: WeaponTier::Power, price: 4700 },
];

/// Combat power per weapon id, including pickups the buy heuristics never
/// select. Feeds the round power formula.
static WEAPON_POWER: [(&str, f32); 17] = [
    ("operator", 3.5),
    ("odin", 3.0),
    ("vandal", 3.0),
    ("phantom", 3.0),
    ("guardian", 2.2),
    ("bulldog", 2.2),
    ("outlaw", 2.2),
    ("spectre", 1.8),
    ("ares", 1.8),
    ("judge", 1.8),
    ("sheriff", 1.6),
    ("marshall", 1.6),
    ("ghost", 1.3),
    ("frenzy", 1.3),
    ("classic", 1.0),
    ("shorty", 1.0),
    ("stinger", 1.1),
];

/// Shop price for a weapon id; unknown ids resolve to 0
pub fn weapon_price(id: &str) -> u32 {
    WEAPONS
        .iter()
        .find(|w| w.id == id)
        .map(|w| w.price)
        .unwrap_or(0)
}

/// Combat power for a weapon id; unknown ids resolve to the baseline 1.0
pub fn weapon_power(id: &str) -> f32 {
    WEAPON_POWER
        .iter()
        .find(|(w, _)| *w == id)
        .map(|(_, p)| *p)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_price_lookup() {
        assert_eq!(weapon_price("vandal"), 2900);
        assert_eq!(weapon_price("classic"), 0);
        assert_eq!(weapon_price("operator"), 4700);
        assert_eq!(weapon_price("nonexistent"), 0);
    }

    #[test]
    fn test_weapon_power_lookup() {
        assert_eq!(weapon_power("vandal"), 3.0);
        assert_eq!(weapon_power("classic"), 1.0);
        assert_eq!(weapon_power("marshall"), 1.6);
        assert_eq!(weapon_power("nonexistent"), 1.0);
    }

    #[test]
    fn test_armor_prices() {
        assert_eq!(Armor::None.price(), 0);
        assert_eq!(Armor::Light.price(), 400);
        assert_eq!(Armor::Heavy.price(), 1000);
    }

    #[test]
    fn test_every_shop_weapon_has_power() {
        for weapon in &WEAPONS {
            assert!(
                WEAPON_POWER.iter().any(|(id, _)| *id == weapon.id),
                "{} missing from power table",
                weapon.id
            );
        }
    }
}
