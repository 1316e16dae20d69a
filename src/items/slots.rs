//! Weapon slots
//!
//! A slot is the allocation rule a weapon fills. Each round type draws
//! from a fixed set of slots; each slot has a fixed weapon pool which is
//! then narrowed by team and by the configured usable-weapon list.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::Item;
use crate::core::types::{RoundType, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    /// The only gun handed out on pistol rounds
    PistolRound,
    Secondary,
    HalfBuyPrimary,
    FullBuyPrimary,
    /// AWP-on-my-turn policy; never has a default weapon
    Preferred,
}

const PISTOL_ROUND_POOL: &[Item] = &[Item::Glock, Item::UspS, Item::P2000, Item::P250];

const SECONDARY_POOL: &[Item] = &[
    Item::Glock,
    Item::UspS,
    Item::P2000,
    Item::P250,
    Item::DualBerettas,
    Item::FiveSeven,
    Item::Tec9,
    Item::Cz75,
    Item::Deagle,
    Item::R8Revolver,
];

const HALF_BUY_POOL: &[Item] = &[
    Item::Mac10,
    Item::Mp9,
    Item::Mp7,
    Item::Mp5Sd,
    Item::Ump45,
    Item::P90,
    Item::PpBizon,
    Item::Nova,
    Item::Xm1014,
    Item::Mag7,
    Item::SawedOff,
];

const FULL_BUY_POOL: &[Item] = &[
    Item::Galil,
    Item::Famas,
    Item::Ak47,
    Item::M4a4,
    Item::M4a1S,
    Item::Sg553,
    Item::Aug,
    Item::Ssg08,
    Item::Negev,
    Item::M249,
];

const PREFERRED_POOL: &[Item] = &[Item::Awp];

impl WeaponSlot {
    pub const ALL: [WeaponSlot; 5] = [
        WeaponSlot::PistolRound,
        WeaponSlot::Secondary,
        WeaponSlot::HalfBuyPrimary,
        WeaponSlot::FullBuyPrimary,
        WeaponSlot::Preferred,
    ];

    /// Slots that have a configurable default weapon
    pub const DEFAULTABLE: [WeaponSlot; 4] = [
        WeaponSlot::PistolRound,
        WeaponSlot::Secondary,
        WeaponSlot::HalfBuyPrimary,
        WeaponSlot::FullBuyPrimary,
    ];

    /// Every weapon that can ever fill this slot, regardless of team
    pub fn pool(&self) -> &'static [Item] {
        match self {
            WeaponSlot::PistolRound => PISTOL_ROUND_POOL,
            WeaponSlot::Secondary => SECONDARY_POOL,
            WeaponSlot::HalfBuyPrimary => HALF_BUY_POOL,
            WeaponSlot::FullBuyPrimary => FULL_BUY_POOL,
            WeaponSlot::Preferred => PREFERRED_POOL,
        }
    }

    /// Weapons a player of `team` can receive in this slot
    pub fn weapons_for(&self, team: Team) -> Vec<Item> {
        self.pool()
            .iter()
            .copied()
            .filter(|w| w.is_available_to(team))
            .collect()
    }

    pub fn accepts(&self, weapon: Item, team: Team) -> bool {
        self.pool().contains(&weapon) && weapon.is_available_to(team)
    }

    /// All slots a weapon can fill
    pub fn slots_for(weapon: Item) -> Vec<WeaponSlot> {
        Self::ALL
            .iter()
            .copied()
            .filter(|slot| slot.pool().contains(&weapon))
            .collect()
    }

    /// Primary slot allocated on a round type, if any
    pub fn primary_for(round_type: RoundType) -> Option<WeaponSlot> {
        match round_type {
            RoundType::Pistol => None,
            RoundType::HalfBuy => Some(WeaponSlot::HalfBuyPrimary),
            RoundType::FullBuy => Some(WeaponSlot::FullBuyPrimary),
        }
    }

    /// Sidearm slot allocated on a round type
    pub fn secondary_for(round_type: RoundType) -> WeaponSlot {
        match round_type {
            RoundType::Pistol => WeaponSlot::PistolRound,
            RoundType::HalfBuy | RoundType::FullBuy => WeaponSlot::Secondary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponSlot::PistolRound => "pistol_round",
            WeaponSlot::Secondary => "secondary",
            WeaponSlot::HalfBuyPrimary => "half_buy_primary",
            WeaponSlot::FullBuyPrimary => "full_buy_primary",
            WeaponSlot::Preferred => "preferred",
        }
    }

    pub fn from_db(value: &str) -> Option<WeaponSlot> {
        Self::ALL.iter().copied().find(|slot| slot.as_str() == value)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WeaponSlot::PistolRound => "Pistol Round",
            WeaponSlot::Secondary => "Secondary",
            WeaponSlot::HalfBuyPrimary => "Half Buy Primary",
            WeaponSlot::FullBuyPrimary => "Primary",
            WeaponSlot::Preferred => "Preferred",
        }
    }
}

impl fmt::Display for WeaponSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
