//! Item catalog
//!
//! Every item the allocator can hand out. Identifiers are the snake_case
//! names used in the config file and in the preference tables.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::Team;

/// Broad grouping used for ordering and for validating defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Pistol,
    Smg,
    Shotgun,
    Rifle,
    Sniper,
    Heavy,
    Grenade,
    Armor,
    Knife,
    Equipment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    // Pistols
    Glock,
    UspS,
    P2000,
    P250,
    DualBerettas,
    FiveSeven,
    Tec9,
    Cz75,
    Deagle,
    R8Revolver,
    // SMGs
    Mac10,
    Mp9,
    Mp7,
    Mp5Sd,
    Ump45,
    P90,
    PpBizon,
    // Shotguns
    Nova,
    Xm1014,
    Mag7,
    SawedOff,
    // Rifles
    Galil,
    Famas,
    Ak47,
    M4a4,
    M4a1S,
    Sg553,
    Aug,
    // Snipers
    Ssg08,
    Awp,
    // Heavy
    Negev,
    M249,
    // Grenades
    Flashbang,
    Smoke,
    HeGrenade,
    Molotov,
    Incendiary,
    // Armor
    Kevlar,
    KevlarHelmet,
    // Knives
    KnifeT,
    KnifeCt,
    // Equipment
    DefuseKit,
}

impl Item {
    pub const WEAPONS: [Item; 32] = [
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
        Item::Galil,
        Item::Famas,
        Item::Ak47,
        Item::M4a4,
        Item::M4a1S,
        Item::Sg553,
        Item::Aug,
        Item::Ssg08,
        Item::Awp,
        Item::Negev,
        Item::M249,
    ];

    pub fn category(&self) -> ItemCategory {
        use Item::*;
        match self {
            Glock | UspS | P2000 | P250 | DualBerettas | FiveSeven | Tec9 | Cz75 | Deagle
            | R8Revolver => ItemCategory::Pistol,
            Mac10 | Mp9 | Mp7 | Mp5Sd | Ump45 | P90 | PpBizon => ItemCategory::Smg,
            Nova | Xm1014 | Mag7 | SawedOff => ItemCategory::Shotgun,
            Galil | Famas | Ak47 | M4a4 | M4a1S | Sg553 | Aug => ItemCategory::Rifle,
            Ssg08 | Awp => ItemCategory::Sniper,
            Negev | M249 => ItemCategory::Heavy,
            Flashbang | Smoke | HeGrenade | Molotov | Incendiary => ItemCategory::Grenade,
            Kevlar | KevlarHelmet => ItemCategory::Armor,
            KnifeT | KnifeCt => ItemCategory::Knife,
            DefuseKit => ItemCategory::Equipment,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(
            self.category(),
            ItemCategory::Pistol
                | ItemCategory::Smg
                | ItemCategory::Shotgun
                | ItemCategory::Rifle
                | ItemCategory::Sniper
                | ItemCategory::Heavy
        )
    }

    /// Team that can buy this item, `None` when both sides can
    pub fn team_restriction(&self) -> Option<Team> {
        use Item::*;
        match self {
            Glock | Tec9 | Mac10 | SawedOff | Galil | Ak47 | Sg553 | Molotov | KnifeT => {
                Some(Team::Terrorist)
            }
            UspS | P2000 | FiveSeven | Mp9 | Mag7 | Famas | M4a4 | M4a1S | Aug | Incendiary
            | KnifeCt | DefuseKit => Some(Team::CounterTerrorist),
            _ => None,
        }
    }

    pub fn is_available_to(&self, team: Team) -> bool {
        match self.team_restriction() {
            Some(restricted) => restricted == team,
            None => true,
        }
    }

    /// Identifier used in config files and persisted rows
    pub fn as_str(&self) -> &'static str {
        use Item::*;
        match self {
            Glock => "glock",
            UspS => "usp_s",
            P2000 => "p2000",
            P250 => "p250",
            DualBerettas => "dual_berettas",
            FiveSeven => "five_seven",
            Tec9 => "tec9",
            Cz75 => "cz75",
            Deagle => "deagle",
            R8Revolver => "r8_revolver",
            Mac10 => "mac10",
            Mp9 => "mp9",
            Mp7 => "mp7",
            Mp5Sd => "mp5_sd",
            Ump45 => "ump45",
            P90 => "p90",
            PpBizon => "pp_bizon",
            Nova => "nova",
            Xm1014 => "xm1014",
            Mag7 => "mag7",
            SawedOff => "sawed_off",
            Galil => "galil",
            Famas => "famas",
            Ak47 => "ak47",
            M4a4 => "m4a4",
            M4a1S => "m4a1_s",
            Sg553 => "sg553",
            Aug => "aug",
            Ssg08 => "ssg08",
            Awp => "awp",
            Negev => "negev",
            M249 => "m249",
            Flashbang => "flashbang",
            Smoke => "smoke",
            HeGrenade => "he_grenade",
            Molotov => "molotov",
            Incendiary => "incendiary",
            Kevlar => "kevlar",
            KevlarHelmet => "kevlar_helmet",
            KnifeT => "knife_t",
            KnifeCt => "knife_ct",
            DefuseKit => "defuse_kit",
        }
    }

    pub fn display_name(&self) -> &'static str {
        use Item::*;
        match self {
            Glock => "Glock-18",
            UspS => "USP-S",
            P2000 => "P2000",
            P250 => "P250",
            DualBerettas => "Dual Berettas",
            FiveSeven => "Five-SeveN",
            Tec9 => "Tec-9",
            Cz75 => "CZ75-Auto",
            Deagle => "Desert Eagle",
            R8Revolver => "R8 Revolver",
            Mac10 => "MAC-10",
            Mp9 => "MP9",
            Mp7 => "MP7",
            Mp5Sd => "MP5-SD",
            Ump45 => "UMP-45",
            P90 => "P90",
            PpBizon => "PP-Bizon",
            Nova => "Nova",
            Xm1014 => "XM1014",
            Mag7 => "MAG-7",
            SawedOff => "Sawed-Off",
            Galil => "Galil AR",
            Famas => "FAMAS",
            Ak47 => "AK-47",
            M4a4 => "M4A4",
            M4a1S => "M4A1-S",
            Sg553 => "SG 553",
            Aug => "AUG",
            Ssg08 => "SSG 08",
            Awp => "AWP",
            Negev => "Negev",
            M249 => "M249",
            Flashbang => "Flashbang",
            Smoke => "Smoke Grenade",
            HeGrenade => "HE Grenade",
            Molotov => "Molotov",
            Incendiary => "Incendiary Grenade",
            Kevlar => "Kevlar Vest",
            KevlarHelmet => "Kevlar + Helmet",
            KnifeT => "Knife (T)",
            KnifeCt => "Knife (CT)",
            DefuseKit => "Defuse Kit",
        }
    }

    /// Exact identifier lookup (the inverse of [`Item::as_str`])
    pub fn from_id(id: &str) -> Option<Item> {
        ALL_ITEMS.iter().copied().find(|item| item.as_str() == id)
    }

    /// Lenient lookup for player input: identifiers, display names and shorthands
    pub fn parse(input: &str) -> Option<Item> {
        let normalized: String = input
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let alias = match normalized.as_str() {
            "ak" => Some(Item::Ak47),
            "m4" => Some(Item::M4a4),
            "m4a1" | "m4s" => Some(Item::M4a1S),
            "usp" => Some(Item::UspS),
            "deag" | "deagle" | "deserteagle" => Some(Item::Deagle),
            "r8" | "revolver" => Some(Item::R8Revolver),
            "scout" => Some(Item::Ssg08),
            "krieg" | "sg" => Some(Item::Sg553),
            "bizon" => Some(Item::PpBizon),
            "mp5" => Some(Item::Mp5Sd),
            "ump" => Some(Item::Ump45),
            "mac" => Some(Item::Mac10),
            "galil" => Some(Item::Galil),
            "cz" => Some(Item::Cz75),
            "duals" | "dualies" | "elites" => Some(Item::DualBerettas),
            "57" | "fiveseven" => Some(Item::FiveSeven),
            "tec" => Some(Item::Tec9),
            "glock18" => Some(Item::Glock),
            _ => None,
        };
        if alias.is_some() {
            return alias;
        }

        ALL_ITEMS.iter().copied().find(|item| {
            let id: String = item.as_str().chars().filter(|c| *c != '_').collect();
            let display: String = item
                .display_name()
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            id == normalized || display == normalized
        })
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

const ALL_ITEMS: [Item; 42] = [
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
    Item::Galil,
    Item::Famas,
    Item::Ak47,
    Item::M4a4,
    Item::M4a1S,
    Item::Sg553,
    Item::Aug,
    Item::Ssg08,
    Item::Awp,
    Item::Negev,
    Item::M249,
    Item::Flashbang,
    Item::Smoke,
    Item::HeGrenade,
    Item::Molotov,
    Item::Incendiary,
    Item::Kevlar,
    Item::KevlarHelmet,
    Item::KnifeT,
    Item::KnifeCt,
    Item::DefuseKit,
];

/// Knife handed to every player of a team
pub fn knife_for_team(team: Team) -> Item {
    match team {
        Team::Terrorist => Item::KnifeT,
        _ => Item::KnifeCt,
    }
}

/// Team-specific fire grenade
pub fn fire_grenade_for_team(team: Team) -> Item {
    match team {
        Team::Terrorist => Item::Molotov,
        _ => Item::Incendiary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_item_has_unique_identifier() {
        let mut seen = std::collections::HashSet::new();
        for item in ALL_ITEMS {
            assert!(seen.insert(item.as_str()), "duplicate id {}", item.as_str());
            assert_eq!(Item::from_id(item.as_str()), Some(item));
        }
    }

    #[test]
    fn test_identifiers_match_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            item: Item,
        }
        for item in ALL_ITEMS {
            let parsed: Wrapper = toml::from_str(&format!("item = \"{}\"", item.as_str()))
                .expect("identifier should deserialize");
            assert_eq!(parsed.item, item);
        }
    }

    #[test]
    fn test_parse_aliases_and_names() {
        assert_eq!(Item::parse("ak"), Some(Item::Ak47));
        assert_eq!(Item::parse("AK-47"), Some(Item::Ak47));
        assert_eq!(Item::parse("m4a1_s"), Some(Item::M4a1S));
        assert_eq!(Item::parse("M4A1-S"), Some(Item::M4a1S));
        assert_eq!(Item::parse("usp"), Some(Item::UspS));
        assert_eq!(Item::parse("awp"), Some(Item::Awp));
        assert_eq!(Item::parse("banana"), None);
    }

    #[test]
    fn test_team_restrictions() {
        assert!(Item::Ak47.is_available_to(Team::Terrorist));
        assert!(!Item::Ak47.is_available_to(Team::CounterTerrorist));
        assert!(Item::M4a1S.is_available_to(Team::CounterTerrorist));
        assert!(Item::Awp.is_available_to(Team::Terrorist));
        assert!(Item::Awp.is_available_to(Team::CounterTerrorist));
    }

    #[test]
    fn test_weapon_list_only_contains_weapons() {
        assert!(Item::WEAPONS.iter().all(|w| w.is_weapon()));
        assert!(!Item::Flashbang.is_weapon());
        assert!(!Item::DefuseKit.is_weapon());
    }
}
