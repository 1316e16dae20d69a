//! Allocator configuration
//!
//! Loaded once from TOML at startup and validated; afterwards it is only
//! replaced wholesale through [`ConfigHandle`]. Components read a snapshot
//! (`Arc<Config>`) and never see a half-applied reload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::core::error::{AllocatorError, Result};
use crate::core::types::{RoundType, Team};
use crate::items::{Item, WeaponSlot};

/// Upper bound on the rounds in one fixed-count or manual rotation
pub const MAX_ROTATION_ROUNDS: u64 = 10_000;

/// Ways a weapon slot may be filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSelectionType {
    PlayerChoice,
    Random,
    Default,
}

/// How the round type of each round is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundTypeSelection {
    /// Independent weighted draw every round
    Random,
    /// Shuffled rotation holding each type a fixed number of times
    RandomFixedCounts,
    /// Rotation in the listed order
    ManualOrdering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseProvider {
    Sqlite,
    Memory,
}

/// One value per round type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTypeTable {
    pub pistol: u32,
    pub half_buy: u32,
    pub full_buy: u32,
}

impl RoundTypeTable {
    pub fn get(&self, round_type: RoundType) -> u32 {
        match round_type {
            RoundType::Pistol => self.pistol,
            RoundType::HalfBuy => self.half_buy,
            RoundType::FullBuy => self.full_buy,
        }
    }

    /// Sum of all three values, wide enough that it cannot overflow
    pub fn total(&self) -> u64 {
        u64::from(self.pistol) + u64::from(self.half_buy) + u64::from(self.full_buy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOrderingItem {
    pub round_type: RoundType,
    pub count: u32,
}

/// Default weapon per slot for one team
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pistol_round: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_buy_primary: Option<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_buy_primary: Option<Item>,
    /// Rejected by validation; present so a stray entry is reported instead of ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<Item>,
}

impl TeamDefaults {
    pub fn get(&self, slot: WeaponSlot) -> Option<Item> {
        match slot {
            WeaponSlot::PistolRound => self.pistol_round,
            WeaponSlot::Secondary => self.secondary,
            WeaponSlot::HalfBuyPrimary => self.half_buy_primary,
            WeaponSlot::FullBuyPrimary => self.full_buy_primary,
            WeaponSlot::Preferred => self.preferred,
        }
    }
}

/// Default weapons keyed by (team, slot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultWeapons {
    pub terrorist: TeamDefaults,
    pub counter_terrorist: TeamDefaults,
}

impl DefaultWeapons {
    pub fn for_team(&self, team: Team) -> Option<&TeamDefaults> {
        match team {
            Team::Terrorist => Some(&self.terrorist),
            Team::CounterTerrorist => Some(&self.counter_terrorist),
            Team::None => None,
        }
    }

    pub fn get(&self, team: Team, slot: WeaponSlot) -> Option<Item> {
        self.for_team(team).and_then(|defaults| defaults.get(slot))
    }
}

impl Default for DefaultWeapons {
    fn default() -> Self {
        Self {
            terrorist: TeamDefaults {
                pistol_round: Some(Item::Glock),
                secondary: Some(Item::Glock),
                half_buy_primary: Some(Item::Mac10),
                full_buy_primary: Some(Item::Ak47),
                preferred: None,
            },
            counter_terrorist: TeamDefaults {
                pistol_round: Some(Item::UspS),
                secondary: Some(Item::UspS),
                half_buy_primary: Some(Item::Mp9),
                full_buy_primary: Some(Item::M4a1S),
                preferred: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub provider: DatabaseProvider,
    pub connection_string: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::Sqlite,
            connection_string: "data/retakes.db".to_string(),
        }
    }
}

/// Non-fatal configuration problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning(pub String);

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weapons the allocator may hand out or offer in menus
    pub usable_weapons: Vec<Item>,
    pub allowed_weapon_selection_types: Vec<WeaponSelectionType>,
    pub default_weapons: DefaultWeapons,

    pub round_type_selection: RoundTypeSelection,
    /// Percentages, must add up to 100
    pub round_type_percentages: RoundTypeTable,
    pub round_type_random_fixed_counts: RoundTypeTable,
    pub round_type_manual_ordering: Vec<ManualOrderingItem>,

    pub migrate_on_startup: bool,
    pub allow_allocation_after_freeze_time: bool,
    pub enable_round_type_announcement: bool,
    pub enable_next_round_type_voting: bool,
    /// Parsed and carried for hosts; no allocation rule reads it yet
    pub number_of_extra_vip_chances_for_preferred_weapon: u32,
    /// Parsed and carried for hosts; no allocation rule reads it yet
    pub allow_preferred_weapon_for_everyone: bool,

    /// Seconds of menu inactivity before the session is closed
    pub menu_timeout_secs: u64,

    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            usable_weapons: Item::WEAPONS.to_vec(),
            allowed_weapon_selection_types: vec![
                WeaponSelectionType::PlayerChoice,
                WeaponSelectionType::Random,
                WeaponSelectionType::Default,
            ],
            default_weapons: DefaultWeapons::default(),
            round_type_selection: RoundTypeSelection::Random,
            round_type_percentages: RoundTypeTable {
                pistol: 15,
                half_buy: 25,
                full_buy: 60,
            },
            round_type_random_fixed_counts: RoundTypeTable {
                pistol: 5,
                half_buy: 10,
                full_buy: 15,
            },
            round_type_manual_ordering: vec![
                ManualOrderingItem {
                    round_type: RoundType::Pistol,
                    count: 5,
                },
                ManualOrderingItem {
                    round_type: RoundType::HalfBuy,
                    count: 10,
                },
                ManualOrderingItem {
                    round_type: RoundType::FullBuy,
                    count: 15,
                },
            ],
            migrate_on_startup: true,
            allow_allocation_after_freeze_time: false,
            enable_round_type_announcement: true,
            enable_next_round_type_voting: false,
            number_of_extra_vip_chances_for_preferred_weapon: 1,
            allow_preferred_weapon_for_everyone: false,
            menu_timeout_secs: 30,
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text without validating it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        let warnings = config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok((config, warnings))
    }

    /// Load a config file, writing the defaults first if it does not exist
    pub fn load_or_create(path: &Path) -> Result<(Self, Vec<ConfigWarning>)> {
        if !path.exists() {
            tracing::info!("No config at {:?}, writing defaults", path);
            Self::default().save(path)?;
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check the config for internal consistency
    ///
    /// Errors mean the config must not be used. Warnings are logged and
    /// returned so callers can surface them.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>> {
        if self.round_type_percentages.total() != 100 {
            return Err(AllocatorError::InvalidConfig(format!(
                "'round_type_percentages' values must add up to 100 (got {})",
                self.round_type_percentages.total()
            )));
        }

        match self.round_type_selection {
            RoundTypeSelection::Random => {}
            RoundTypeSelection::RandomFixedCounts => {
                Self::validate_rotation_length(
                    "round_type_random_fixed_counts",
                    self.round_type_random_fixed_counts.total(),
                )?;
            }
            RoundTypeSelection::ManualOrdering => {
                let rounds: u64 = self
                    .round_type_manual_ordering
                    .iter()
                    .map(|item| u64::from(item.count))
                    .sum();
                Self::validate_rotation_length("round_type_manual_ordering", rounds)?;
            }
        }

        if self.menu_timeout_secs == 0 {
            return Err(AllocatorError::InvalidConfig(
                "'menu_timeout_secs' must be greater than 0".into(),
            ));
        }

        let mut warnings = Vec::new();
        warnings.extend(self.validate_default_weapons(Team::Terrorist)?);
        warnings.extend(self.validate_default_weapons(Team::CounterTerrorist)?);

        for warning in &warnings {
            tracing::warn!("[CONFIG WARNING] {}", warning);
        }

        Ok(warnings)
    }

    fn validate_rotation_length(key: &str, rounds: u64) -> Result<()> {
        if rounds == 0 {
            return Err(AllocatorError::InvalidConfig(format!(
                "'{}' must contain at least one round",
                key
            )));
        }
        if rounds > MAX_ROTATION_ROUNDS {
            return Err(AllocatorError::InvalidConfig(format!(
                "'{}' holds {} rounds, the limit is {}",
                key, rounds, MAX_ROTATION_ROUNDS
            )));
        }
        Ok(())
    }

    fn validate_default_weapons(&self, team: Team) -> Result<Vec<ConfigWarning>> {
        let mut warnings = Vec::new();
        let key = team.as_str();
        let Some(defaults) = self.default_weapons.for_team(team) else {
            warnings.push(ConfigWarning(format!("Missing {} in default_weapons config.", key)));
            return Ok(warnings);
        };

        if defaults.preferred.is_some() {
            return Err(AllocatorError::InvalidConfig(format!(
                "preferred is not a valid default weapon slot for default_weapons.{}",
                key
            )));
        }

        for slot in WeaponSlot::DEFAULTABLE {
            let Some(weapon) = defaults.get(slot) else {
                warnings.push(ConfigWarning(format!(
                    "Missing {} in default_weapons.{} config.",
                    slot.as_str(),
                    key
                )));
                continue;
            };

            if !slot.accepts(weapon, team) {
                return Err(AllocatorError::InvalidConfig(format!(
                    "{} is not a valid {} weapon for default_weapons.{}",
                    weapon.as_str(),
                    slot.as_str(),
                    key
                )));
            }

            if !self.usable_weapons.contains(&weapon) {
                warnings.push(ConfigWarning(format!(
                    "{} in the default_weapons.{}.{} config is not in the usable_weapons list.",
                    weapon.as_str(),
                    key,
                    slot.as_str()
                )));
            }
        }

        Ok(warnings)
    }

    /// Configured weight of a round type as a fraction of 1
    pub fn round_type_percentage(&self, round_type: RoundType) -> f64 {
        f64::from(self.round_type_percentages.get(round_type)) / 100.0
    }

    pub fn can_players_select_weapons(&self) -> bool {
        self.allowed_weapon_selection_types
            .contains(&WeaponSelectionType::PlayerChoice)
    }

    pub fn can_assign_random_weapons(&self) -> bool {
        self.allowed_weapon_selection_types
            .contains(&WeaponSelectionType::Random)
    }

    pub fn can_assign_default_weapons(&self) -> bool {
        self.allowed_weapon_selection_types
            .contains(&WeaponSelectionType::Default)
    }

    pub fn is_usable(&self, weapon: Item) -> bool {
        self.usable_weapons.contains(&weapon)
    }

    /// Usable weapons for a slot and team, in catalog order
    pub fn usable_weapons_for(&self, slot: WeaponSlot, team: Team) -> Vec<Item> {
        slot.weapons_for(team)
            .into_iter()
            .filter(|w| self.is_usable(*w))
            .collect()
    }

    pub fn default_weapon(&self, team: Team, slot: WeaponSlot) -> Option<Item> {
        self.default_weapons.get(team, slot)
    }

    pub fn menu_timeout(&self) -> Duration {
        Duration::from_secs(self.menu_timeout_secs)
    }
}

// === SHARED CONFIG HANDLE ===

/// Shared, swappable config snapshot
///
/// Clones share the same slot. A reload validates first and swaps only on
/// success, so an invalid file never replaces a working config.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<Arc<Config>>>,
}

impl ConfigHandle {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Config> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    /// Validate and install a new config
    pub fn replace(&self, config: Config) -> Result<Vec<ConfigWarning>> {
        let warnings = config.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(config);
        Ok(warnings)
    }

    /// Re-read a config file and install it if valid
    pub fn reload_from(&self, path: &Path) -> Result<Vec<ConfigWarning>> {
        let content = fs::read_to_string(path)?;
        let config = Config::from_toml_str(&content)?;
        let warnings = self.replace(config)?;
        tracing::info!("Reloaded config from {:?}", path);
        Ok(warnings)
    }
}
