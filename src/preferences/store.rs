//! Preference storage contract

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::{PlayerId, Team};
use crate::items::{Item, WeaponSlot};

/// Everything stored for one player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerPreferences {
    weapons: BTreeMap<(Team, WeaponSlot), Item>,
    /// Give the AWP when it is this player's turn
    pub awp_on_turn: bool,
}

impl PlayerPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weapon(&self, team: Team, slot: WeaponSlot) -> Option<Item> {
        self.weapons.get(&(team, slot)).copied()
    }

    pub fn set_weapon(&mut self, team: Team, slot: WeaponSlot, weapon: Item) {
        self.weapons.insert((team, slot), weapon);
    }

    pub fn clear_weapon(&mut self, team: Team, slot: WeaponSlot) {
        self.weapons.remove(&(team, slot));
    }

    /// Stored weapons in (team, slot) order
    pub fn weapons(&self) -> impl Iterator<Item = (Team, WeaponSlot, Item)> + '_ {
        self.weapons
            .iter()
            .map(|((team, slot), weapon)| (*team, *slot, *weapon))
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty() && !self.awp_on_turn
    }
}

/// Persistent per-player preferences
///
/// Writes for one player never block another player's writes. Every write
/// is last-write-wins per (player, team, slot).
pub trait PreferenceStore: Send + Sync {
    fn set_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot, weapon: Item)
        -> Result<()>;

    /// Store `weapon` in several slots at once
    ///
    /// Either every slot is written or none is.
    fn set_weapon_slots(
        &self,
        player: PlayerId,
        team: Team,
        slots: &[WeaponSlot],
        weapon: Item,
    ) -> Result<()> {
        for slot in slots {
            self.set_weapon(player, team, *slot, weapon)?;
        }
        Ok(())
    }

    fn clear_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot) -> Result<()>;

    /// `false` removes the stored flag
    fn set_awp_on_turn(&self, player: PlayerId, on_turn: bool) -> Result<()>;

    /// Preferences of one player, empty if nothing is stored
    fn get(&self, player: PlayerId) -> Result<PlayerPreferences>;

    /// Batch read for a whole roster
    ///
    /// Players without stored preferences are absent from the map.
    fn get_many(&self, players: &[PlayerId]) -> Result<AHashMap<PlayerId, PlayerPreferences>>;
}
