//! In-memory preference store

use ahash::AHashMap;
use dashmap::DashMap;

use crate::core::error::Result;
use crate::core::types::{PlayerId, Team};
use crate::items::{Item, WeaponSlot};
use crate::preferences::store::{PlayerPreferences, PreferenceStore};

/// Process-local store, lost on restart
///
/// DashMap shards give each player key its own write lock.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    players: DashMap<PlayerId, PlayerPreferences>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn set_weapon(
        &self,
        player: PlayerId,
        team: Team,
        slot: WeaponSlot,
        weapon: Item,
    ) -> Result<()> {
        self.players
            .entry(player)
            .or_default()
            .set_weapon(team, slot, weapon);
        Ok(())
    }

    fn set_weapon_slots(
        &self,
        player: PlayerId,
        team: Team,
        slots: &[WeaponSlot],
        weapon: Item,
    ) -> Result<()> {
        let mut prefs = self.players.entry(player).or_default();
        for slot in slots {
            prefs.set_weapon(team, *slot, weapon);
        }
        Ok(())
    }

    fn clear_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot) -> Result<()> {
        if let Some(mut prefs) = self.players.get_mut(&player) {
            prefs.clear_weapon(team, slot);
        }
        self.players.remove_if(&player, |_, prefs| prefs.is_empty());
        Ok(())
    }

    fn set_awp_on_turn(&self, player: PlayerId, on_turn: bool) -> Result<()> {
        if on_turn {
            self.players.entry(player).or_default().awp_on_turn = true;
        } else {
            if let Some(mut prefs) = self.players.get_mut(&player) {
                prefs.awp_on_turn = false;
            }
            self.players.remove_if(&player, |_, prefs| prefs.is_empty());
        }
        Ok(())
    }

    fn get(&self, player: PlayerId) -> Result<PlayerPreferences> {
        Ok(self
            .players
            .get(&player)
            .map(|prefs| prefs.value().clone())
            .unwrap_or_default())
    }

    fn get_many(&self, players: &[PlayerId]) -> Result<AHashMap<PlayerId, PlayerPreferences>> {
        let mut found = AHashMap::with_capacity(players.len());
        for player in players {
            if let Some(prefs) = self.players.get(player) {
                found.insert(*player, prefs.value().clone());
            }
        }
        Ok(found)
    }
}
