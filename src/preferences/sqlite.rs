//! SQLite-backed preference store

use ahash::AHashMap;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::error::{AllocatorError, Result};
use crate::core::types::{PlayerId, Team};
use crate::items::{Item, WeaponSlot};
use crate::preferences::store::{PlayerPreferences, PreferenceStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS weapon_preferences (
    player_id INTEGER NOT NULL,
    team      TEXT    NOT NULL,
    slot      TEXT    NOT NULL,
    weapon    TEXT    NOT NULL,
    PRIMARY KEY (player_id, team, slot)
);
CREATE TABLE IF NOT EXISTS awp_preferences (
    player_id INTEGER PRIMARY KEY,
    on_turn   INTEGER NOT NULL
);
"#;

const UPSERT_WEAPON: &str = r#"
INSERT INTO weapon_preferences (player_id, team, slot, weapon)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (player_id, team, slot) DO UPDATE SET weapon = excluded.weapon
"#;

/// Preference rows in a SQLite database
///
/// Player ids are stored as `INTEGER`; SteamID64 values fit in an i64.
pub struct SqlitePreferenceStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqlitePreferenceStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Create the preference tables if they do not exist
    pub fn migrate(&self) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(SCHEMA)?;
        tracing::debug!("Preference tables ready");
        Ok(())
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AllocatorError::Store(format!("connection lock poisoned: {}", e)))
    }
}

/// Decode a weapon row, `None` (with a warning) if any identifier is unknown
fn decode_weapon_row(
    player_id: i64,
    team: &str,
    slot: &str,
    weapon: &str,
) -> Option<(PlayerId, Team, WeaponSlot, Item)> {
    let decoded = (
        Team::from_db(team),
        WeaponSlot::from_db(slot),
        Item::from_id(weapon),
    );
    match decoded {
        (Some(team), Some(slot), Some(weapon)) => {
            Some((PlayerId(player_id as u64), team, slot, weapon))
        }
        _ => {
            tracing::warn!(
                "Skipping stored preference for player {}: unknown row ({}, {}, {})",
                player_id,
                team,
                slot,
                weapon
            );
            None
        }
    }
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

impl PreferenceStore for SqlitePreferenceStore {
    fn set_weapon(
        &self,
        player: PlayerId,
        team: Team,
        slot: WeaponSlot,
        weapon: Item,
    ) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute(
            UPSERT_WEAPON,
            params![player.0 as i64, team.as_str(), slot.as_str(), weapon.as_str()],
        )?;
        Ok(())
    }

    fn set_weapon_slots(
        &self,
        player: PlayerId,
        team: Team,
        slots: &[WeaponSlot],
        weapon: Item,
    ) -> Result<()> {
        let mut conn = self.get_conn()?;
        // Dropping the transaction on error rolls back earlier slots
        let tx = conn.transaction()?;
        for slot in slots {
            tx.execute(
                UPSERT_WEAPON,
                params![player.0 as i64, team.as_str(), slot.as_str(), weapon.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear_weapon(&self, player: PlayerId, team: Team, slot: WeaponSlot) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM weapon_preferences WHERE player_id = ?1 AND team = ?2 AND slot = ?3",
            params![player.0 as i64, team.as_str(), slot.as_str()],
        )?;
        Ok(())
    }

    fn set_awp_on_turn(&self, player: PlayerId, on_turn: bool) -> Result<()> {
        let conn = self.get_conn()?;
        if on_turn {
            conn.execute(
                r#"
                INSERT INTO awp_preferences (player_id, on_turn) VALUES (?1, 1)
                ON CONFLICT (player_id) DO UPDATE SET on_turn = 1
                "#,
                params![player.0 as i64],
            )?;
        } else {
            conn.execute(
                "DELETE FROM awp_preferences WHERE player_id = ?1",
                params![player.0 as i64],
            )?;
        }
        Ok(())
    }

    fn get(&self, player: PlayerId) -> Result<PlayerPreferences> {
        let mut found = self.get_many(&[player])?;
        Ok(found.remove(&player).unwrap_or_default())
    }

    fn get_many(&self, players: &[PlayerId]) -> Result<AHashMap<PlayerId, PlayerPreferences>> {
        let mut found: AHashMap<PlayerId, PlayerPreferences> = AHashMap::new();
        if players.is_empty() {
            return Ok(found);
        }

        let ids: Vec<i64> = players.iter().map(|p| p.0 as i64).collect();
        let conn = self.get_conn()?;

        let sql = format!(
            "SELECT player_id, team, slot, weapon FROM weapon_preferences WHERE player_id IN ({})",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (player_id, team, slot, weapon) = row?;
            if let Some((player, team, slot, weapon)) =
                decode_weapon_row(player_id, &team, &slot, &weapon)
            {
                found
                    .entry(player)
                    .or_default()
                    .set_weapon(team, slot, weapon);
            }
        }

        let sql = format!(
            "SELECT player_id FROM awp_preferences WHERE on_turn = 1 AND player_id IN ({})",
            placeholders(ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), |row| row.get::<_, i64>(0))?;
        for row in rows {
            let player = PlayerId(row? as u64);
            found.entry(player).or_default().awp_on_turn = true;
        }

        Ok(found)
    }
}
