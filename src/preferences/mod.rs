//! Player weapon preferences and their storage backends

pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::InMemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;
pub use store::{PlayerPreferences, PreferenceStore};

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::core::config::{DatabaseConfig, DatabaseProvider};
use crate::core::error::Result;
use crate::core::types::{PlayerId, Team};
use crate::items::{Item, WeaponSlot};

/// Slots a weapon preference applies to on a team
///
/// The AWP is stored as a flag, not a slot, so `Preferred` is never listed.
pub fn preference_slots(weapon: Item, team: Team) -> Vec<WeaponSlot> {
    WeaponSlot::slots_for(weapon)
        .into_iter()
        .filter(|slot| *slot != WeaponSlot::Preferred && slot.accepts(weapon, team))
        .collect()
}

/// Store `weapon` for every slot it fills on `team`, returning those slots
pub fn save_weapon_for_team(
    store: &dyn PreferenceStore,
    player: PlayerId,
    team: Team,
    weapon: Item,
) -> Result<Vec<WeaponSlot>> {
    let slots = preference_slots(weapon, team);
    store.set_weapon_slots(player, team, &slots, weapon)?;
    Ok(slots)
}

/// Open the store named by the database config
///
/// SQLite parent directories are created on demand; tables are created
/// only when `migrate` is set.
pub fn open_store(database: &DatabaseConfig, migrate: bool) -> Result<Arc<dyn PreferenceStore>> {
    match database.provider {
        DatabaseProvider::Memory => {
            tracing::info!("Using in-memory preference store");
            Ok(Arc::new(InMemoryPreferenceStore::new()))
        }
        DatabaseProvider::Sqlite => {
            let path = Path::new(&database.connection_string);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let store = SqlitePreferenceStore::open(path)?;
            if migrate {
                store.migrate()?;
            }
            tracing::info!("Using SQLite preference store at {:?}", path);
            Ok(Arc::new(store))
        }
    }
}
