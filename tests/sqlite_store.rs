//! Integration tests for the SQLite preference store on disk

use tempfile::TempDir;

use retake_allocator::core::config::{DatabaseConfig, DatabaseProvider};
use retake_allocator::core::{PlayerId, Team};
use retake_allocator::items::{Item, WeaponSlot};
use retake_allocator::preferences::{
    open_store, save_weapon_for_team, PreferenceStore, SqlitePreferenceStore,
};

fn sqlite_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        provider: DatabaseProvider::Sqlite,
        connection_string: dir
            .path()
            .join("db")
            .join("retakes.db")
            .to_string_lossy()
            .into_owned(),
    }
}

#[test]
fn test_preferences_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let database = sqlite_config(&dir);
    let player = PlayerId(76561198000000042);

    {
        let store = open_store(&database, true).unwrap();
        save_weapon_for_team(store.as_ref(), player, Team::CounterTerrorist, Item::UspS).unwrap();
        store
            .set_weapon(player, Team::CounterTerrorist, WeaponSlot::FullBuyPrimary, Item::M4a1S)
            .unwrap();
        store.set_awp_on_turn(player, true).unwrap();
    }

    let store = open_store(&database, false).unwrap();
    let prefs = store.get(player).unwrap();
    assert_eq!(prefs.weapon(Team::CounterTerrorist, WeaponSlot::PistolRound), Some(Item::UspS));
    assert_eq!(prefs.weapon(Team::CounterTerrorist, WeaponSlot::Secondary), Some(Item::UspS));
    assert_eq!(
        prefs.weapon(Team::CounterTerrorist, WeaponSlot::FullBuyPrimary),
        Some(Item::M4a1S)
    );
    assert_eq!(prefs.weapon(Team::Terrorist, WeaponSlot::FullBuyPrimary), None);
    assert!(prefs.awp_on_turn);
}

#[test]
fn test_batch_read_returns_only_players_with_data() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&sqlite_config(&dir), true).unwrap();

    store
        .set_weapon(PlayerId(1), Team::Terrorist, WeaponSlot::HalfBuyPrimary, Item::Mp7)
        .unwrap();
    store.set_awp_on_turn(PlayerId(2), true).unwrap();

    let found = store
        .get_many(&[PlayerId(1), PlayerId(2), PlayerId(3)])
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(
        found[&PlayerId(1)].weapon(Team::Terrorist, WeaponSlot::HalfBuyPrimary),
        Some(Item::Mp7)
    );
    assert!(!found[&PlayerId(1)].awp_on_turn);
    assert!(found[&PlayerId(2)].awp_on_turn);
    assert!(!found.contains_key(&PlayerId(3)));
}

#[test]
fn test_clearing_preferences() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&sqlite_config(&dir), true).unwrap();
    let player = PlayerId(7);

    store
        .set_weapon(player, Team::Terrorist, WeaponSlot::FullBuyPrimary, Item::Ak47)
        .unwrap();
    store.set_awp_on_turn(player, true).unwrap();
    store
        .clear_weapon(player, Team::Terrorist, WeaponSlot::FullBuyPrimary)
        .unwrap();
    store.set_awp_on_turn(player, false).unwrap();

    assert!(store.get(player).unwrap().is_empty());
    assert!(store.get_many(&[player]).unwrap().is_empty());
}

#[test]
fn test_unmigrated_database_reports_error() {
    let dir = TempDir::new().unwrap();
    let store = SqlitePreferenceStore::open(dir.path().join("empty.db")).unwrap();
    assert!(store.get(PlayerId(1)).is_err());
    store.migrate().unwrap();
    assert!(store.get(PlayerId(1)).unwrap().is_empty());
}
