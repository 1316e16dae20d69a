//! Integration tests for loading, validating and reloading config files

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use retake_allocator::core::config::{Config, DatabaseProvider, RoundTypeSelection};
use retake_allocator::core::{AllocatorError, ConfigHandle};
use retake_allocator::items::Item;

#[test]
fn test_shipped_config_loads_without_warnings() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/config.toml");
    let (config, warnings) = Config::load(Path::new(path)).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    assert_eq!(config.round_type_percentages.total(), 100);
    assert_eq!(config.menu_timeout_secs, 30);
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let (config, warnings) = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert!(warnings.is_empty());
    assert_eq!(config, Config::default());

    // Second call reads the file that was written
    let (again, _) = Config::load_or_create(&path).unwrap();
    assert_eq!(again, config);
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
round_type_selection = "manual_ordering"
enable_next_round_type_voting = true

[database]
provider = "memory"
"#,
    )
    .unwrap();

    let (config, _) = Config::load(&path).unwrap();
    assert_eq!(config.round_type_selection, RoundTypeSelection::ManualOrdering);
    assert!(config.enable_next_round_type_voting);
    assert_eq!(config.database.provider, DatabaseProvider::Memory);
    assert_eq!(config.usable_weapons, Item::WEAPONS.to_vec());
}

#[test]
fn test_percentages_must_total_100() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[round_type_percentages]
pistol = 20
half_buy = 20
full_buy = 20
"#,
    )
    .unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, AllocatorError::InvalidConfig(_)), "{}", err);
}

#[test]
fn test_huge_percentages_are_rejected_not_wrapped() {
    // 4294967295 + 101 wraps to 100 in 32 bits
    let err = Config::from_toml_str(
        r#"
[round_type_percentages]
pistol = 4294967295
half_buy = 101
full_buy = 0
"#,
    )
    .and_then(|config| config.validate())
    .unwrap_err();
    assert!(matches!(err, AllocatorError::InvalidConfig(_)), "{}", err);
}

#[test]
fn test_rotation_length_is_capped() {
    let err = Config::from_toml_str(
        r#"
round_type_selection = "manual_ordering"
round_type_manual_ordering = [
    { round_type = "pistol", count = 4000000000 },
    { round_type = "full_buy", count = 5 },
]
"#,
    )
    .and_then(|config| config.validate())
    .unwrap_err();
    assert!(matches!(err, AllocatorError::InvalidConfig(_)), "{}", err);
    assert!(err.to_string().contains("round_type_manual_ordering"), "{}", err);
}

#[test]
fn test_unknown_weapon_id_is_a_parse_error() {
    let err = Config::from_toml_str(r#"usable_weapons = ["ak47", "raygun"]"#).unwrap_err();
    assert!(matches!(err, AllocatorError::TomlDe(_)), "{}", err);
}

#[test]
fn test_default_outside_usable_weapons_warns() {
    let config = Config::from_toml_str(r#"usable_weapons = ["glock", "usp_s", "mac10", "mp9", "m4a1_s"]"#)
        .unwrap();
    let warnings = config.validate().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "ak47 in the default_weapons.terrorist.full_buy_primary config is not in the usable_weapons list."
    );
}

#[test]
fn test_default_in_wrong_slot_is_fatal() {
    let config = Config::from_toml_str(
        r#"
[default_weapons.counter_terrorist]
full_buy_primary = "ak47"
"#,
    )
    .unwrap();
    assert!(matches!(config.validate(), Err(AllocatorError::InvalidConfig(_))));
}

#[test]
fn test_reload_keeps_previous_config_when_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let (config, _) = Config::load_or_create(&path).unwrap();
    let handle = ConfigHandle::new(config);
    let before = handle.snapshot();

    fs::write(&path, "menu_timeout_secs = 0\n").unwrap();
    assert!(handle.reload_from(&path).is_err());
    assert_eq!(*handle.snapshot(), *before);

    fs::write(&path, "menu_timeout_secs = 45\n").unwrap();
    handle.reload_from(&path).unwrap();
    assert_eq!(handle.snapshot().menu_timeout_secs, 45);
    // Snapshots taken earlier are unaffected
    assert_eq!(before.menu_timeout_secs, 30);
}
