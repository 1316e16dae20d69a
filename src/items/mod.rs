//! Items, weapon slots and per-player item sets

pub mod catalog;
pub mod item_set;
pub mod slots;

pub use catalog::{fire_grenade_for_team, knife_for_team, Item, ItemCategory};
pub use item_set::ItemSet;
pub use slots::WeaponSlot;
