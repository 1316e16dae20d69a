//! Retake Allocator - round types, weapon allocation and preference menus
//! for retake practice servers

pub mod allocation;
pub mod command;
pub mod core;
pub mod items;
pub mod menu;
pub mod preferences;
pub mod rounds;

/// Prefix of every chat line sent to players
pub const MESSAGE_PREFIX: &str = "[Retakes] ";
