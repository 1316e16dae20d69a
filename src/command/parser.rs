//! Chat command parsing
//!
//! `gun <weapon> [t|ct]`, `removegun <weapon> [t|ct]`, `nextround <type>`.
//! A leading `!` or `/` is accepted, as typed in game chat.

use crate::core::error::{AllocatorError, Result};
use crate::core::types::{RoundType, Team};
use crate::items::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Gun { weapon: Item, team: Option<Team> },
    RemoveGun { weapon: Item, team: Option<Team> },
    NextRound(RoundType),
}

/// Parse one chat line
///
/// `Ok(None)` when the line is not one of these commands; malformed
/// arguments are an error carrying the usage text.
pub fn parse_command(input: &str) -> Result<Option<ChatCommand>> {
    let line = input.trim().trim_start_matches(['!', '/']);
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    match name.to_lowercase().as_str() {
        "gun" => {
            let (weapon, team) = parse_weapon_args(&args, "gun")?;
            Ok(Some(ChatCommand::Gun { weapon, team }))
        }
        "removegun" => {
            let (weapon, team) = parse_weapon_args(&args, "removegun")?;
            Ok(Some(ChatCommand::RemoveGun { weapon, team }))
        }
        "nextround" => {
            let [round_type] = args.as_slice() else {
                return Err(usage("nextround <pistol|halfbuy|fullbuy>"));
            };
            RoundType::parse(round_type)
                .map(|rt| Some(ChatCommand::NextRound(rt)))
                .ok_or_else(|| {
                    AllocatorError::Command(format!("Unknown round type '{}'", round_type))
                })
        }
        _ => Ok(None),
    }
}

fn parse_weapon_args(args: &[&str], command: &str) -> Result<(Item, Option<Team>)> {
    let (weapon, team) = match args {
        [weapon] => (*weapon, None),
        [weapon, team] => {
            let team = Team::parse(team).ok_or_else(|| usage(&format!("{} <weapon> [t|ct]", command)))?;
            (*weapon, Some(team))
        }
        _ => return Err(usage(&format!("{} <weapon> [t|ct]", command))),
    };

    let weapon = Item::parse(weapon).ok_or_else(|| AllocatorError::UnknownWeapon(weapon.to_string()))?;
    Ok((weapon, team))
}

fn usage(text: &str) -> AllocatorError {
    AllocatorError::Command(format!("Usage: {}", text))
}
