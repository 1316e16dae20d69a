//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric player identity (SteamID64 on live servers)
///
/// Id 0 is reserved for players that are not authenticated yet; they are
/// allocated items but never have stored preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    pub const UNAUTHENTICATED: PlayerId = PlayerId(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Side a player is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Terrorist,
    CounterTerrorist,
    None,
}

impl Team {
    /// Parse a team name as typed in chat (`t`, `ct`, full names)
    pub fn parse(input: &str) -> Option<Team> {
        match input.trim().to_lowercase().as_str() {
            "t" | "terrorist" => Some(Team::Terrorist),
            "ct" | "counterterrorist" | "counter_terrorist" => Some(Team::CounterTerrorist),
            _ => None,
        }
    }

    /// Identifier used in persisted rows
    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Terrorist => "terrorist",
            Team::CounterTerrorist => "counter_terrorist",
            Team::None => "none",
        }
    }

    pub fn from_db(value: &str) -> Option<Team> {
        match value {
            "terrorist" => Some(Team::Terrorist),
            "counter_terrorist" => Some(Team::CounterTerrorist),
            "none" => Some(Team::None),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Team::Terrorist => "T",
            Team::CounterTerrorist => "CT",
            Team::None => "-",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Economy tier of the upcoming round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Pistol,
    HalfBuy,
    FullBuy,
}

impl RoundType {
    pub const ALL: [RoundType; 3] = [RoundType::Pistol, RoundType::HalfBuy, RoundType::FullBuy];

    /// Parse a round type from chat or admin input, accepting the usual shorthands
    pub fn parse(input: &str) -> Option<RoundType> {
        match input.trim().to_lowercase().as_str() {
            "f" | "full" | "fullbuy" => Some(RoundType::FullBuy),
            "h" | "half" | "halfbuy" | "force" | "forcebuy" => Some(RoundType::HalfBuy),
            "p" | "pistol" => Some(RoundType::Pistol),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoundType::Pistol => "Pistol",
            RoundType::HalfBuy => "Half Buy",
            RoundType::FullBuy => "Full Buy",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
