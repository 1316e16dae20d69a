//! Menu identifiers, steps, choices and per-player sessions

use std::fmt;

use crate::core::types::{RoundType, Team};
use crate::items::{Item, WeaponSlot};

/// Registered menu flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MenuKind {
    Guns,
    NextRoundVote,
}

impl MenuKind {
    pub const ALL: [MenuKind; 2] = [MenuKind::Guns, MenuKind::NextRoundVote];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuKind::Guns => "guns",
            MenuKind::NextRoundVote => "next_round_vote",
        }
    }

    pub fn parse(input: &str) -> Option<MenuKind> {
        match input.trim().to_lowercase().as_str() {
            "guns" | "gun" | "weapons" => Some(MenuKind::Guns),
            "vote" | "nextroundvote" | "next_round_vote" => Some(MenuKind::NextRoundVote),
            _ => None,
        }
    }
}

impl fmt::Display for MenuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One single-choice screen of a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuStep {
    TPrimary,
    TSecondary,
    CtPrimary,
    CtSecondary,
    AwpPolicy,
    RoundVote,
}

impl MenuStep {
    /// Team and slot a weapon step writes to
    pub fn weapon_target(&self) -> Option<(Team, WeaponSlot)> {
        match self {
            MenuStep::TPrimary => Some((Team::Terrorist, WeaponSlot::FullBuyPrimary)),
            MenuStep::TSecondary => Some((Team::Terrorist, WeaponSlot::Secondary)),
            MenuStep::CtPrimary => Some((Team::CounterTerrorist, WeaponSlot::FullBuyPrimary)),
            MenuStep::CtSecondary => Some((Team::CounterTerrorist, WeaponSlot::Secondary)),
            MenuStep::AwpPolicy | MenuStep::RoundVote => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuStep::TPrimary => "T Primary",
            MenuStep::TSecondary => "T Secondary",
            MenuStep::CtPrimary => "CT Primary",
            MenuStep::CtSecondary => "CT Secondary",
            MenuStep::AwpPolicy => "AWP",
            MenuStep::RoundVote => "Next Round",
        }
    }
}

/// When to hand out the AWP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AwpPolicy {
    Never,
    OnMyTurn,
}

impl AwpPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            AwpPolicy::Never => "Never",
            AwpPolicy::OnMyTurn => "Always when it's my turn",
        }
    }
}

/// What a player picked on a menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuChoice {
    Weapon(Item),
    Awp(AwpPolicy),
    RoundType(RoundType),
    Exit,
}

impl MenuChoice {
    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::Weapon(item) => item.display_name(),
            MenuChoice::Awp(policy) => policy.label(),
            MenuChoice::RoundType(round_type) => round_type.display_name(),
            MenuChoice::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub choice: MenuChoice,
}

impl From<MenuChoice> for MenuOption {
    fn from(choice: MenuChoice) -> Self {
        Self {
            label: choice.label().to_string(),
            choice,
        }
    }
}

/// A rendered menu screen: title plus ordered options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub title: String,
    pub step: MenuStep,
    pub options: Vec<MenuOption>,
}

impl MenuView {
    /// Build a view with an `Exit` option appended
    pub fn with_exit(
        title: impl Into<String>,
        step: MenuStep,
        choices: impl IntoIterator<Item = MenuChoice>,
    ) -> Self {
        let mut options: Vec<MenuOption> = choices.into_iter().map(MenuOption::from).collect();
        options.push(MenuChoice::Exit.into());
        Self {
            title: title.into(),
            step,
            options,
        }
    }

    pub fn option(&self, index: usize) -> Option<&MenuOption> {
        self.options.get(index)
    }

    pub fn offers(&self, choice: MenuChoice) -> bool {
        self.options.iter().any(|option| option.choice == choice)
    }
}

/// Generation number of an armed menu timer
///
/// A timeout carrying an older token than the session's is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(pub u64);

/// A player's open menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSession {
    pub kind: MenuKind,
    pub step: MenuStep,
    pub timer: TimerToken,
}
