//! Command execution - applies chat commands to stored preferences

use crate::command::parser::ChatCommand;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{PlayerId, RoundType, Team};
use crate::items::Item;
use crate::preferences::{preference_slots, save_weapon_for_team, PreferenceStore};

/// Who issued a command and against which config and store
pub struct CommandContext<'a> {
    pub config: &'a Config,
    pub store: &'a dyn PreferenceStore,
    pub player: PlayerId,
    /// Team the player is on right now, used when no team is given
    pub current_team: Team,
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub message: String,
    /// Round type the host should queue for the next round
    pub next_round_type: Option<RoundType>,
    pub error: Option<String>,
}

impl ExecutionResult {
    fn ok(message: String) -> Self {
        Self {
            message,
            next_round_type: None,
            error: None,
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            message: reason.clone(),
            next_round_type: None,
            error: Some(reason),
        }
    }
}

/// Executes chat commands
pub struct CommandExecutor;

impl CommandExecutor {
    /// Apply a parsed command
    ///
    /// Rule violations come back as a rejected result; only store failures
    /// are errors.
    pub fn execute(ctx: &CommandContext<'_>, command: &ChatCommand) -> Result<ExecutionResult> {
        match *command {
            ChatCommand::Gun { weapon, team } => Self::set_gun(ctx, weapon, team),
            ChatCommand::RemoveGun { weapon, team } => Self::remove_gun(ctx, weapon, team),
            ChatCommand::NextRound(round_type) => Ok(ExecutionResult {
                message: format!("The next round will be a {} round.", round_type.display_name()),
                next_round_type: Some(round_type),
                error: None,
            }),
        }
    }

    fn set_gun(ctx: &CommandContext<'_>, weapon: Item, team: Option<Team>) -> Result<ExecutionResult> {
        if !ctx.config.can_players_select_weapons() {
            return Ok(ExecutionResult::rejected(
                "Players cannot choose their weapons on this server.".to_string(),
            ));
        }
        if !ctx.player.is_authenticated() {
            return Ok(ExecutionResult::rejected(
                "You must be authenticated to save weapon preferences.".to_string(),
            ));
        }
        let team = match resolve_team(ctx, team) {
            Ok(team) => team,
            Err(rejected) => return Ok(rejected),
        };
        if !ctx.config.is_usable(weapon) {
            return Ok(ExecutionResult::rejected(format!(
                "{} is not allowed on this server.",
                weapon.display_name()
            )));
        }
        if !weapon.is_available_to(team) {
            return Ok(ExecutionResult::rejected(format!(
                "{} is not available to the {} team.",
                weapon.display_name(),
                team.short_name()
            )));
        }

        if weapon == Item::Awp {
            ctx.store.set_awp_on_turn(ctx.player, true)?;
            return Ok(ExecutionResult::ok(
                "You will get the AWP when it's your turn.".to_string(),
            ));
        }

        let slots = save_weapon_for_team(ctx.store, ctx.player, team, weapon)?;
        if slots.is_empty() {
            return Ok(ExecutionResult::rejected(format!(
                "{} cannot be chosen as a weapon preference.",
                weapon.display_name()
            )));
        }

        tracing::debug!("Player {} set {} for {:?}", ctx.player, weapon, slots);
        Ok(ExecutionResult::ok(format!(
            "{} is now your {} preference.",
            weapon.display_name(),
            team.short_name()
        )))
    }

    fn remove_gun(
        ctx: &CommandContext<'_>,
        weapon: Item,
        team: Option<Team>,
    ) -> Result<ExecutionResult> {
        if !ctx.player.is_authenticated() {
            return Ok(ExecutionResult::rejected(
                "You must be authenticated to change weapon preferences.".to_string(),
            ));
        }
        let team = match resolve_team(ctx, team) {
            Ok(team) => team,
            Err(rejected) => return Ok(rejected),
        };

        if weapon == Item::Awp {
            ctx.store.set_awp_on_turn(ctx.player, false)?;
            return Ok(ExecutionResult::ok(
                "You will no longer get the AWP.".to_string(),
            ));
        }

        let stored = ctx.store.get(ctx.player)?;
        let mut removed = 0;
        for slot in preference_slots(weapon, team) {
            if stored.weapon(team, slot) == Some(weapon) {
                ctx.store.clear_weapon(ctx.player, team, slot)?;
                removed += 1;
            }
        }

        if removed == 0 {
            return Ok(ExecutionResult::rejected(format!(
                "{} is not one of your {} preferences.",
                weapon.display_name(),
                team.short_name()
            )));
        }
        Ok(ExecutionResult::ok(format!(
            "Removed {} from your {} preferences.",
            weapon.display_name(),
            team.short_name()
        )))
    }
}

fn resolve_team(
    ctx: &CommandContext<'_>,
    team: Option<Team>,
) -> std::result::Result<Team, ExecutionResult> {
    match team.unwrap_or(ctx.current_team) {
        Team::None => Err(ExecutionResult::rejected(
            "Join a team or name one (t or ct).".to_string(),
        )),
        team => Ok(team),
    }
}
