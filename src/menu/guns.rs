//! Weapon preference menu
//!
//! T primary, T secondary, CT primary, CT secondary, then the AWP policy.
//! Every pick is persisted immediately, so a timeout or exit keeps the
//! steps already answered.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::menu::flow::{FlowContext, FlowOutcome, FlowTransition, MenuFlow};
use crate::menu::session::{AwpPolicy, MenuChoice, MenuKind, MenuStep, MenuView};
use crate::preferences::save_weapon_for_team;

pub const FINISHED_MESSAGE: &str = "You have finished setting up your weapons!";
pub const NEXT_ROUND_MESSAGE: &str =
    "The weapons you have selected will be given to you at the start of the next round!";

#[derive(Debug, Clone, Copy, Default)]
pub struct GunsMenu;

impl GunsMenu {
    pub fn new() -> Self {
        Self
    }

    fn next_step(step: MenuStep) -> FlowTransition {
        match step {
            MenuStep::TPrimary => FlowTransition::Next(MenuStep::TSecondary),
            MenuStep::TSecondary => FlowTransition::Next(MenuStep::CtPrimary),
            MenuStep::CtPrimary => FlowTransition::Next(MenuStep::CtSecondary),
            MenuStep::CtSecondary => FlowTransition::Next(MenuStep::AwpPolicy),
            MenuStep::AwpPolicy | MenuStep::RoundVote => FlowTransition::Complete,
        }
    }
}

impl MenuFlow for GunsMenu {
    fn kind(&self) -> MenuKind {
        MenuKind::Guns
    }

    fn first_step(&self) -> MenuStep {
        MenuStep::TPrimary
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.can_players_select_weapons()
    }

    fn view(&self, step: MenuStep, config: &Config) -> MenuView {
        match step.weapon_target() {
            Some((team, slot)) => MenuView::with_exit(
                format!("Select a {} Weapon", step.label()),
                step,
                config
                    .usable_weapons_for(slot, team)
                    .into_iter()
                    .map(MenuChoice::Weapon),
            ),
            None => MenuView::with_exit(
                "Select when to give the AWP",
                step,
                [
                    MenuChoice::Awp(AwpPolicy::Never),
                    MenuChoice::Awp(AwpPolicy::OnMyTurn),
                ],
            ),
        }
    }

    fn select(
        &self,
        ctx: &FlowContext<'_>,
        step: MenuStep,
        choice: MenuChoice,
    ) -> Result<Option<FlowOutcome>> {
        match (step, choice) {
            (MenuStep::AwpPolicy, MenuChoice::Awp(policy)) => {
                ctx.store
                    .set_awp_on_turn(ctx.player, policy == AwpPolicy::OnMyTurn)?;
                Ok(Some(FlowOutcome {
                    transition: FlowTransition::Complete,
                    messages: vec![
                        format!("You selected '{}' as when to give the AWP!", policy.label()),
                        FINISHED_MESSAGE.to_string(),
                        NEXT_ROUND_MESSAGE.to_string(),
                    ],
                }))
            }
            (_, MenuChoice::Weapon(weapon)) => {
                let Some((team, _)) = step.weapon_target() else {
                    return Ok(None);
                };
                save_weapon_for_team(ctx.store, ctx.player, team, weapon)?;
                tracing::debug!("Player {} picked {} as {}", ctx.player, weapon, step.label());
                Ok(Some(FlowOutcome {
                    transition: Self::next_step(step),
                    messages: vec![format!(
                        "You selected {} as {}!",
                        weapon.display_name(),
                        step.label()
                    )],
                }))
            }
            _ => Ok(None),
        }
    }
}
