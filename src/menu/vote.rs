//! Next-round-type vote menu

use std::sync::{Arc, Mutex};

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::RoundType;
use crate::menu::flow::{FlowContext, FlowOutcome, FlowTransition, MenuFlow};
use crate::menu::session::{MenuChoice, MenuKind, MenuStep, MenuView};
use crate::rounds::RoundVotes;

/// Single-step vote, only available when voting is enabled
pub struct NextRoundVoteMenu {
    votes: Arc<Mutex<RoundVotes>>,
}

impl NextRoundVoteMenu {
    pub fn new(votes: Arc<Mutex<RoundVotes>>) -> Self {
        Self { votes }
    }
}

impl MenuFlow for NextRoundVoteMenu {
    fn kind(&self) -> MenuKind {
        MenuKind::NextRoundVote
    }

    fn first_step(&self) -> MenuStep {
        MenuStep::RoundVote
    }

    fn is_enabled(&self, config: &Config) -> bool {
        config.enable_next_round_type_voting
    }

    fn view(&self, step: MenuStep, _config: &Config) -> MenuView {
        MenuView::with_exit(
            "Vote for the next round type",
            step,
            RoundType::ALL.into_iter().map(MenuChoice::RoundType),
        )
    }

    fn select(
        &self,
        ctx: &FlowContext<'_>,
        step: MenuStep,
        choice: MenuChoice,
    ) -> Result<Option<FlowOutcome>> {
        let (MenuStep::RoundVote, MenuChoice::RoundType(round_type)) = (step, choice) else {
            return Ok(None);
        };

        self.votes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cast(ctx.player, round_type);
        tracing::debug!("Player {} voted for {}", ctx.player, round_type);

        Ok(Some(FlowOutcome {
            transition: FlowTransition::Complete,
            messages: vec![format!(
                "You voted for {} as the next round type!",
                round_type.display_name()
            )],
        }))
    }
}
