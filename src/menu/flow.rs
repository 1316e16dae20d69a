//! Menu flow contract

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::PlayerId;
use crate::menu::session::{MenuChoice, MenuKind, MenuStep, MenuView};
use crate::preferences::PreferenceStore;

/// What a flow needs to apply a selection
pub struct FlowContext<'a> {
    pub config: &'a Config,
    pub store: &'a dyn PreferenceStore,
    pub player: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTransition {
    Next(MenuStep),
    Complete,
}

/// Result of an applied selection plus the chat lines to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOutcome {
    pub transition: FlowTransition,
    pub messages: Vec<String>,
}

/// A sequence of single-choice steps
///
/// Flows are stateless; the coordinator owns the sessions and timers.
pub trait MenuFlow: Send + Sync {
    fn kind(&self) -> MenuKind;

    fn first_step(&self) -> MenuStep;

    /// Whether the flow can be opened under this config
    fn is_enabled(&self, _config: &Config) -> bool {
        true
    }

    fn view(&self, step: MenuStep, config: &Config) -> MenuView;

    /// Apply a choice offered by `view(step)`; `Exit` never reaches a flow
    ///
    /// `Ok(None)` means the choice does not apply to the step. An error
    /// must leave nothing half-advanced: the coordinator keeps the session
    /// on `step`.
    fn select(
        &self,
        ctx: &FlowContext<'_>,
        step: MenuStep,
        choice: MenuChoice,
    ) -> Result<Option<FlowOutcome>>;
}
