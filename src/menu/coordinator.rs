//! Menu coordinator
//!
//! Owns the flow registry and the per-player session table. Every
//! transition goes through [`MenuCoordinator::dispatch`], which checks the
//! session and step (or timer token) before acting, so duplicate or stale
//! callbacks fall through as `MenuOutcome::Ignored`.

use ahash::AHashMap;
use std::sync::Arc;

use crate::core::config::ConfigHandle;
use crate::core::error::Result;
use crate::core::types::PlayerId;
use crate::menu::flow::{FlowContext, FlowTransition, MenuFlow};
use crate::menu::host::{MenuPresenter, TimerScheduler};
use crate::menu::session::{MenuChoice, MenuKind, MenuSession, MenuStep, TimerToken};
use crate::preferences::PreferenceStore;
use crate::MESSAGE_PREFIX;

pub const ALREADY_IN_MENU_MESSAGE: &str = "You are already using another menu!";
pub const MENU_DISABLED_MESSAGE: &str = "This menu is disabled on this server!";
pub const EXIT_MESSAGE: &str = "You have exited the menu.";
pub const UNAUTHENTICATED_MESSAGE: &str = "You must be authenticated to use this menu.";

/// Inputs to the menu state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Open {
        player: PlayerId,
        kind: MenuKind,
    },
    Select {
        player: PlayerId,
        step: MenuStep,
        choice: MenuChoice,
    },
    Timeout {
        player: PlayerId,
        token: TimerToken,
    },
    Disconnect {
        player: PlayerId,
    },
}

/// What a dispatched event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Stale or irrelevant event, nothing changed
    Ignored,
    Opened(MenuStep),
    AlreadyInMenu,
    /// Player id 0 has nowhere to store a choice
    Unauthenticated,
    Disabled,
    UnknownMenu,
    Advanced(MenuStep),
    Completed,
    Cancelled,
    TimedOut,
    Disconnected,
}

pub struct MenuCoordinator<P: MenuPresenter, S: TimerScheduler> {
    flows: AHashMap<MenuKind, Box<dyn MenuFlow>>,
    sessions: AHashMap<PlayerId, MenuSession>,
    config: ConfigHandle,
    store: Arc<dyn PreferenceStore>,
    presenter: P,
    scheduler: S,
    next_token: u64,
}

impl<P: MenuPresenter, S: TimerScheduler> MenuCoordinator<P, S> {
    pub fn new(
        config: ConfigHandle,
        store: Arc<dyn PreferenceStore>,
        presenter: P,
        scheduler: S,
    ) -> Self {
        Self {
            flows: AHashMap::new(),
            sessions: AHashMap::new(),
            config,
            store,
            presenter,
            scheduler,
            next_token: 0,
        }
    }

    /// Register a flow under its own kind, replacing any previous one
    pub fn register(&mut self, flow: Box<dyn MenuFlow>) {
        self.flows.insert(flow.kind(), flow);
    }

    /// Single entry point for every menu transition
    ///
    /// Only a selection can fail, and only when the preference store does;
    /// the session then stays on its current step.
    pub fn dispatch(&mut self, event: MenuEvent) -> Result<MenuOutcome> {
        match event {
            MenuEvent::Open { player, kind } => Ok(self.handle_open(player, kind)),
            MenuEvent::Select {
                player,
                step,
                choice,
            } => self.handle_select(player, step, choice),
            MenuEvent::Timeout { player, token } => Ok(self.handle_timeout(player, token)),
            MenuEvent::Disconnect { player } => Ok(self.handle_disconnect(player)),
        }
    }

    /// Open a menu; `false` if the player is already in one or it cannot open
    pub fn open_menu(&mut self, player: PlayerId, kind: MenuKind) -> bool {
        matches!(
            self.dispatch(MenuEvent::Open { player, kind }),
            Ok(MenuOutcome::Opened(_))
        )
    }

    pub fn select(
        &mut self,
        player: PlayerId,
        step: MenuStep,
        choice: MenuChoice,
    ) -> Result<MenuOutcome> {
        self.dispatch(MenuEvent::Select {
            player,
            step,
            choice,
        })
    }

    /// Select by position in the player's current menu
    pub fn select_index(&mut self, player: PlayerId, index: usize) -> Result<MenuOutcome> {
        let Some(session) = self.sessions.get(&player).copied() else {
            return Ok(MenuOutcome::Ignored);
        };
        let Some(flow) = self.flows.get(&session.kind) else {
            return Ok(MenuOutcome::Ignored);
        };
        let config = self.config.snapshot();
        let view = flow.view(session.step, &config);
        match view.option(index) {
            Some(option) => self.select(player, session.step, option.choice),
            None => Ok(MenuOutcome::Ignored),
        }
    }

    pub fn on_timeout(&mut self, player: PlayerId, token: TimerToken) -> MenuOutcome {
        self.handle_timeout(player, token)
    }

    pub fn on_disconnect(&mut self, player: PlayerId) -> MenuOutcome {
        self.handle_disconnect(player)
    }

    pub fn session(&self, player: PlayerId) -> Option<&MenuSession> {
        self.sessions.get(&player)
    }

    pub fn is_in_menu(&self, player: PlayerId) -> bool {
        self.sessions.contains_key(&player)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn handle_open(&mut self, player: PlayerId, kind: MenuKind) -> MenuOutcome {
        if !player.is_authenticated() {
            self.notify(player, UNAUTHENTICATED_MESSAGE);
            return MenuOutcome::Unauthenticated;
        }
        if self.sessions.contains_key(&player) {
            self.notify(player, ALREADY_IN_MENU_MESSAGE);
            return MenuOutcome::AlreadyInMenu;
        }

        let config = self.config.snapshot();
        let Some(flow) = self.flows.get(&kind) else {
            tracing::warn!("No menu registered for {}", kind);
            return MenuOutcome::UnknownMenu;
        };
        if !flow.is_enabled(&config) {
            self.notify(player, MENU_DISABLED_MESSAGE);
            return MenuOutcome::Disabled;
        }

        let step = flow.first_step();
        let view = flow.view(step, &config);
        let token = self.arm_timer(player, config.menu_timeout());
        self.sessions.insert(
            player,
            MenuSession {
                kind,
                step,
                timer: token,
            },
        );
        self.presenter.show_menu(player, &view);
        tracing::debug!("Player {} opened {} menu", player, kind);
        MenuOutcome::Opened(step)
    }

    fn handle_select(
        &mut self,
        player: PlayerId,
        step: MenuStep,
        choice: MenuChoice,
    ) -> Result<MenuOutcome> {
        let Some(session) = self.sessions.get(&player).copied() else {
            return Ok(MenuOutcome::Ignored);
        };
        if session.step != step {
            return Ok(MenuOutcome::Ignored);
        }
        let Some(flow) = self.flows.get(&session.kind) else {
            return Ok(MenuOutcome::Ignored);
        };

        let config = self.config.snapshot();
        if !flow.view(step, &config).offers(choice) {
            return Ok(MenuOutcome::Ignored);
        }

        if choice == MenuChoice::Exit {
            self.close(player);
            self.notify(player, EXIT_MESSAGE);
            tracing::debug!("Player {} exited {} menu", player, session.kind);
            return Ok(MenuOutcome::Cancelled);
        }

        let ctx = FlowContext {
            config: &config,
            store: self.store.as_ref(),
            player,
        };
        let Some(outcome) = flow.select(&ctx, step, choice)? else {
            return Ok(MenuOutcome::Ignored);
        };
        let next_view = match outcome.transition {
            FlowTransition::Next(next) => Some(flow.view(next, &config)),
            FlowTransition::Complete => None,
        };

        for message in &outcome.messages {
            self.notify(player, message);
        }

        match (outcome.transition, next_view) {
            (FlowTransition::Next(next), Some(view)) => {
                self.scheduler.disarm(player, session.timer);
                let token = self.arm_timer(player, config.menu_timeout());
                self.sessions.insert(
                    player,
                    MenuSession {
                        kind: session.kind,
                        step: next,
                        timer: token,
                    },
                );
                self.presenter.show_menu(player, &view);
                Ok(MenuOutcome::Advanced(next))
            }
            _ => {
                self.close(player);
                tracing::debug!("Player {} completed {} menu", player, session.kind);
                Ok(MenuOutcome::Completed)
            }
        }
    }

    fn handle_timeout(&mut self, player: PlayerId, token: TimerToken) -> MenuOutcome {
        let live = self
            .sessions
            .get(&player)
            .map_or(false, |session| session.timer == token);
        if !live {
            return MenuOutcome::Ignored;
        }

        self.close(player);
        let seconds = self.config.snapshot().menu_timeout_secs;
        self.notify(
            player,
            &format!("You did not interact with the menu in {} seconds!", seconds),
        );
        tracing::debug!("Menu for player {} timed out", player);
        MenuOutcome::TimedOut
    }

    fn handle_disconnect(&mut self, player: PlayerId) -> MenuOutcome {
        if self.close(player) {
            MenuOutcome::Disconnected
        } else {
            MenuOutcome::Ignored
        }
    }

    fn arm_timer(&mut self, player: PlayerId, after: std::time::Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.scheduler.arm(player, token, after);
        token
    }

    /// Drop the session and its timer, `false` if there was none
    fn close(&mut self, player: PlayerId) -> bool {
        match self.sessions.remove(&player) {
            Some(session) => {
                self.scheduler.disarm(player, session.timer);
                true
            }
            None => false,
        }
    }

    fn notify(&mut self, player: PlayerId, message: &str) {
        self.presenter
            .notify(player, &format!("{}{}", MESSAGE_PREFIX, message));
    }
}
