//! Host seams for menus: presentation and one-shot timers
//!
//! The recording and manual implementations drive tests and the round
//! simulator; `TokioScheduler` backs the console host.

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::core::types::PlayerId;
use crate::menu::coordinator::MenuEvent;
use crate::menu::session::{MenuView, TimerToken};

/// Shows menus and chat lines to players
pub trait MenuPresenter {
    fn show_menu(&mut self, player: PlayerId, view: &MenuView);
    fn notify(&mut self, player: PlayerId, message: &str);
}

/// One-shot timers that report back as `MenuEvent::Timeout`
///
/// Arming for a player replaces any timer already armed for them.
/// Disarming with a token that is no longer armed does nothing.
pub trait TimerScheduler {
    fn arm(&mut self, player: PlayerId, token: TimerToken, after: Duration);
    fn disarm(&mut self, player: PlayerId, token: TimerToken);
}

/// Presenter that keeps everything it was asked to show
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub menus: Vec<(PlayerId, MenuView)>,
    pub messages: Vec<(PlayerId, String)>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_menu(&self, player: PlayerId) -> Option<&MenuView> {
        self.menus
            .iter()
            .rev()
            .find(|(p, _)| *p == player)
            .map(|(_, view)| view)
    }

    pub fn messages_for(&self, player: PlayerId) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(p, _)| *p == player)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl MenuPresenter for RecordingPresenter {
    fn show_menu(&mut self, player: PlayerId, view: &MenuView) {
        self.menus.push((player, view.clone()));
    }

    fn notify(&mut self, player: PlayerId, message: &str) {
        self.messages.push((player, message.to_string()));
    }
}

/// Deterministic scheduler driven by an explicit clock
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    armed: BTreeMap<PlayerId, (TimerToken, Duration)>,
    pub arms: usize,
    pub disarms: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the live timer for a player
    pub fn armed(&self, player: PlayerId) -> Option<TimerToken> {
        self.armed.get(&player).map(|(token, _)| *token)
    }

    pub fn live_timers(&self) -> usize {
        self.armed.len()
    }

    /// Advance the clock and collect the timers that expired
    pub fn advance(&mut self, by: Duration) -> Vec<MenuEvent> {
        self.now += by;
        let now = self.now;
        let expired: Vec<(PlayerId, TimerToken)> = self
            .armed
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .map(|(player, (token, _))| (*player, *token))
            .collect();

        expired
            .into_iter()
            .map(|(player, token)| {
                self.armed.remove(&player);
                MenuEvent::Timeout { player, token }
            })
            .collect()
    }
}

impl TimerScheduler for ManualScheduler {
    fn arm(&mut self, player: PlayerId, token: TimerToken, after: Duration) {
        self.arms += 1;
        self.armed.insert(player, (token, self.now + after));
    }

    fn disarm(&mut self, player: PlayerId, token: TimerToken) {
        if self.armed(player) == Some(token) {
            self.armed.remove(&player);
            self.disarms += 1;
        }
    }
}

/// Timers as tokio tasks feeding an event channel
pub struct TokioScheduler {
    runtime: Handle,
    events: UnboundedSender<MenuEvent>,
    timers: AHashMap<PlayerId, (TimerToken, JoinHandle<()>)>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle, events: UnboundedSender<MenuEvent>) -> Self {
        Self {
            runtime,
            events,
            timers: AHashMap::new(),
        }
    }
}

impl TimerScheduler for TokioScheduler {
    fn arm(&mut self, player: PlayerId, token: TimerToken, after: Duration) {
        if let Some((_, previous)) = self.timers.remove(&player) {
            previous.abort();
        }

        let events = self.events.clone();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if events.send(MenuEvent::Timeout { player, token }).is_err() {
                tracing::debug!("Menu event channel closed, dropping timeout for {}", player);
            }
        });
        self.timers.insert(player, (token, task));
    }

    fn disarm(&mut self, player: PlayerId, token: TimerToken) {
        let armed = self.timers.get(&player).map(|(armed, _)| *armed);
        if armed == Some(token) {
            if let Some((_, task)) = self.timers.remove(&player) {
                task.abort();
            }
        }
    }
}
