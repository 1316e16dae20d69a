//! Round start orchestration
//!
//! Ties the selector, the preference store, AWP turns and the engine
//! together and hands the results to the host through [`ItemDelivery`].

use rand::Rng;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::allocation::awp::AwpRotation;
use crate::allocation::engine::{AllocationEngine, PlayerRoundContext};
use crate::core::config::ConfigHandle;
use crate::core::error::Result;
use crate::core::types::{PlayerId, RoundType, Team};
use crate::items::{Item, ItemSet};
use crate::preferences::PreferenceStore;
use crate::rounds::{RoundTypeSelector, RoundVotes};

/// Grants items to players in the host
pub trait ItemDelivery {
    fn give_items(&mut self, player: PlayerId, items: &[Item]);
    fn give_defuse_kit(&mut self, player: PlayerId);
}

/// Deliver one item set: regular items first, then the kit if present
pub fn deliver(delivery: &mut dyn ItemDelivery, player: PlayerId, items: &ItemSet) {
    delivery.give_items(player, &items.grantable());
    if items.has_defuse_kit() {
        delivery.give_defuse_kit(player);
    }
}

/// Delivery that only remembers what it was asked to grant
#[derive(Debug, Clone, Default)]
pub struct RecordingDelivery {
    pub items: BTreeMap<PlayerId, Vec<Item>>,
    pub defuse_kits: Vec<PlayerId>,
}

impl ItemDelivery for RecordingDelivery {
    fn give_items(&mut self, player: PlayerId, items: &[Item]) {
        self.items.entry(player).or_default().extend_from_slice(items);
    }

    fn give_defuse_kit(&mut self, player: PlayerId) {
        self.defuse_kits.push(player);
    }
}

/// Outcome of one round start
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub round_type: RoundType,
    pub allocations: BTreeMap<PlayerId, ItemSet>,
    /// Chat line announcing the round type, when announcements are enabled
    pub announcement: Option<String>,
}

/// Round-start service owned by the host
pub struct RoundAllocator {
    config: ConfigHandle,
    store: Arc<dyn PreferenceStore>,
    selector: RoundTypeSelector,
    awp_rotation: AwpRotation,
    votes: Arc<Mutex<RoundVotes>>,
    next_round_type: Option<RoundType>,
    current_round_type: Option<RoundType>,
}

impl RoundAllocator {
    pub fn new(config: ConfigHandle, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            config,
            store,
            selector: RoundTypeSelector::new(),
            awp_rotation: AwpRotation::new(),
            votes: Arc::new(Mutex::new(RoundVotes::new())),
            next_round_type: None,
            current_round_type: None,
        }
    }

    /// Shared vote box, handed to the next-round vote menu
    pub fn votes(&self) -> Arc<Mutex<RoundVotes>> {
        Arc::clone(&self.votes)
    }

    /// Force the type of the next round (`None` clears a queued override)
    pub fn set_next_round_type(&mut self, round_type: Option<RoundType>) {
        self.next_round_type = round_type;
    }

    pub fn next_round_type(&self) -> Option<RoundType> {
        self.next_round_type
    }

    /// Type of the round in progress, `None` before the first round
    pub fn current_round_type(&self) -> Option<RoundType> {
        self.current_round_type
    }

    /// Select the round type, allocate both rosters and deliver the items
    ///
    /// Preferences are read before any state changes, so a store failure
    /// leaves queued overrides, votes and the rotation untouched.
    pub fn start_round<R: Rng>(
        &mut self,
        t_roster: &[PlayerId],
        ct_roster: &[PlayerId],
        delivery: &mut dyn ItemDelivery,
        rng: &mut R,
    ) -> Result<RoundSummary> {
        let config = self.config.snapshot();

        let ids: Vec<PlayerId> = ct_roster
            .iter()
            .chain(t_roster)
            .copied()
            .filter(PlayerId::is_authenticated)
            .collect();
        let preferences = self.store.get_many(&ids)?;

        let vote_winner = self.lock_votes().take_winner();
        let override_type = self.next_round_type.take().or(if config.enable_next_round_type_voting {
            vote_winner
        } else {
            None
        });

        let round_type = self.selector.select(override_type, &config, rng);
        self.current_round_type = Some(round_type);

        tracing::info!("Round type: {}", round_type);
        tracing::info!("#T players: {}", t_roster.len());
        tracing::info!("#CT players: {}", ct_roster.len());

        // The rotation only moves on rounds that can hand the AWP out
        let engine = AllocationEngine::new(&config);
        let t_awp: &[PlayerId] = if engine.awp_allowed(round_type, Team::Terrorist) {
            t_roster
        } else {
            &[]
        };
        let ct_awp: &[PlayerId] = if engine.awp_allowed(round_type, Team::CounterTerrorist) {
            ct_roster
        } else {
            &[]
        };
        let turns = self.awp_rotation.next_turns(t_awp, ct_awp, &preferences);
        let allocations = engine.allocate(round_type, t_roster, ct_roster, &preferences, &turns, rng);

        for (player, items) in &allocations {
            deliver(delivery, *player, items);
        }

        let announcement = config
            .enable_round_type_announcement
            .then(|| format!("Round type: {}", round_type.display_name()));

        Ok(RoundSummary {
            round_type,
            allocations,
            announcement,
        })
    }

    /// Allocate for a player who spawned after the round started
    ///
    /// Returns `Ok(None)` before the first round and after freeze time
    /// unless late allocation is allowed. Late counter-terrorists on a
    /// pistol round get utility; the defuser was already picked.
    pub fn allocate_late_joiner<R: Rng>(
        &mut self,
        player: PlayerId,
        team: Team,
        freeze_time_over: bool,
        delivery: &mut dyn ItemDelivery,
        rng: &mut R,
    ) -> Result<Option<ItemSet>> {
        let config = self.config.snapshot();
        let Some(round_type) = self.current_round_type else {
            return Ok(None);
        };
        if freeze_time_over && !config.allow_allocation_after_freeze_time {
            tracing::debug!("Player {} joined after freeze time, not allocating", player);
            return Ok(None);
        }
        if team == Team::None {
            return Ok(None);
        }

        let preferences = if player.is_authenticated() {
            Some(self.store.get(player)?)
        } else {
            None
        };

        let engine = AllocationEngine::new(&config);
        let context = PlayerRoundContext {
            preferences: preferences.as_ref(),
            ..PlayerRoundContext::default()
        };
        let items = engine.allocate_player(round_type, team, context, rng);
        deliver(delivery, player, &items);
        Ok(Some(items))
    }

    fn lock_votes(&self) -> MutexGuard<'_, RoundVotes> {
        self.votes.lock().unwrap_or_else(|e| e.into_inner())
    }
}
