//! Per-round item allocation
//!
//! Turns a round type, the two rosters and stored preferences into the item
//! set each player receives. Pure apart from the injected RNG: the same
//! inputs and seed always give the same allocation.

use ahash::AHashMap;
use rand::Rng;
use std::collections::BTreeMap;

use crate::allocation::awp::AwpTurn;
use crate::allocation::choice::choice;
use crate::allocation::utility::utility_for_round;
use crate::core::config::Config;
use crate::core::types::{PlayerId, RoundType, Team};
use crate::items::{knife_for_team, Item, ItemSet, WeaponSlot};
use crate::preferences::PlayerPreferences;

/// Armor for a round type
pub fn armor_for_round(round_type: RoundType) -> Item {
    match round_type {
        RoundType::Pistol => Item::Kevlar,
        RoundType::HalfBuy | RoundType::FullBuy => Item::KevlarHelmet,
    }
}

/// Per-player inputs that are decided once per round
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerRoundContext<'p> {
    pub preferences: Option<&'p PlayerPreferences>,
    pub awp_turn: bool,
    /// Designated defuser on a pistol round
    pub defuser: bool,
}

/// Computes item sets from the current config
pub struct AllocationEngine<'a> {
    config: &'a Config,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Allocate items for both rosters
    ///
    /// Counter-terrorists are processed first, then terrorists. On pistol
    /// rounds one counter-terrorist is drawn as the defuser before anyone
    /// else is allocated. Empty rosters produce no entries.
    pub fn allocate<R: Rng>(
        &self,
        round_type: RoundType,
        t_roster: &[PlayerId],
        ct_roster: &[PlayerId],
        preferences: &AHashMap<PlayerId, PlayerPreferences>,
        awp: &dyn AwpTurn,
        rng: &mut R,
    ) -> BTreeMap<PlayerId, ItemSet> {
        let defuser = if round_type == RoundType::Pistol {
            choice(ct_roster, rng)
        } else {
            None
        };

        let mut allocations = BTreeMap::new();
        for (team, roster) in [
            (Team::CounterTerrorist, ct_roster),
            (Team::Terrorist, t_roster),
        ] {
            for &player in roster {
                let context = PlayerRoundContext {
                    preferences: preferences.get(&player),
                    awp_turn: awp.is_turn(player, team),
                    defuser: team == Team::CounterTerrorist && defuser == Some(player),
                };
                let items = self.allocate_player(round_type, team, context, rng);
                tracing::debug!("Player {} ({}) gets {:?}", player, team.short_name(), items.items());
                allocations.insert(player, items);
            }
        }

        allocations
    }

    /// Item set for one player
    ///
    /// Order: armor, knife, primary, secondary, utility, AWP, defuse kit.
    pub fn allocate_player<R: Rng>(
        &self,
        round_type: RoundType,
        team: Team,
        context: PlayerRoundContext<'_>,
        rng: &mut R,
    ) -> ItemSet {
        let mut items = ItemSet::new();
        items.push(armor_for_round(round_type));
        items.push(knife_for_team(team));

        let awp = context.awp_turn && self.awp_allowed(round_type, team);

        if let Some(slot) = WeaponSlot::primary_for(round_type) {
            // The AWP takes the primary slot on the player's turn
            if !awp {
                items.extend(self.resolve_weapon(team, slot, context.preferences, rng));
            }
        }
        items.extend(self.resolve_weapon(
            team,
            WeaponSlot::secondary_for(round_type),
            context.preferences,
            rng,
        ));

        let kit_instead_of_utility = round_type == RoundType::Pistol && context.defuser;
        if !kit_instead_of_utility {
            items.extend(utility_for_round(round_type, team, rng));
        }

        if awp {
            items.push(Item::Awp);
        }

        let gets_kit = team == Team::CounterTerrorist
            && (round_type != RoundType::Pistol || context.defuser);
        if gets_kit {
            items.push(Item::DefuseKit);
        }

        items
    }

    /// Weapon for one slot: preference, then random, then default
    ///
    /// Each fallback only applies when its selection type is allowed. A
    /// stored preference that is no longer usable for the slot and team is
    /// ignored.
    pub fn resolve_weapon<R: Rng>(
        &self,
        team: Team,
        slot: WeaponSlot,
        preferences: Option<&PlayerPreferences>,
        rng: &mut R,
    ) -> Option<Item> {
        if self.config.can_players_select_weapons() {
            let preferred = preferences
                .and_then(|prefs| prefs.weapon(team, slot))
                .filter(|weapon| slot.accepts(*weapon, team) && self.config.is_usable(*weapon));
            if let Some(weapon) = preferred {
                return Some(weapon);
            }
        }

        if self.config.can_assign_random_weapons() {
            let candidates = self.config.usable_weapons_for(slot, team);
            if let Some(weapon) = choice(&candidates, rng) {
                return Some(weapon);
            }
        }

        if self.config.can_assign_default_weapons() {
            return self.config.default_weapon(team, slot);
        }

        None
    }

    /// Whether anyone on `team` can get the AWP this round
    pub fn awp_allowed(&self, round_type: RoundType, team: Team) -> bool {
        WeaponSlot::primary_for(round_type).is_some()
            && self.config.can_players_select_weapons()
            && self.config.is_usable(Item::Awp)
            && WeaponSlot::Preferred.accepts(Item::Awp, team)
    }
}
