//! AWP turn tracking
//!
//! Players who opted into "AWP on my turn" take turns, one per team per
//! round, in player id order.

use ahash::{AHashMap, AHashSet};

use crate::core::types::{PlayerId, Team};
use crate::preferences::PlayerPreferences;

/// Whose turn it is to get the AWP this round
pub trait AwpTurn {
    fn is_turn(&self, player: PlayerId, team: Team) -> bool;
}

/// Nobody gets the AWP
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAwpTurns;

impl AwpTurn for NoAwpTurns {
    fn is_turn(&self, _player: PlayerId, _team: Team) -> bool {
        false
    }
}

/// Explicit set of players whose turn it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwpTurnSet {
    players: AHashSet<(PlayerId, Team)>,
}

impl AwpTurnSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: PlayerId, team: Team) {
        self.players.insert((player, team));
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl AwpTurn for AwpTurnSet {
    fn is_turn(&self, player: PlayerId, team: Team) -> bool {
        self.players.contains(&(player, team))
    }
}

/// Round-robin AWP rotation
///
/// Remembers the last player served per team and hands the next turn to the
/// next opted-in player by id, wrapping around. Joins and leaves between
/// rounds do not reset the rotation.
#[derive(Debug, Clone, Default)]
pub struct AwpRotation {
    last_served: AHashMap<Team, PlayerId>,
}

impl AwpRotation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the rotation for both teams and return this round's turns
    pub fn next_turns(
        &mut self,
        t_roster: &[PlayerId],
        ct_roster: &[PlayerId],
        preferences: &AHashMap<PlayerId, PlayerPreferences>,
    ) -> AwpTurnSet {
        let mut turns = AwpTurnSet::new();
        for (team, roster) in [
            (Team::Terrorist, t_roster),
            (Team::CounterTerrorist, ct_roster),
        ] {
            if let Some(player) = self.next_for_team(team, roster, preferences) {
                turns.insert(player, team);
            }
        }
        turns
    }

    fn next_for_team(
        &mut self,
        team: Team,
        roster: &[PlayerId],
        preferences: &AHashMap<PlayerId, PlayerPreferences>,
    ) -> Option<PlayerId> {
        let mut candidates: Vec<PlayerId> = roster
            .iter()
            .copied()
            .filter(|p| preferences.get(p).map_or(false, |prefs| prefs.awp_on_turn))
            .collect();
        candidates.sort();
        candidates.dedup();

        let next = match self.last_served.get(&team) {
            Some(last) => candidates
                .iter()
                .copied()
                .find(|p| p > last)
                .or_else(|| candidates.first().copied()),
            None => candidates.first().copied(),
        }?;

        self.last_served.insert(team, next);
        Some(next)
    }
}
