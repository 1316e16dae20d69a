//! Next-round-type votes

use ahash::AHashMap;

use crate::core::types::{PlayerId, RoundType};

/// Votes for the type of the next round, one per player
#[derive(Debug, Clone, Default)]
pub struct RoundVotes {
    votes: AHashMap<PlayerId, RoundType>,
}

impl RoundVotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vote; a later vote from the same player replaces the earlier one
    pub fn cast(&mut self, player: PlayerId, round_type: RoundType) {
        self.votes.insert(player, round_type);
    }

    pub fn withdraw(&mut self, player: PlayerId) {
        self.votes.remove(&player);
    }

    pub fn count(&self, round_type: RoundType) -> usize {
        self.votes.values().filter(|rt| **rt == round_type).count()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Round type with a strict plurality, `None` on a tie or without votes
    pub fn winner(&self) -> Option<RoundType> {
        let mut best: Option<(RoundType, usize)> = None;
        let mut tied = false;
        for round_type in RoundType::ALL {
            let count = self.count(round_type);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if count == best_count => tied = true,
                Some((_, best_count)) if count < best_count => {}
                _ => {
                    best = Some((round_type, count));
                    tied = false;
                }
            }
        }
        if tied {
            None
        } else {
            best.map(|(round_type, _)| round_type)
        }
    }

    /// Resolve the vote and clear it for the next round
    pub fn take_winner(&mut self) -> Option<RoundType> {
        let winner = self.winner();
        self.votes.clear();
        winner
    }
}
