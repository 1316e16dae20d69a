//! Round type selection
//!
//! Weighted random draws or a repeating rotation, depending on config.
//! All randomness comes from the caller's RNG so runs are reproducible.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::{Config, ManualOrderingItem, RoundTypeSelection, RoundTypeTable};
use crate::core::types::RoundType;

/// Map a uniform draw in [0, 1) onto the configured percentages
///
/// Compared cumulatively: pistol, then pistol + half buy, else full buy.
pub fn round_type_for_draw(draw: f64, config: &Config) -> RoundType {
    let pistol = config.round_type_percentage(RoundType::Pistol);
    if draw < pistol {
        return RoundType::Pistol;
    }

    if draw < pistol + config.round_type_percentage(RoundType::HalfBuy) {
        return RoundType::HalfBuy;
    }

    RoundType::FullBuy
}

/// Decides the round type of each round
///
/// Holds the rotation cursor for the rotation modes; the weighted mode is
/// stateless.
#[derive(Debug, Clone, Default)]
pub struct RoundTypeSelector {
    /// Unshuffled expansion of the configured rotation, used to notice reloads
    source: Vec<RoundType>,
    sequence: Vec<RoundType>,
    cursor: usize,
}

impl RoundTypeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the round type for the upcoming round
    ///
    /// An override is returned unchanged and does not consume the rotation.
    pub fn select<R: Rng>(
        &mut self,
        override_type: Option<RoundType>,
        config: &Config,
        rng: &mut R,
    ) -> RoundType {
        if let Some(round_type) = override_type {
            return round_type;
        }

        match config.round_type_selection {
            RoundTypeSelection::Random => round_type_for_draw(rng.gen::<f64>(), config),
            RoundTypeSelection::RandomFixedCounts => {
                let source = expand_counts(&config.round_type_random_fixed_counts);
                self.next_from_rotation(source, true, rng)
            }
            RoundTypeSelection::ManualOrdering => {
                let source = expand_ordering(&config.round_type_manual_ordering);
                self.next_from_rotation(source, false, rng)
            }
        }
    }

    /// Position within the current rotation
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Forget the rotation so the next selection starts a fresh one
    pub fn reset(&mut self) {
        self.source.clear();
        self.sequence.clear();
        self.cursor = 0;
    }

    fn next_from_rotation<R: Rng>(
        &mut self,
        source: Vec<RoundType>,
        shuffle: bool,
        rng: &mut R,
    ) -> RoundType {
        if source != self.source {
            tracing::debug!("Round type rotation changed, rebuilding ({} rounds)", source.len());
            self.source = source;
            self.rebuild(shuffle, rng);
        } else if self.cursor >= self.sequence.len() {
            self.rebuild(shuffle, rng);
        }

        // Validation guarantees a non-empty rotation; fall back to full buy
        // if an unvalidated config slips through.
        let round_type = self
            .sequence
            .get(self.cursor)
            .copied()
            .unwrap_or(RoundType::FullBuy);
        self.cursor += 1;
        round_type
    }

    fn rebuild<R: Rng>(&mut self, shuffle: bool, rng: &mut R) {
        self.sequence = self.source.clone();
        if shuffle {
            self.sequence.shuffle(rng);
        }
        self.cursor = 0;
    }
}

fn expand_counts(counts: &RoundTypeTable) -> Vec<RoundType> {
    RoundType::ALL
        .iter()
        .flat_map(|rt| std::iter::repeat(*rt).take(counts.get(*rt) as usize))
        .collect()
}

fn expand_ordering(ordering: &[ManualOrderingItem]) -> Vec<RoundType> {
    ordering
        .iter()
        .flat_map(|item| std::iter::repeat(item.round_type).take(item.count as usize))
        .collect()
}
