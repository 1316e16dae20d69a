//! Grenade allocation rules

use rand::Rng;

use crate::allocation::choice::choice;
use crate::core::types::{RoundType, Team};
use crate::items::{fire_grenade_for_team, Item};

/// Probability of a second grenade on buy rounds
pub const EXTRA_UTILITY_CHANCE: f64 = 0.5;

/// Random grenades for one player
///
/// Pistol rounds give one flash or smoke. Buy rounds give one of the four
/// grenades, plus a second one half of the time; only flashbangs may be
/// doubled up.
pub fn utility_for_round<R: Rng>(round_type: RoundType, team: Team, rng: &mut R) -> Vec<Item> {
    if round_type == RoundType::Pistol {
        return choice(&[Item::Flashbang, Item::Smoke], rng)
            .into_iter()
            .collect();
    }

    let mut pool = vec![
        Item::Flashbang,
        Item::Smoke,
        Item::HeGrenade,
        fire_grenade_for_team(team),
    ];

    let Some(first) = choice(&pool, rng) else {
        return Vec::new();
    };
    let mut utility = vec![first];

    if rng.gen::<f64>() < EXTRA_UTILITY_CHANCE {
        if first != Item::Flashbang {
            pool.retain(|item| *item != first);
        }
        utility.extend(choice(&pool, rng));
    }

    utility
}
