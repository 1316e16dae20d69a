//! Uniform random choice

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one element uniformly, `None` when there is nothing to pick from
pub fn choice<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    items.choose(rng).cloned()
}
