//! Random draws shared by both controllers
//!
//! Each controller owns an optional seeded RNG. Without a seed the draws come
//! from the thread-local generator, so sessions differ from run to run.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Draw uniformly from `range`, using the seeded RNG if one is present
pub(crate) fn draw(rng: &mut Option<StdRng>, range: RangeInclusive<u32>) -> u32 {
    match rng {
        Some(rng) => rng.random_range(range),
        None => rand::rng().random_range(range),
    }
}

/// Choose a random element from a slice, using the seeded RNG if one is present
pub(crate) fn choose<'a, T>(rng: &mut Option<StdRng>, slice: &'a [T]) -> Option<&'a T> {
    if slice.is_empty() {
        return None;
    }
    match rng {
        Some(rng) => slice.choose(rng),
        None => slice.choose(&mut rand::rng()),
    }
}
