//! Random-choice capability used for canned message selection.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource: Send {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// Pick one entry of a fixed, non-empty message table.
pub fn choose<'a>(random: &mut dyn RandomSource, items: &[&'a str]) -> &'a str {
    if items.is_empty() {
        return "";
    }
    let index = random.pick(items.len()).min(items.len() - 1);
    items[index]
}

#[derive(Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays queued answers; falls back to index 0 and `false` once drained.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    picks: VecDeque<usize>,
    chances: VecDeque<bool>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_picks(mut self, picks: impl IntoIterator<Item = usize>) -> Self {
        self.picks.extend(picks);
        self
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        let next = self.picks.pop_front().unwrap_or(0);
        if len == 0 {
            0
        } else {
            next % len
        }
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_picks_stay_in_range() {
        let mut random = StdRandom::seeded(7);
        for _ in 0..200 {
            assert!(random.pick(4) < 4);
        }
        assert!(!random.chance(0.0));
        assert!(random.chance(1.0));
    }

    #[test]
    fn scripted_replays_then_defaults() {
        let mut random = ScriptedRandom::new()
            .with_picks([2, 5])
            .with_chances([true]);
        assert_eq!(choose(&mut random, &["a", "b", "c"]), "c");
        assert_eq!(choose(&mut random, &["a", "b", "c"]), "c");
        assert_eq!(choose(&mut random, &["a", "b", "c"]), "a");
        assert!(random.chance(0.3));
        assert!(!random.chance(0.3));
    }
}
