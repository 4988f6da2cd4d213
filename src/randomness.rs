//! Randomness sources used throughout the evolutionary search.
//!
//! Every component owns its sources (there is no process-wide generator), and
//! both are trait-abstracted so tests can supply deterministic variants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A boolean coin, tossed once per candidate leaf or operator by the changers.
pub trait Coin {
    fn toss(&mut self) -> bool;
}

/// A bounded integer generator; both bounds are inclusive.
pub trait NumberPicker {
    fn pick(&mut self, from: i32, to: i32) -> i32;
}

/// A fair coin backed by an entropy-seeded generator.
pub struct RandomCoin {
    rng: StdRng,
}

impl RandomCoin {
    pub fn new() -> RandomCoin {
        RandomCoin {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomCoin {
    fn default() -> Self {
        Self::new()
    }
}

impl Coin for RandomCoin {
    fn toss(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// A uniform integer generator backed by an entropy-seeded generator.
pub struct UniformPicker {
    rng: StdRng,
}

impl UniformPicker {
    pub fn new() -> UniformPicker {
        UniformPicker {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for UniformPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberPicker for UniformPicker {
    fn pick(&mut self, from: i32, to: i32) -> i32 {
        self.rng.gen_range(from..=to)
    }
}

/// Deterministic coin yielding `true, false, true, …`, for reproducible tests.
#[derive(Default)]
pub struct AlternatingCoin {
    previous: bool,
}

impl AlternatingCoin {
    pub fn new() -> AlternatingCoin {
        AlternatingCoin::default()
    }
}

impl Coin for AlternatingCoin {
    fn toss(&mut self) -> bool {
        self.previous = !self.previous;
        self.previous
    }
}

/// Deterministic generator returning the midpoint of the range, for reproducible tests.
#[derive(Default)]
pub struct MidpointPicker;

impl NumberPicker for MidpointPicker {
    fn pick(&mut self, from: i32, to: i32) -> i32 {
        (from + to) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_sources() {
        let mut coin = AlternatingCoin::new();
        assert!(coin.toss());
        assert!(!coin.toss());
        assert!(coin.toss());

        let mut picker = MidpointPicker;
        assert_eq!(picker.pick(0, 4), 2);
        assert_eq!(picker.pick(-10, 10), 0);
    }

    #[test]
    fn test_uniform_picker_bounds() {
        let mut picker = UniformPicker::new();
        for _ in 0..100 {
            let value = picker.pick(-3, 7);
            assert!((-3..=7).contains(&value));
        }
    }
}
