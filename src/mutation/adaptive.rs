//! Stagnation-aware mutation whose aggressiveness follows search progress.

use crate::formula::Formula;
use crate::mutation::Mutator;

/// Replacement values tried under high mutation intensity.
const DRAMATIC_VALUES: [f64; 10] = [0.0, 1.0, 2.0, 0.5, -1.0, -2.0, 10.0, -10.0, 0.1, -0.1];

/// Multiplicative scales tried under high mutation intensity.
const DRAMATIC_SCALES: [f64; 6] = [10.0, -10.0, 0.1, -0.1, 100.0, -100.0];

/// Multiplicative scales tried under moderate mutation intensity.
const MODERATE_SCALES: [f64; 5] = [0.1, 0.5, 2.0, 5.0, 10.0];

/// Tracks how long the best rate has been flat and translates that into a
/// mutation intensity within `[0.05, 1.0]`. Intensity rises while stagnated
/// and cools multiplicatively on every use.
pub struct AdaptiveState {
    stagnation: usize,
    last_best: f64,
    intensity: f64,
}

impl Default for AdaptiveState {
    fn default() -> Self {
        AdaptiveState {
            stagnation: 0,
            last_best: 0.0,
            intensity: 0.1,
        }
    }
}

impl AdaptiveState {
    /// Record the best rate observed after an iteration.
    pub fn observe(&mut self, best_rate: f64) {
        if (best_rate - self.last_best).abs() < 1e-8 {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
            self.last_best = best_rate;
        }
    }

    /// Current intensity, updated from the stagnation counter and cooled.
    fn next_intensity(&mut self) -> f64 {
        if self.stagnation > 50 {
            self.intensity = (self.intensity + 0.1).min(1.0);
        } else if self.stagnation == 0 {
            self.intensity = (self.intensity - 0.05).max(0.05);
        }
        self.intensity = (self.intensity * 0.999).max(0.05);
        self.intensity
    }
}

impl Mutator {
    /// Mutate numeric leaves with intensity-dependent aggressiveness, then
    /// swap binary children half of the time.
    pub(crate) fn mutate_adaptively(&mut self, formula: &Formula) -> Formula {
        let intensity = self.adaptive.next_intensity();
        let mut result = formula.clone();

        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if intensity > 0.5 {
                    // dramatic: orders of magnitude, sign flips, canonical values
                    if coin.toss() && current.abs() > 0.001 {
                        let index = picker.pick(0, DRAMATIC_SCALES.len() as i32 - 1);
                        *value = current * DRAMATIC_SCALES[index as usize];
                    } else {
                        let index = picker.pick(0, DRAMATIC_VALUES.len() as i32 - 1);
                        *value = DRAMATIC_VALUES[index as usize];
                    }
                } else if intensity > 0.3 {
                    // moderate: multiplicative scale or small additive delta
                    if coin.toss() {
                        let index = picker.pick(0, MODERATE_SCALES.len() as i32 - 1);
                        *value = current * MODERATE_SCALES[index as usize];
                    } else {
                        *value = current + f64::from(picker.pick(-10, 10)) * 0.1;
                    }
                } else {
                    // fine tuning: ±10% noise at most
                    *value = current + f64::from(picker.pick(-100, 100)) * 0.001;
                }
            }
        });

        if self.coin.toss() {
            let coin = &mut self.coin;
            result.root_mut().for_each_binary_mut(&mut |_, left, right| {
                if coin.toss() {
                    std::mem::swap(left, right);
                }
            });
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Intensity rises with stagnation and relaxes once progress resumes.
    fn test_intensity_tracking() {
        let mut state = AdaptiveState::default();
        for _ in 0..60 {
            state.observe(0.5);
        }
        let mut stagnated = 0.0;
        for _ in 0..10 {
            stagnated = state.next_intensity();
        }
        assert!(stagnated > 0.5);

        state.observe(0.9); // progress resets the counter
        let relaxed = state.next_intensity();
        assert!(relaxed < stagnated);
        assert!(relaxed >= 0.05);
    }
}
