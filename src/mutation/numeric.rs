//! Changers nudging the non-constant numeric leaves of a formula.
//!
//! Each leaf is mutated independently with probability ½ (one coin toss per
//! leaf). The fragment changers step by a single representable unit.

use crate::formula::Formula;
use crate::mutation::Mutator;

impl Mutator {
    pub(crate) fn increment_by_one(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value += 1.0;
            }
        });
        result
    }

    pub(crate) fn reduce_by_one(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value -= 1.0;
            }
        });
        result
    }

    pub(crate) fn increment_by_doubling(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value *= 2.0;
            }
        });
        result
    }

    pub(crate) fn reduce_by_halving(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value /= 2.0;
            }
        });
        result
    }

    pub(crate) fn increment_by_fragment(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value = if *value == 0.0 {
                    f64::MIN_POSITIVE
                } else {
                    value.next_up()
                };
            }
        });
        result
    }

    pub(crate) fn reduce_by_fragment(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                *value = if *value == 0.0 {
                    f64::MIN_POSITIVE
                } else {
                    value.next_down()
                };
            }
        });
        result
    }
}
