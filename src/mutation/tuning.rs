//! Fine-grained numeric tuners: percentage tweaks, range rescaling, bounded
//! nonlinearities, and snapping onto historically successful constants.

use crate::formula::Formula;
use crate::mutation::Mutator;

/// Upscaling factors for values stuck near zero.
const RANGE_SCALES: [f64; 5] = [10.0, 50.0, 100.0, 20.0, 30.0];

/// Downscaling factors for runaway values.
const RANGE_REDUCTIONS: [f64; 5] = [0.1, 0.5, 0.2, 0.3, 0.01];

/// Successful bases observed around 1.
const SUCCESSFUL_BASES: [f64; 7] = [1.0, 0.932, 1.091, 1.095, 1.046, 0.5, 1.5];

/// Successful scales observed around 10.
const SUCCESSFUL_SCALES: [f64; 5] = [10.0, 11.0, 9.955, 10.085, 9.921];

impl Mutator {
    /// Sub-percent multiplicative tweaks (additive near zero).
    pub(crate) fn tune_precision(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                if value.abs() > 0.001 {
                    let adjustment = f64::from(picker.pick(-10, 10)) * 0.001;
                    *value *= 1.0 + adjustment;
                } else {
                    *value += f64::from(picker.pick(-100, 100)) * 0.00001;
                }
            }
        });
        result
    }

    /// Rescale values toward the workable [0.1, 100] band.
    pub(crate) fn optimize_range(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if current.abs() < 0.1 {
                    let index = picker.pick(0, RANGE_SCALES.len() as i32 - 1);
                    *value = current * RANGE_SCALES[index as usize];
                } else if current.abs() > 100.0 {
                    let index = picker.pick(0, RANGE_REDUCTIONS.len() as i32 - 1);
                    *value = current * RANGE_REDUCTIONS[index as usize];
                } else {
                    let adjustment = f64::from(picker.pick(-50, 50)) * 0.01;
                    *value = current * (1.0 + adjustment);
                }
            }
        });
        result
    }

    /// Apply one bounded nonlinearity to the first accepted numeric leaf.
    pub(crate) fn inject_nonlinearity(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let mut done = false;
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if done || !coin.toss() {
                return;
            }
            let current = *value;
            *value = match picker.pick(0, 6) {
                0 => current.tanh(),
                1 => 1.0 / (1.0 + (-current).exp()),
                2 => current.abs(),
                3 => current * current,
                4 => current.min(10.0).exp(),
                5 => {
                    if current > 0.0 {
                        (current + 1.0).ln()
                    } else {
                        -(-current + 1.0).ln()
                    }
                }
                _ => current / (1.0 + current.abs()),
            };
            done = true;
        });
        result
    }

    /// Small additive deltas around the attractors 1 and 10; gentle shrinking
    /// of large values.
    pub(crate) fn tune_targeted(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if (current - 1.0).abs() < 0.2 {
                    *value = current + f64::from(picker.pick(-20, 20)) * 0.001;
                } else if (current - 10.0).abs() < 2.0 {
                    *value = current + f64::from(picker.pick(-50, 50)) * 0.001;
                } else if current.abs() < 0.1 {
                    *value = current + f64::from(picker.pick(-10, 10)) * 0.0001;
                } else if current > 50.0 {
                    let reduction = f64::from(picker.pick(1, 10)) * 0.001;
                    *value = current * (1.0 - reduction);
                }
            }
        });
        result
    }

    /// Snap values near 1 and 10 onto historically successful constants.
    pub(crate) fn optimize_patterns(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if (current - 1.0).abs() < 0.5 {
                    let index = picker.pick(0, SUCCESSFUL_BASES.len() as i32 - 1);
                    *value = SUCCESSFUL_BASES[index as usize];
                } else if (current - 10.0).abs() < 3.0 {
                    let index = picker.pick(0, SUCCESSFUL_SCALES.len() as i32 - 1);
                    *value = SUCCESSFUL_SCALES[index as usize];
                }
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::producer::OperationProducer;
    use crate::expression::node::Node;
    use crate::expression::operator_enums::BinaryOp;
    use crate::mutation::ChangerKind;
    use crate::randomness::{AlternatingCoin, MidpointPicker};

    fn deterministic_mutator() -> Mutator {
        Mutator::with_parts(
            Box::new(AlternatingCoin::new()),
            Box::new(MidpointPicker),
            OperationProducer::with_picker(Box::new(MidpointPicker)),
        )
    }

    fn constant_formula(value: f64) -> Formula {
        Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(value), BinaryOp::Add),
            vec!["x".to_string()],
        )
    }

    #[test]
    /// The nonlinearity injector touches exactly one leaf per application.
    fn test_nonlinearity_single_leaf() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_number(4.0), Node::mk_number(9.0), BinaryOp::Add),
            vec![],
        );
        let mut mutator = deterministic_mutator();
        let injected = mutator.apply(ChangerKind::NonlinearityInjector, &formula).unwrap();
        // midpoint transformation index 3 squares the first accepted leaf
        assert_eq!(injected.numbers(), vec![16.0, 9.0]);
    }

    #[test]
    /// The range optimizer pulls outliers toward [0.1, 100].
    fn test_range_optimizer() {
        let tiny = deterministic_mutator()
            .apply(ChangerKind::RangeOptimizer, &constant_formula(0.0625))
            .unwrap();
        assert_eq!(tiny.numbers(), vec![6.25]); // × 100 (midpoint scale)

        let huge = deterministic_mutator()
            .apply(ChangerKind::RangeOptimizer, &constant_formula(1000.0))
            .unwrap();
        assert!((huge.numbers()[0] - 200.0).abs() < 1e-9); // × 0.2 (midpoint reduction)
    }

    #[test]
    /// The pattern optimizer snaps near-1 values onto a successful base.
    fn test_pattern_optimizer() {
        let mut mutator = deterministic_mutator();
        let snapped = mutator
            .apply(ChangerKind::PatternOptimizer, &constant_formula(1.2))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![1.095]);
    }
}
