//! Domain-constant mutators: snap numeric leaves onto canonical audio/physics
//! ratios, powers of two, and common exponents.

use crate::formula::Formula;
use crate::mutation::Mutator;

/// Canonical ratios and reference values from audio/physics relationships.
const AUDIO_CONSTANTS: [f64; 16] = [
    1.0, 2.0, 0.5, // basic ratios
    0.707, // -3dB point (sqrt(2)/2)
    3.14159, 6.28318, // π, 2π frequency relationships
    20.0, 20000.0, // audible range bounds
    440.0, 1000.0, // reference frequencies
    0.1, 0.01, // small scaling factors
    12.0, 24.0, // octave relationships
    1.414, // sqrt(2)
    2.718, // exponential decay base
];

/// Power-of-two ladder for exponential relationships.
const POWER_OF_TWO_VALUES: [f64; 7] = [1.0, 2.0, 4.0, 8.0, 0.5, 0.25, 0.125];

/// Common sub-unit fractions.
const FRACTION_VALUES: [f64; 7] = [0.5, 0.25, 0.125, 0.333, 0.667, 0.1, 0.01];

/// Exponents common in physical power laws.
const POWER_EXPONENTS: [f64; 9] = [0.5, 1.0, 2.0, 3.0, 0.333, 0.25, 1.5, -1.0, -0.5];

impl Mutator {
    /// Pull runaway values onto canonical filter/frequency constants and snap
    /// near-misses of the common ratios.
    pub(crate) fn mutate_filter_relationships(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if current.abs() > 1e6 {
                    let index = picker.pick(0, AUDIO_CONSTANTS.len() as i32 - 1);
                    *value = AUDIO_CONSTANTS[index as usize];
                } else if current.abs() > 0.001 && current.abs() < 100.0 {
                    if (current - 2.0).abs() < 0.5 {
                        *value = 2.0;
                    } else if (current - 0.707).abs() < 0.2 {
                        *value = 0.707;
                    } else if (current - 1.414).abs() < 0.2 {
                        *value = 1.414;
                    } else if (current - 3.14159).abs() < 0.5 {
                        *value = 3.14159;
                    }
                }
            }
        });
        result
    }

    /// Snap mid-range values onto powers of two and sub-unit fractions.
    pub(crate) fn enhance_exponential_patterns(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if current.abs() > 1.0 && current.abs() < 10.0 {
                    let index = picker.pick(0, POWER_OF_TWO_VALUES.len() as i32 - 1);
                    *value = POWER_OF_TWO_VALUES[index as usize];
                } else if current.abs() < 1.0 && current.abs() > 0.01 {
                    let index = picker.pick(0, FRACTION_VALUES.len() as i32 - 1);
                    *value = FRACTION_VALUES[index as usize];
                }
            }
        });
        result
    }

    /// Snap small values onto exponents common in power-law relationships.
    pub(crate) fn promote_power_relationships(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() && value.abs() < 10.0 {
                let index = picker.pick(0, POWER_EXPONENTS.len() as i32 - 1);
                *value = POWER_EXPONENTS[index as usize];
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
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(value), BinaryOp::Mul),
            vec!["x".to_string()],
        )
    }

    #[test]
    /// Near-misses of canonical ratios snap exactly.
    fn test_filter_snapping() {
        let snapped = deterministic_mutator()
            .apply(ChangerKind::FilterRelationshipMutator, &constant_formula(2.3))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![2.0]);

        let snapped = deterministic_mutator()
            .apply(ChangerKind::FilterRelationshipMutator, &constant_formula(3.0))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![3.14159]);
    }

    #[test]
    /// Mid-range values land on the power-of-two ladder.
    fn test_exponential_snapping() {
        let snapped = deterministic_mutator()
            .apply(ChangerKind::ExponentialPatternEnhancer, &constant_formula(5.0))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![8.0]);

        let snapped = deterministic_mutator()
            .apply(ChangerKind::ExponentialPatternEnhancer, &constant_formula(0.4))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![0.333]);
    }

    #[test]
    /// Small values become common power-law exponents.
    fn test_power_promotion() {
        let snapped = deterministic_mutator()
            .apply(ChangerKind::PowerRelationshipPromoter, &constant_formula(7.0))
            .unwrap();
        assert_eq!(snapped.numbers(), vec![0.333]);
    }
}
