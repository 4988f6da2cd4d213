//! Changers editing the structure of a formula: child swaps, operation
//! replacement, number insertion, purging, and simplification.

use crate::expression::node::Node;
use crate::expression::operator_enums::Constant;
use crate::formula::Formula;
use crate::mutation::Mutator;

/// Canonical snap values used by the structure mutator.
const CANONICAL_VALUES: [f64; 5] = [0.0, 1.0, 2.0, 0.5, -1.0];

/// Fallback values for numeric leaves that have drifted out of range.
const SIMPLE_VALUES: [f64; 6] = [1.0, 2.0, 3.0, 0.5, 0.1, -1.0];

impl Mutator {
    /// For each binary node, independently with probability ½, swap its children.
    pub(crate) fn flip(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let coin = &mut self.coin;
        result.root_mut().for_each_binary_mut(&mut |_, left, right| {
            if coin.toss() {
                std::mem::swap(left, right);
            }
        });
        result
    }

    /// Swap variable positions in binary nodes; a no-op below two variables.
    pub(crate) fn swap_variables(&mut self, formula: &Formula) -> Formula {
        if formula.variables().len() < 2 {
            return formula.clone();
        }
        self.flip(formula)
    }

    /// Pin numeric leaves to canonical values and swap binary children.
    pub(crate) fn mutate_structure(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let index = picker.pick(0, CANONICAL_VALUES.len() as i32 - 1);
                *value = CANONICAL_VALUES[index as usize];
            }
        });
        result.root_mut().for_each_binary_mut(&mut |_, left, right| {
            if coin.toss() {
                std::mem::swap(left, right);
            }
        });
        result
    }

    /// Pin outlier numeric leaves back to simple values; snap mid-range values
    /// onto the nearest of 1, 2, or ½.
    pub(crate) fn transform_functions(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        let Mutator { coin, picker, .. } = self;
        result.root_mut().for_each_number_mut(&mut |value| {
            if coin.toss() {
                let current = *value;
                if current.abs() > 1e6 {
                    let index = picker.pick(0, SIMPLE_VALUES.len() as i32 - 1);
                    *value = SIMPLE_VALUES[index as usize];
                } else if current.abs() > 0.001 && current.abs() < 100.0 {
                    if (current - 1.0).abs() < 0.5 {
                        *value = 1.0;
                    } else if (current - 2.0).abs() < 1.0 {
                        *value = 2.0;
                    } else if current.abs() < 1.0 {
                        *value = 0.5;
                    }
                }
            }
        });
        result
    }

    /// Recursively retype operation nodes, preserving their children.
    pub(crate) fn replace_operations(&mut self, formula: &Formula) -> Formula {
        let mut result = formula.clone();
        self.replace_operations_walk(result.root_mut());
        result
    }

    fn replace_operations_walk(&mut self, node: &mut Node) {
        match node {
            Node::Wrapper(inner) => self.replace_operations_walk(inner),
            Node::Binary(op, left, right) => {
                if self.coin.toss() {
                    *op = self.producer.random_binary_kind();
                }
                self.replace_operations_walk(left);
                self.replace_operations_walk(right);
            }
            Node::Unary(op, child) => {
                if self.coin.toss() {
                    self.replace_operations_walk(child);
                    *op = self.producer.random_unary_kind();
                }
            }
            _ => {}
        }
    }

    /// Replace the root with `binary(root, leaf)`, where the leaf is a weighted
    /// draw: a small integer, a decimal in (0.1, 1.0], π, or e.
    pub(crate) fn insert_number(&mut self, formula: &Formula) -> Formula {
        let leaf = match self.picker.pick(0, 9) {
            0..=4 => Node::mk_number(f64::from(self.picker.pick(1, 9))),
            5..=7 => Node::mk_number(f64::from(self.picker.pick(1, 10)) / 10.0),
            8 => Node::mk_constant(Constant::Pi),
            _ => Node::mk_constant(Constant::Euler),
        };
        let node = self.producer.random_binary(formula.root().clone(), leaf);
        Formula::new(node, formula.variables().to_vec())
    }

    /// Replace the root with a fresh tree over the same variables.
    pub(crate) fn purge(&mut self, formula: &Formula) -> Result<Formula, String> {
        let node = self
            .producer
            .produce(formula.variables())
            .ok_or_else(|| "cannot purge a formula without variables".to_string())?;
        Ok(Formula::new(node, formula.variables().to_vec()))
    }

    /// Apply the simplification identities; round runaway constants, and with a
    /// small probability drop one binary operation from overly long formulas.
    pub(crate) fn simplify_formula(&mut self, formula: &Formula) -> Formula {
        let mut result = Formula::new(formula.root().simplify(), formula.variables().to_vec());

        if result.numbers().len() > 3 {
            let coin = &mut self.coin;
            result.root_mut().for_each_number_mut(&mut |value| {
                if coin.toss() && value.abs() > 1e6 {
                    *value = (*value / 1000.0).round();
                }
            });
        }

        if result.to_string().len() > 100 {
            let count = result.binary_operator_count();
            if count > 5 && self.coin.toss() && self.coin.toss() {
                let index = self.pick_index(count);
                let keep_left = self.coin.toss();
                result.root_mut().drop_binary_at(index, keep_left);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::producer::OperationProducer;
    use crate::expression::operator_enums::{BinaryOp, UnaryOp};
    use crate::mutation::ChangerKind;
    use crate::randomness::{AlternatingCoin, MidpointPicker};

    fn deterministic_mutator() -> Mutator {
        Mutator::with_parts(
            Box::new(AlternatingCoin::new()),
            Box::new(MidpointPicker),
            OperationProducer::with_picker(Box::new(MidpointPicker)),
        )
    }

    #[test]
    /// With the alternating coin, every other binary node (post-order) flips.
    fn test_flipper() {
        let tree = Node::mk_binary(
            Node::mk_binary(
                Node::mk_binary(
                    Node::mk_unary(Node::mk_variable("x"), UnaryOp::Cbrt),
                    Node::mk_constant(Constant::Euler),
                    BinaryOp::Mul,
                ),
                Node::mk_unary(Node::mk_number(3.0), UnaryOp::Tan),
                BinaryOp::Add,
            ),
            Node::mk_binary(Node::mk_number(4.0), Node::mk_variable("x"), BinaryOp::Div),
            BinaryOp::Pow,
        );
        let formula = Formula::new(tree, vec!["x".to_string()]);
        assert_eq!(formula.to_string(), "(((cbrt(x)*e)+tan(3))^(4/x))");

        let mut mutator = deterministic_mutator();
        let flipped = mutator.apply(ChangerKind::Flipper, &formula).unwrap();
        assert_eq!(flipped.to_string(), "(((e*cbrt(x))+tan(3))^(x/4))");
        // the input formula is untouched
        assert_eq!(formula.to_string(), "(((cbrt(x)*e)+tan(3))^(4/x))");
    }

    #[test]
    /// The variable swapper is inert on single-variable formulas.
    fn test_variable_swapper() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(4.0), BinaryOp::Div),
            vec!["x".to_string()],
        );
        let mut mutator = deterministic_mutator();
        let swapped = mutator.apply(ChangerKind::VariableSwapper, &formula).unwrap();
        assert_eq!(swapped.to_string(), "(x/4)");

        let pair = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_variable("y"), BinaryOp::Div),
            vec!["x".to_string(), "y".to_string()],
        );
        let swapped = mutator.apply(ChangerKind::VariableSwapper, &pair).unwrap();
        assert_eq!(swapped.to_string(), "(y/x)");
    }

    #[test]
    /// The operation replacer retypes accepted nodes through the producer.
    fn test_operation_replacer() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_variable("y"), BinaryOp::Add),
            vec!["x".to_string(), "y".to_string()],
        );
        let mut mutator = deterministic_mutator();
        let replaced = mutator.apply(ChangerKind::OperationReplacer, &formula).unwrap();
        assert_eq!(replaced.to_string(), "(x*y)");
    }

    #[test]
    /// The number inserter extends the root with a weighted random leaf.
    fn test_number_inserter() {
        let formula = Formula::new(Node::mk_variable("x"), vec!["x".to_string()]);
        let mut mutator = deterministic_mutator();
        let extended = mutator.apply(ChangerKind::NumberInserter, &formula).unwrap();
        // midpoint picker: category 4 -> small integer 5, operation '*'
        assert_eq!(extended.to_string(), "(x*5)");
    }

    #[test]
    /// The purger replaces the root with a fresh tree over the same variables.
    fn test_purger() {
        let formula = Formula::new(
            Node::mk_binary(
                Node::mk_binary(Node::mk_variable("r"), Node::mk_variable("i"), BinaryOp::Mul),
                Node::mk_number(2.0),
                BinaryOp::Div,
            ),
            vec!["r".to_string(), "i".to_string()],
        );
        assert_eq!(formula.to_string(), "((r*i)/2)");

        let mut mutator = deterministic_mutator();
        let purged = mutator.apply(ChangerKind::Purger, &formula).unwrap();
        assert_eq!(purged.to_string(), "(r*i)");
        assert_eq!(purged.variables(), formula.variables());
    }

    #[test]
    /// The simplifier changer folds constants and eliminates identities.
    fn test_simplifier() {
        let formula = Formula::new(
            Node::mk_binary(
                Node::mk_binary(Node::mk_variable("x"), Node::mk_number(0.0), BinaryOp::Add),
                Node::mk_binary(Node::mk_number(3.0), Node::mk_number(4.0), BinaryOp::Mul),
                BinaryOp::Mul,
            ),
            vec!["x".to_string()],
        );
        let mut mutator = deterministic_mutator();
        let simplified = mutator.apply(ChangerKind::Simplifier, &formula).unwrap();
        assert_eq!(simplified.to_string(), "(x*12)");
    }
}
