//! The crossover operator: combines random subtrees of two parent formulas.

use crate::creation::producer::OperationProducer;
use crate::expression::node::Node;
use crate::formula::Formula;
use crate::randomness::{Coin, RandomCoin};

/// Picks one subtree from each parent by a coin-driven walk, then joins them
/// with a random binary operation.
pub struct Merger {
    coin: Box<dyn Coin>,
    producer: OperationProducer,
}

impl Merger {
    pub fn new() -> Merger {
        Merger {
            coin: Box::new(RandomCoin::new()),
            producer: OperationProducer::new(),
        }
    }

    pub fn with_parts(coin: Box<dyn Coin>, producer: OperationProducer) -> Merger {
        Merger { coin, producer }
    }

    /// Merge two formulas into a new one.
    ///
    /// The result is declared over the union of both parents' variable lists
    /// (first parent's order, then unseen names of the second), so every free
    /// variable of the picked subtrees stays covered.
    pub fn merge(&mut self, first: &Formula, second: &Formula) -> Formula {
        let left = self.pick_subtree(first.root()).clone();
        let right = self.pick_subtree(second.root()).clone();
        let node = self.producer.random_binary(left, right);

        let mut variables = first.variables().to_vec();
        for name in second.variables() {
            if !variables.contains(name) {
                variables.push(name.clone());
            }
        }
        Formula::new(node, variables)
    }

    /// The subtree-picking walk. At a binary node each child is first offered by
    /// a coin toss; a declined child is still walked (consuming tosses) before
    /// the other side is considered. At a unary node the operand is either taken
    /// directly or walked. Leaves pick themselves.
    fn pick_subtree<'a>(&mut self, node: &'a Node) -> &'a Node {
        match node {
            Node::Binary(_, left, right) => {
                if self.coin.toss() {
                    return left.as_ref();
                }
                let _ = self.pick_subtree(left.as_ref());
                if self.coin.toss() {
                    return right.as_ref();
                }
                self.pick_subtree(right.as_ref())
            }
            Node::Unary(_, operand) => {
                if self.coin.toss() {
                    operand.as_ref()
                } else {
                    self.pick_subtree(operand.as_ref())
                }
            }
            Node::Wrapper(inner) => self.pick_subtree(inner.as_ref()),
            _ => node,
        }
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::operator_enums::{BinaryOp, Constant, UnaryOp};
    use crate::randomness::{AlternatingCoin, MidpointPicker};

    #[test]
    /// With the alternating coin and midpoint picker, merging `π·x²` and
    /// `x·(x+7)` picks `x²` from the left parent, `(x+7)` from the right,
    /// and joins them with `*`.
    fn test_merge() {
        let variables = vec!["x".to_string()];
        let first = Formula::new(
            Node::mk_binary(
                Node::mk_unary(Node::mk_variable("x"), UnaryOp::Square),
                Node::mk_constant(Constant::Pi),
                BinaryOp::Mul,
            ),
            variables.clone(),
        );
        assert_eq!(first.to_string(), "((x)^2*π)");

        let second = Formula::new(
            Node::mk_binary(
                Node::mk_variable("x"),
                Node::mk_binary(Node::mk_variable("x"), Node::mk_number(7.0), BinaryOp::Add),
                BinaryOp::Mul,
            ),
            variables,
        );
        assert_eq!(second.to_string(), "(x*(x+7))");

        let mut merger = Merger::with_parts(
            Box::new(AlternatingCoin::new()),
            OperationProducer::with_picker(Box::new(MidpointPicker)),
        );
        let merged = merger.merge(&first, &second);
        assert_eq!(merged.to_string(), "((x)^2*(x+7))");
    }

    #[test]
    /// The merged formula declares the union of both parents' variables.
    fn test_variable_union() {
        let first = Formula::new(Node::mk_variable("a"), vec!["a".to_string()]);
        let second = Formula::new(Node::mk_variable("b"), vec!["b".to_string()]);
        let mut merger = Merger::new();
        let merged = merger.merge(&first, &second);
        assert_eq!(merged.variables(), &["a".to_string(), "b".to_string()]);
        for name in merged.root().variable_names() {
            assert!(merged.variables().contains(&name));
        }
    }
}
