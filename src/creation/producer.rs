//! Randomized constructor of fresh expression trees from a list of variables.

use crate::expression::node::Node;
use crate::expression::operator_enums::{BinaryOp, UnaryOp};
use crate::randomness::{NumberPicker, UniformPicker};

/// Produces random trees over a given ordered variable list:
///   - one variable: a random unary operation applied to it,
///   - two variables: a random binary operation over both,
///   - more: adjacent variables paired into random binary operations (an odd
///     leftover stays bare), then right-folded into a single tree.
///
/// The unary pool used for random generation is configurable and defaults to
/// the full [UnaryOp::ALL] set. Domain-restricted kinds may still be emitted;
/// runtime domain failures are handled by the fitness evaluators.
pub struct OperationProducer {
    picker: Box<dyn NumberPicker>,
    unary_pool: Vec<UnaryOp>,
}

impl OperationProducer {
    pub fn new() -> OperationProducer {
        Self::with_picker(Box::new(UniformPicker::new()))
    }

    pub fn with_picker(picker: Box<dyn NumberPicker>) -> OperationProducer {
        OperationProducer {
            picker,
            unary_pool: UnaryOp::ALL.to_vec(),
        }
    }

    /// Restrict the unary kinds drawn during random generation.
    /// An empty pool falls back to the full set.
    pub fn with_unary_pool(mut self, pool: Vec<UnaryOp>) -> OperationProducer {
        if !pool.is_empty() {
            self.unary_pool = pool;
        }
        self
    }

    /// Produce a fresh random tree; `None` for an empty variable list.
    pub fn produce(&mut self, variables: &[String]) -> Option<Node> {
        match variables {
            [] => None,
            [single] => Some(self.random_unary(Node::mk_variable(single))),
            [first, second] => {
                Some(self.random_binary(Node::mk_variable(first), Node::mk_variable(second)))
            }
            _ => {
                let mut parts: Vec<Node> = Vec::with_capacity(variables.len() / 2 + 1);
                let mut pairs = variables.chunks_exact(2);
                for pair in &mut pairs {
                    parts.push(
                        self.random_binary(Node::mk_variable(&pair[0]), Node::mk_variable(&pair[1])),
                    );
                }
                if let [leftover] = pairs.remainder() {
                    parts.push(Node::mk_variable(leftover));
                }
                let mut result = parts.pop()?;
                while let Some(part) = parts.pop() {
                    result = self.random_binary(part, result);
                }
                Some(result)
            }
        }
    }

    /// Wrap an operand into a randomly chosen unary operation.
    pub fn random_unary(&mut self, operand: Node) -> Node {
        let op = self.random_unary_kind();
        Node::mk_unary(operand, op)
    }

    /// Combine two operands with a randomly chosen binary operation.
    pub fn random_binary(&mut self, left: Node, right: Node) -> Node {
        let op = self.random_binary_kind();
        Node::mk_binary(left, right, op)
    }

    pub fn random_unary_kind(&mut self) -> UnaryOp {
        let index = self.picker.pick(0, self.unary_pool.len() as i32 - 1);
        self.unary_pool[index as usize]
    }

    pub fn random_binary_kind(&mut self) -> BinaryOp {
        let index = self.picker.pick(0, BinaryOp::ALL.len() as i32 - 1);
        BinaryOp::ALL[index as usize]
    }
}

impl Default for OperationProducer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomness::MidpointPicker;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    /// Test the produced shapes for one, two, and three variables with the
    /// deterministic midpoint picker (unary midpoint = sqrt, binary = '*').
    fn test_produce_shapes() {
        let mut producer = OperationProducer::with_picker(Box::new(MidpointPicker));

        let node = producer.produce(&names(&["x"])).unwrap();
        assert_eq!(node.to_string(), "sqrt(x)");

        let node = producer.produce(&names(&["x", "y"])).unwrap();
        assert_eq!(node.to_string(), "(x*y)");

        let node = producer.produce(&names(&["x", "y", "z"])).unwrap();
        assert_eq!(node.to_string(), "((x*y)*z)");

        let node = producer.produce(&names(&["a", "b", "c", "d"])).unwrap();
        assert_eq!(node.to_string(), "((a*b)*(c*d))");

        assert!(producer.produce(&[]).is_none());
    }

    #[test]
    /// The restricted unary pool is honored during generation.
    fn test_unary_pool() {
        let mut producer = OperationProducer::with_picker(Box::new(MidpointPicker))
            .with_unary_pool(vec![UnaryOp::Sin]);
        let node = producer.produce(&names(&["x"])).unwrap();
        assert_eq!(node.to_string(), "sin(x)");
    }
}
