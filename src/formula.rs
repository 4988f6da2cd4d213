//! A root-owning wrapper around an expression tree with an ordered variable list.

use crate::expression::node::Node;

use std::collections::HashMap;
use std::fmt;

/// A rooted expression tree over a fixed ordered list of named variables.
///
/// The top node is always the transparent [Node::Wrapper], so the root can be
/// replaced without touching any other edge. Evaluation is pure: the positional
/// argument values are bound to every same-named variable leaf through an
/// environment built per call, so concurrent readers never interfere.
#[derive(Clone, Debug)]
pub struct Formula {
    root: Node,
    variables: Vec<String>,
}

impl Formula {
    /// Construct a formula over the given root and ordered variable declarations.
    pub fn new(root: Node, variables: Vec<String>) -> Formula {
        let root = match root {
            wrapped @ Node::Wrapper(_) => wrapped,
            other => Node::mk_wrapper(other),
        };
        Formula { root, variables }
    }

    /// Evaluate the formula with one value per declared variable, positionally.
    ///
    /// Fails when the argument count does not match the variable count.
    /// Non-finite results are clamped to the lowest finite value, so callers can
    /// detect evaluation failures deterministically.
    pub fn evaluate(&self, values: &[f64]) -> Result<f64, String> {
        if values.len() != self.variables.len() {
            return Err(format!(
                "Formula over {} variable(s) evaluated with {} value(s).",
                self.variables.len(),
                values.len()
            ));
        }
        let mut bindings: HashMap<&str, f64> = HashMap::with_capacity(values.len());
        for (name, value) in self.variables.iter().zip(values) {
            bindings.insert(name.as_str(), *value);
        }
        let result = self.root.evaluate(&bindings);
        Ok(if result.is_finite() { result } else { f64::MIN })
    }

    /// The ordered variable declarations (their order defines argument positions).
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The node wrapped by the formula's top-level container.
    pub fn root(&self) -> &Node {
        match &self.root {
            Node::Wrapper(inner) => inner.as_ref(),
            other => other,
        }
    }

    /// Mutable access to the wrapped root, for changers editing the tree in place.
    pub fn root_mut(&mut self) -> &mut Node {
        match &mut self.root {
            Node::Wrapper(inner) => inner.as_mut(),
            other => other,
        }
    }

    /// Read-only view of the non-constant numeric leaves, in visitation order.
    pub fn numbers(&self) -> Vec<f64> {
        self.root.numbers()
    }

    /// The number of binary-operation nodes in the tree.
    pub fn binary_operator_count(&self) -> usize {
        self.root.binary_count()
    }

    /// Target-language-neutral code rendering of the (unsimplified) tree.
    pub fn to_code(&self) -> String {
        self.root().to_code()
    }
}

/// Formulas display as the canonical string of their simplified tree.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.root.simplify())
    }
}

/// Formulas compare equal when their canonical strings match.
impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
