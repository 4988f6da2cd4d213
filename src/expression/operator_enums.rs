//! Contains enum structures for the operators and named constants of an expression tree.

use crate::expression::DIVISION_BY_ZERO_THRESHOLD;

use std::fmt;

/// Enum for all possible unary operations occurring in an expression tree.
///
/// This is the full (union) set; random tree generation may draw from a
/// configurable subset of it (see [crate::creation::producer::OperationProducer]).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum UnaryOp {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Square,
    Cube,
    Sqrt,
    SqrtNeg, // '-sqrt'
    Cbrt,
    Ln,
    Log10,
    Log2,
    Exp,
    Abs,
    Floor,
    Ceil,
    Sigmoid,
    SoftSat, // 'sat', x / (1 + |x|)
}

/// Enum for all possible binary operations occurring in an expression tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum BinaryOp {
    Add, // '+'
    Sub, // '-'
    Mul, // '*'
    Div, // '/'
    Pow, // '^'
}

/// Enum for the immutable named constants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum Constant {
    Pi,
    Euler,
}

impl UnaryOp {
    /// Every unary operation, in canonical order.
    pub const ALL: [UnaryOp; 23] = [
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
        UnaryOp::Square,
        UnaryOp::Cube,
        UnaryOp::Sqrt,
        UnaryOp::SqrtNeg,
        UnaryOp::Cbrt,
        UnaryOp::Ln,
        UnaryOp::Log10,
        UnaryOp::Log2,
        UnaryOp::Exp,
        UnaryOp::Abs,
        UnaryOp::Floor,
        UnaryOp::Ceil,
        UnaryOp::Sigmoid,
        UnaryOp::SoftSat,
    ];

    /// Apply the operation to a value.
    ///
    /// Out-of-domain inputs of `asin`/`acos` yield 0 (an explicit policy that keeps
    /// the search smooth); other domain failures propagate as NaN.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            UnaryOp::Sin => value.sin(),
            UnaryOp::Cos => value.cos(),
            UnaryOp::Tan => value.tan(),
            UnaryOp::Asin => {
                if value < -1.0 || value > 1.0 {
                    0.0
                } else {
                    value.asin()
                }
            }
            UnaryOp::Acos => {
                if value < -1.0 || value > 1.0 {
                    0.0
                } else {
                    value.acos()
                }
            }
            UnaryOp::Atan => value.atan(),
            UnaryOp::Sinh => value.sinh(),
            UnaryOp::Cosh => value.cosh(),
            UnaryOp::Tanh => value.tanh(),
            UnaryOp::Square => value * value,
            UnaryOp::Cube => value * value * value,
            UnaryOp::Sqrt => value.sqrt(),
            UnaryOp::SqrtNeg => -value.sqrt(),
            UnaryOp::Cbrt => value.cbrt(),
            UnaryOp::Ln => value.ln(),
            UnaryOp::Log10 => value.log10(),
            UnaryOp::Log2 => value.log2(),
            UnaryOp::Exp => value.exp(),
            UnaryOp::Abs => value.abs(),
            UnaryOp::Floor => value.floor(),
            UnaryOp::Ceil => value.ceil(),
            UnaryOp::Sigmoid => {
                // saturate to avoid exp overflow
                if value > 500.0 {
                    1.0
                } else if value < -500.0 {
                    0.0
                } else {
                    1.0 / (1.0 + (-value).exp())
                }
            }
            UnaryOp::SoftSat => value / (1.0 + value.abs()),
        }
    }

    /// Whether the operation renders after its operand (`(x)^2` instead of `f(x)`).
    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::Square | UnaryOp::Cube)
    }
}

impl BinaryOp {
    /// Every binary operation, in canonical order.
    pub const ALL: [BinaryOp; 5] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
    ];

    /// Apply the operation to two values.
    ///
    /// Division by a near-zero divisor yields NaN. Power yields NaN whenever the
    /// base or the exponent is NaN (`powf` would otherwise report `1^NaN == 1`).
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Sub => left - right,
            BinaryOp::Mul => left * right,
            BinaryOp::Div => {
                if right.abs() < DIVISION_BY_ZERO_THRESHOLD {
                    f64::NAN
                } else {
                    left / right
                }
            }
            BinaryOp::Pow => {
                if left.is_nan() || right.is_nan() {
                    f64::NAN
                } else {
                    left.powf(right)
                }
            }
        }
    }
}

impl Constant {
    /// The numeric value of the constant.
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::Euler => std::f64::consts::E,
        }
    }

    /// The name used in the target-language-neutral code rendering.
    pub fn code_symbol(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::Euler => "e",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Sin => write!(f, "sin"),
            UnaryOp::Cos => write!(f, "cos"),
            UnaryOp::Tan => write!(f, "tan"),
            UnaryOp::Asin => write!(f, "asin"),
            UnaryOp::Acos => write!(f, "acos"),
            UnaryOp::Atan => write!(f, "atan"),
            UnaryOp::Sinh => write!(f, "sinh"),
            UnaryOp::Cosh => write!(f, "cosh"),
            UnaryOp::Tanh => write!(f, "tanh"),
            UnaryOp::Square => write!(f, "^2"),
            UnaryOp::Cube => write!(f, "^3"),
            UnaryOp::Sqrt => write!(f, "sqrt"),
            UnaryOp::SqrtNeg => write!(f, "-sqrt"),
            UnaryOp::Cbrt => write!(f, "cbrt"),
            UnaryOp::Ln => write!(f, "ln"),
            UnaryOp::Log10 => write!(f, "log10"),
            UnaryOp::Log2 => write!(f, "log2"),
            UnaryOp::Exp => write!(f, "exp"),
            UnaryOp::Abs => write!(f, "abs"),
            UnaryOp::Floor => write!(f, "floor"),
            UnaryOp::Ceil => write!(f, "ceil"),
            UnaryOp::Sigmoid => write!(f, "sigmoid"),
            UnaryOp::SoftSat => write!(f, "sat"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Pow => write!(f, "^"),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Constant::Pi => write!(f, "π"),
            Constant::Euler => write!(f, "e"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test the explicit domain policies of the unary operations.
    fn test_unary_domain_policy() {
        assert_eq!(UnaryOp::Asin.apply(2.0), 0.0);
        assert_eq!(UnaryOp::Acos.apply(-1.5), 0.0);
        assert!(UnaryOp::Asin.apply(f64::NAN).is_nan());
        assert!(UnaryOp::Ln.apply(-1.0).is_nan());
        assert_eq!(UnaryOp::Sigmoid.apply(1000.0), 1.0);
        assert_eq!(UnaryOp::Sigmoid.apply(-1000.0), 0.0);
        assert_eq!(UnaryOp::SoftSat.apply(-1.0), -0.5);
    }

    #[test]
    /// Test division-by-near-zero and NaN propagation through power.
    fn test_binary_sentinels() {
        assert!(BinaryOp::Div.apply(1.0, 0.0).is_nan());
        assert!(BinaryOp::Div.apply(1.0, 1e-11).is_nan());
        assert_eq!(BinaryOp::Div.apply(1.0, 2.0), 0.5);
        assert!(BinaryOp::Pow.apply(1.0, f64::NAN).is_nan());
        assert!(BinaryOp::Pow.apply(f64::NAN, 0.0).is_nan());
        assert_eq!(BinaryOp::Pow.apply(2.0, 3.0), 8.0);
    }
}
