//! The expression tree: operator enums, node variants, evaluation, rendering,
//! and constant-folding simplification.

pub mod node;
pub mod operator_enums;

/// Tolerance for identity detection during simplification and for exact-match
/// tests in the fitness evaluators.
pub const EPSILON: f64 = 1e-6;

/// Divisors with a magnitude below this threshold make a division evaluate to NaN.
pub const DIVISION_BY_ZERO_THRESHOLD: f64 = 1e-10;
