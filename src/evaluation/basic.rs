//! The basic evaluator: exact matches earn full credit, everything else a
//! magnitude-ratio partial credit.

use crate::evaluation::{RATE_CAP, predict};
use crate::expression::EPSILON;
use crate::formula::Formula;

/// Rate a formula over the data. Any failed or non-finite row rates the whole
/// formula 0; the result is 1.0 exactly when every row matches within
/// [EPSILON], and capped below 1.0 otherwise.
pub fn rate(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    if input.len() != expected.len() || expected.is_empty() {
        return 0.0;
    }

    let mut credit = 0.0;
    let mut all_perfect = true;
    for (row, expected_row) in input.iter().zip(expected) {
        let Some(expected_value) = expected_row.first().copied() else {
            return 0.0;
        };
        let Some(current) = predict(formula, row) else {
            return 0.0;
        };
        if (expected_value - current).abs() < EPSILON {
            credit += 1.0;
        } else {
            all_perfect = false;
            credit += partial_fitness(current, expected_value);
        }
    }

    if all_perfect {
        1.0
    } else {
        (credit / expected.len() as f64).min(RATE_CAP)
    }
}

/// Partial credit for an imperfect prediction: the ratio of the smaller to the
/// larger magnitude, with explicit policies when either side is near zero.
pub(crate) fn partial_fitness(current: f64, expected: f64) -> f64 {
    let dividend = current.abs().min(expected.abs());
    let divisor = current.abs().max(expected.abs());

    if divisor < EPSILON {
        return if dividend < 1.0 { 0.5 } else { 1.0 / dividend };
    }
    if dividend < EPSILON {
        return if divisor < 1.0 { 0.5 } else { 1.0 / divisor };
    }

    let increment = dividend / divisor;
    if increment < 1.0 { increment } else { 1.0 / increment }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::node::Node;
    use crate::expression::operator_enums::BinaryOp;

    fn offset_formula(offset: f64) -> Formula {
        Formula::new(
            Node::mk_binary(Node::mk_variable("a"), Node::mk_number(offset), BinaryOp::Add),
            vec!["a".to_string()],
        )
    }

    #[test]
    /// An exact fit rates 1.0; a constant offset earns only partial credit.
    fn test_exact_and_partial() {
        let input = vec![vec![1.0], vec![2.0], vec![3.0]];
        let expected = vec![vec![3.0], vec![4.0], vec![5.0]];

        assert_eq!(rate(&offset_formula(2.0), &input, &expected), 1.0);

        let off = rate(&offset_formula(12.0), &input, &expected);
        assert!(off > 0.0);
        assert!(off < 0.35);
    }

    #[test]
    /// Rows whose width does not match the formula's arity rate the formula 0.
    fn test_arity_mismatch_rates_zero() {
        let input = vec![vec![1.0, 2.0, 3.0]];
        let expected = vec![vec![3.0, 4.0, 5.0]];
        assert_eq!(rate(&offset_formula(2.0), &input, &expected), 0.0);
    }

    #[test]
    /// Division by zero (or any non-finite row) rates the formula 0.
    fn test_division_by_zero() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(0.0), BinaryOp::Div),
            vec!["x".to_string()],
        );
        assert_eq!(formula.to_string(), "(x/(0))");
        let rows = vec![vec![1.0]];
        assert!(rate(&formula, &rows, &rows) < 1e-11);
    }

    #[test]
    /// Boundary behavior of the input data itself.
    fn test_data_boundaries() {
        let formula = offset_formula(2.0);
        // zero rows
        assert_eq!(rate(&formula, &[], &[]), 0.0);
        // mismatched row counts
        assert_eq!(rate(&formula, &[vec![1.0]], &[]), 0.0);
        // empty expected row
        assert_eq!(rate(&formula, &[vec![1.0]], &[vec![]]), 0.0);
    }

    #[test]
    /// The partial-credit boundary policies.
    fn test_partial_fitness() {
        // both magnitudes below the tolerance
        assert_eq!(partial_fitness(0.0, 0.0), 0.5);
        // one side near zero, the other large
        assert_eq!(partial_fitness(0.0, 5.0), 0.2);
        // one side near zero, the other below one
        assert_eq!(partial_fitness(0.5, 0.0), 0.5);
        // plain magnitude ratio
        assert_eq!(partial_fitness(2.0, 4.0), 0.5);
        assert_eq!(partial_fitness(4.0, 2.0), 0.5);
        // the rate cap keeps imperfect scores below 1.0
        let input = vec![vec![1.0]];
        let expected = vec![vec![3.0 + 1e-5]];
        let almost = rate(&offset_formula(2.0), &input, &expected);
        assert!(almost < 1.0);
        assert!(almost <= RATE_CAP);
    }
}
