//! The ultra-precision evaluator: tight relative/absolute error scoring with
//! gentler structural penalties and a near-perfect-row bonus.

use crate::evaluation::{RATE_CAP, predict};
use crate::formula::Formula;

const ACCURACY_WEIGHT: f64 = 0.85;
const COMPLEXITY_WEIGHT: f64 = 0.05;
const RANGE_WEIGHT: f64 = 0.05;
const PRECISION_WEIGHT: f64 = 0.05;

/// Exactness tolerance of the ultra accuracy term.
const ULTRA_EPSILON: f64 = 1e-10;

/// Rate a formula as `0.85·accuracy + 0.05·(1 − complexity) + 0.05·range +
/// 0.05·precision`, capped below 1.0. Only the accuracy term itself can reach
/// exactly 1.0 (when every row is within 1e-10).
pub fn rate(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    if input.len() != expected.len() || expected.is_empty() {
        return 0.0;
    }

    // a failed evaluation voids the whole blend, not just the accuracy term
    let Some(accuracy) = accuracy_fitness(formula, input, expected) else {
        return 0.0;
    };
    let complexity = complexity_penalty(formula);
    let range = range_adaptation(formula, input, expected);
    let precision = precision_bonus(formula, input, expected);

    let blended = ACCURACY_WEIGHT * accuracy
        + COMPLEXITY_WEIGHT * (1.0 - complexity)
        + RANGE_WEIGHT * range
        + PRECISION_WEIGHT * precision;
    blended.min(RATE_CAP)
}

/// Per-row credit: 1.0 within [ULTRA_EPSILON]; otherwise `1 − relativeError`
/// for large expectations and `1 − absoluteError` for small ones, floored at 0.
/// `None` when any row fails to evaluate.
fn accuracy_fitness(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> Option<f64> {
    let mut credit = 0.0;
    for (row, expected_row) in input.iter().zip(expected) {
        let expected_value = expected_row.first().copied()?;
        let current = predict(formula, row)?;
        credit += if (expected_value - current).abs() < ULTRA_EPSILON {
            1.0
        } else {
            partial_fitness(current, expected_value)
        };
    }
    Some(credit / expected.len() as f64)
}

fn partial_fitness(current: f64, expected: f64) -> f64 {
    if expected.abs() < ULTRA_EPSILON && current.abs() < ULTRA_EPSILON {
        return 1.0; // both near zero
    }
    if expected.abs() > 1.0 {
        let relative_error = ((current - expected) / expected).abs();
        (1.0 - relative_error).max(0.0)
    } else {
        let absolute_error = (current - expected).abs();
        (1.0 - absolute_error).max(0.0)
    }
}

/// A gentle display-length penalty: 10% beyond 300 characters, 5% beyond 200.
fn complexity_penalty(formula: &Formula) -> f64 {
    let length = formula.to_string().chars().count();
    if length > 300 {
        0.1
    } else if length > 200 {
        0.05
    } else {
        0.0
    }
}

/// The ratio of the smaller to the larger of the predicted and expected ranges.
fn range_adaptation(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    let mut min_expected = f64::MAX;
    let mut max_expected = f64::MIN;
    let mut min_predicted = f64::MAX;
    let mut max_predicted = f64::MIN;
    let mut any_predicted = false;

    for (row, expected_row) in input.iter().zip(expected) {
        if let Some(value) = expected_row.first() {
            min_expected = min_expected.min(*value);
            max_expected = max_expected.max(*value);
        }
        if let Some(predicted) = predict(formula, row) {
            min_predicted = min_predicted.min(predicted);
            max_predicted = max_predicted.max(predicted);
            any_predicted = true;
        }
    }
    if !any_predicted {
        return 0.0;
    }

    let expected_range = max_expected - min_expected;
    let predicted_range = max_predicted - min_predicted;
    if expected_range < ULTRA_EPSILON || predicted_range < ULTRA_EPSILON {
        return 0.5;
    }
    expected_range.min(predicted_range) / expected_range.max(predicted_range)
}

/// The fraction of rows predicted within `max(1% of |expected|, 0.01)`.
fn precision_bonus(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    let mut near_perfect = 0.0;
    for (row, expected_row) in input.iter().zip(expected) {
        let (Some(expected_value), Some(predicted)) = (expected_row.first(), predict(formula, row))
        else {
            continue;
        };
        let tolerance = (0.01 * expected_value.abs()).max(0.01);
        if (predicted - expected_value).abs() < tolerance {
            near_perfect += 1.0;
        }
    }
    near_perfect / expected.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::node::Node;
    use crate::expression::operator_enums::BinaryOp;

    fn scaled_formula(scale: f64) -> Formula {
        Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(scale), BinaryOp::Mul),
            vec!["x".to_string()],
        )
    }

    #[test]
    /// An exact fit is rewarded well above a 10%-off fit, and never reaches 1.0.
    fn test_precision_gradient() {
        let input = vec![vec![1.0], vec![2.0], vec![3.0]];
        let expected = vec![vec![2.0], vec![4.0], vec![6.0]];

        let exact = rate(&scaled_formula(2.0), &input, &expected);
        let off = rate(&scaled_formula(2.2), &input, &expected);
        assert!(exact > off);
        assert!(exact < 1.0);
        assert!(exact > 0.99);
    }

    #[test]
    /// Division by zero rates 0 under the ultra evaluator as well.
    fn test_division_by_zero() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(0.0), BinaryOp::Div),
            vec!["x".to_string()],
        );
        let rows = vec![vec![1.0]];
        assert_eq!(rate(&formula, &rows, &rows), 0.0);
    }

    #[test]
    /// Small expectations are judged by absolute error, large ones by relative.
    fn test_partial_fitness() {
        assert_eq!(partial_fitness(0.0, 0.0), 1.0);
        assert!((partial_fitness(105.0, 100.0) - 0.95).abs() < 1e-12);
        assert!((partial_fitness(0.6, 0.5) - 0.9).abs() < 1e-12);
        assert_eq!(partial_fitness(1000.0, 100.0), 0.0);
    }
}
