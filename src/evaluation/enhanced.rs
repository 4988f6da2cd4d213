//! The enhanced evaluator: a weighted blend of accuracy, complexity, range
//! consistency, and monotonicity.

use crate::evaluation::{RATE_CAP, basic, predict};
use crate::expression::EPSILON;
use crate::formula::Formula;

const ACCURACY_WEIGHT: f64 = 0.7;
const COMPLEXITY_WEIGHT: f64 = 0.1;
const RANGE_WEIGHT: f64 = 0.1;
const MONOTONICITY_WEIGHT: f64 = 0.1;

/// Rate a formula as `0.7·accuracy + 0.1·(1 − complexity) + 0.1·range +
/// 0.1·monotonicity`, capped below 1.0.
pub fn rate(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    if input.len() != expected.len() || expected.is_empty() {
        return 0.0;
    }

    // a failed evaluation voids the whole blend, not just the accuracy term
    let Some(accuracy) = accuracy_fitness(formula, input, expected) else {
        return 0.0;
    };
    let complexity = complexity_penalty(formula);
    let range = range_consistency(formula, input, expected);
    let monotonicity = monotonicity_bonus(formula, input, expected);

    let blended = ACCURACY_WEIGHT * accuracy
        + COMPLEXITY_WEIGHT * (1.0 - complexity)
        + RANGE_WEIGHT * range
        + MONOTONICITY_WEIGHT * monotonicity;
    blended.min(RATE_CAP)
}

/// The basic exact/partial credit, uncapped (1.0 when every row is exact).
/// `None` when any row fails to evaluate.
fn accuracy_fitness(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> Option<f64> {
    let mut credit = 0.0;
    let mut all_perfect = true;
    for (row, expected_row) in input.iter().zip(expected) {
        let expected_value = expected_row.first().copied()?;
        let current = predict(formula, row)?;
        if (expected_value - current).abs() < EPSILON {
            credit += 1.0;
        } else {
            all_perfect = false;
            credit += basic::partial_fitness(current, expected_value);
        }
    }
    if all_perfect {
        Some(1.0)
    } else {
        Some(credit / expected.len() as f64)
    }
}

/// Average of a display-length penalty and an operation-count penalty, both in [0, 1].
fn complexity_penalty(formula: &Formula) -> f64 {
    let text = formula.to_string();
    let length = text.chars().count();
    let operations = text
        .chars()
        .filter(|c| matches!(c, '+' | '-' | '*' | '/' | '^'))
        .count();

    let length_penalty = (length as f64 / 200.0).min(1.0);
    let operation_penalty = (operations as f64 / 20.0).min(1.0);
    (length_penalty + operation_penalty) / 2.0
}

/// How well the output range over the data matches the expected range.
fn range_consistency(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    let mut min_expected = f64::MAX;
    let mut max_expected = f64::MIN;
    for expected_row in expected {
        let Some(value) = expected_row.first() else {
            return 0.0;
        };
        min_expected = min_expected.min(*value);
        max_expected = max_expected.max(*value);
    }
    let expected_range = max_expected - min_expected;
    if expected_range < EPSILON {
        return 1.0;
    }

    let mut min_output = f64::MAX;
    let mut max_output = f64::MIN;
    let mut any_output = false;
    for row in input {
        if let Some(output) = predict(formula, row) {
            min_output = min_output.min(output);
            max_output = max_output.max(output);
            any_output = true;
        }
    }
    if !any_output {
        return 0.0;
    }

    let output_range = max_output - min_output;
    let range_difference = (output_range - expected_range).abs();
    (1.0 - range_difference / expected_range).max(0.0)
}

/// The fraction of adjacent row pairs whose output trend matches the expected
/// trend (near-zero trends form their own class).
fn monotonicity_bonus(formula: &Formula, input: &[Vec<f64>], expected: &[Vec<f64>]) -> f64 {
    if input.len() < 2 {
        return 0.0;
    }

    let mut matching = 0.0;
    let mut comparisons = 0usize;
    for i in 1..input.len() {
        let (Some(previous), Some(current)) =
            (predict(formula, &input[i - 1]), predict(formula, &input[i]))
        else {
            continue;
        };
        let (Some(expected_previous), Some(expected_current)) =
            (expected[i - 1].first(), expected[i].first())
        else {
            continue;
        };

        let expected_trend = expected_current - expected_previous;
        let actual_trend = current - previous;
        if (expected_trend > 0.0 && actual_trend > 0.0)
            || (expected_trend < 0.0 && actual_trend < 0.0)
            || (expected_trend.abs() < EPSILON && actual_trend.abs() < EPSILON)
        {
            matching += 1.0;
        }
        comparisons += 1;
    }

    if comparisons > 0 {
        matching / comparisons as f64
    } else {
        0.0
    }
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
    /// An exact fit scores a full accuracy term plus the full range and
    /// monotonicity bonuses, but stays below 1.0.
    fn test_exact_fit() {
        let input = vec![vec![1.0], vec![2.0], vec![3.0]];
        let expected = vec![vec![3.0], vec![4.0], vec![5.0]];
        let score = rate(&offset_formula(2.0), &input, &expected);
        assert!(score > 0.99);
        assert!(score < 1.0);
    }

    #[test]
    /// A wrong trend loses the monotonicity term.
    fn test_monotonicity() {
        let decreasing = Formula::new(
            Node::mk_binary(Node::mk_number(10.0), Node::mk_variable("a"), BinaryOp::Sub),
            vec!["a".to_string()],
        );
        let input = vec![vec![1.0], vec![2.0], vec![3.0]];
        let expected = vec![vec![3.0], vec![4.0], vec![5.0]];
        assert_eq!(monotonicity_bonus(&decreasing, &input, &expected), 0.0);
        assert_eq!(monotonicity_bonus(&offset_formula(1.0), &input, &expected), 1.0);
    }

    #[test]
    /// Longer formulas with more operations are penalized harder.
    fn test_complexity() {
        let simple = complexity_penalty(&offset_formula(2.0));
        let convoluted = Formula::new(
            Node::mk_binary(
                Node::mk_binary(Node::mk_variable("a"), Node::mk_number(3.0), BinaryOp::Mul),
                Node::mk_binary(Node::mk_variable("a"), Node::mk_number(7.0), BinaryOp::Pow),
                BinaryOp::Div,
            ),
            vec!["a".to_string()],
        );
        assert!(complexity_penalty(&convoluted) > simple);
    }

    #[test]
    /// Division by zero rates 0 under the enhanced evaluator as well.
    fn test_division_by_zero() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(0.0), BinaryOp::Div),
            vec!["x".to_string()],
        );
        let rows = vec![vec![1.0]];
        assert_eq!(rate(&formula, &rows, &rows), 0.0);
    }
}
