use crate::creation::merger::Merger;
use crate::creation::producer::OperationProducer;
use crate::evaluation::{self, FitnessKind};
use crate::expression::node::Node;
use crate::expression::operator_enums::{BinaryOp, UnaryOp};
use crate::formula::Formula;
use crate::mutation::{ChangerKind, Mutator};
use crate::solver::Solution;

use std::collections::BTreeSet;

fn offset_formula(offset: f64) -> Formula {
    Formula::new(
        Node::mk_binary(Node::mk_variable("x"), Node::mk_number(offset), BinaryOp::Add),
        vec!["x".to_string()],
    )
}

#[test]
/// Solutions are ordered by rate first; ties prefer the shorter canonical
/// string; the remaining lexicographic tiebreak keeps distinct formulas
/// distinct inside a sorted set.
fn test_solution_ordering() {
    let a = Solution::new(offset_formula(5.0), ChangerKind::Flipper, 0.00002);
    let b = Solution::new(offset_formula(5.0), ChangerKind::Merger, 0.00003);
    assert!(a < b);
    assert!(b >= a);

    let short = Solution::new(offset_formula(7.0), ChangerKind::Flipper, 0.5);
    let long = Solution::new(offset_formula(7.25), ChangerKind::Flipper, 0.5);
    // "(x+7)" is shorter than "(x+7.25)", so it ranks better (greater)
    assert!(short > long);

    let mut pool = BTreeSet::new();
    pool.insert(a);
    pool.insert(b.clone());
    pool.insert(short);
    pool.insert(long);
    assert_eq!(pool.len(), 4);
    // inserting an equal solution again does not grow the set
    pool.insert(b);
    assert_eq!(pool.len(), 4);
    assert_eq!(pool.iter().next_back().unwrap().text(), "(x+7)");
}

#[test]
/// No changer mutates its input formula, and none leaks unknown variables.
fn test_changers_leave_input_untouched() {
    let formula = Formula::new(
        Node::mk_binary(
            Node::mk_binary(
                Node::mk_unary(Node::mk_variable("x"), UnaryOp::Sqrt),
                Node::mk_number(8.0),
                BinaryOp::Mul,
            ),
            Node::mk_number(3.0),
            BinaryOp::Add,
        ),
        vec!["x".to_string()],
    );
    let before = formula.to_string();
    assert_eq!(before, "((sqrt(x)*8)+3)");

    let mut mutator = Mutator::new();
    for kind in ChangerKind::MUTATING {
        for _ in 0..10 {
            let changed = mutator.apply(kind, &formula).unwrap();
            assert_eq!(formula.to_string(), before, "{kind:?} mutated its input");
            for name in changed.root().variable_names() {
                assert!(changed.variables().contains(&name));
            }
        }
    }
}

#[test]
/// The merger's output only uses variables drawn from its parents.
fn test_merger_variable_closure() {
    let first = Formula::new(
        Node::mk_binary(
            Node::mk_unary(Node::mk_variable("a"), UnaryOp::Square),
            Node::mk_variable("b"),
            BinaryOp::Mul,
        ),
        vec!["a".to_string(), "b".to_string()],
    );
    let second = Formula::new(
        Node::mk_binary(Node::mk_variable("c"), Node::mk_number(7.0), BinaryOp::Add),
        vec!["c".to_string()],
    );

    let mut merger = Merger::new();
    for _ in 0..50 {
        let merged = merger.merge(&first, &second);
        for name in merged.root().variable_names() {
            assert!(
                first.variables().contains(&name) || second.variables().contains(&name),
                "merger invented variable {name}"
            );
            assert!(merged.variables().contains(&name));
        }
    }
}

#[test]
/// Every evaluator stays within [0, 1] even on domain-hostile formulas.
fn test_fitness_bounds() {
    let input = vec![vec![-1.0], vec![0.0], vec![2.0]];
    let expected = vec![vec![1.0], vec![2.0], vec![5.0]];

    let hostile = [
        Formula::new(
            Node::mk_unary(Node::mk_variable("x"), UnaryOp::Ln),
            vec!["x".to_string()],
        ),
        Formula::new(
            Node::mk_binary(Node::mk_number(1.0), Node::mk_variable("x"), BinaryOp::Div),
            vec!["x".to_string()],
        ),
        Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(4000.0), BinaryOp::Pow),
            vec!["x".to_string()],
        ),
        offset_formula(1.0),
    ];
    for formula in &hostile {
        for kind in [FitnessKind::Basic, FitnessKind::Enhanced, FitnessKind::Ultra] {
            let rate = evaluation::rate(kind, formula, &input, &expected);
            assert!((0.0..=1.0).contains(&rate), "{kind:?} rated {rate}");
        }
    }
}

#[test]
/// Simplification is idempotent and semantics-preserving on generated trees.
fn test_simplify_on_generated_trees() {
    let variables: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    let mut producer = OperationProducer::new();
    let mut mutator = Mutator::new();

    for _ in 0..50 {
        let node = producer.produce(&variables).unwrap();
        let formula = Formula::new(node, variables.clone());
        // grow some numeric leaves so folding has something to do
        let formula = mutator.apply(ChangerKind::NumberInserter, &formula).unwrap();

        let once = formula.root().simplify();
        let twice = once.simplify();
        assert_eq!(once, twice);

        for row in [[1.0, 2.0, 3.0], [0.5, -1.0, 4.0]] {
            let raw = Formula::new(formula.root().clone(), variables.clone())
                .evaluate(&row)
                .unwrap();
            let simplified = Formula::new(once.clone(), variables.clone())
                .evaluate(&row)
                .unwrap();
            if raw != f64::MIN && simplified != f64::MIN {
                let difference = (raw - simplified).abs();
                let scale = raw.abs().max(1.0);
                assert!(difference <= 1e-9 * scale, "{formula} changed value");
            }
        }
    }
}
