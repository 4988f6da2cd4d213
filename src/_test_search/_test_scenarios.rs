use crate::creation::producer::OperationProducer;
use crate::evaluation::FitnessKind;
use crate::solver::{SOLUTIONS_CAPACITY, Solver, SolverState};

use std::time::Duration;

fn circle_area_solver(target: f64, time_limit: Duration) -> Solver {
    let radii = [1.0, 2.0, 3.0, 4.0, 5.0];
    let input: Vec<Vec<f64>> = radii.iter().map(|r| vec![*r]).collect();
    let expected: Vec<Vec<f64>> = radii
        .iter()
        .map(|r| vec![std::f64::consts::PI * r * r])
        .collect();
    Solver::new(
        vec!["r".to_string()],
        input,
        expected,
        FitnessKind::Enhanced,
        target,
        2,
        Some(time_limit),
    )
}

#[test]
/// The circle-area relationship is recovered: the search reaches `Done` with a
/// hall-of-fame member reproducing every expected value within 1e-6.
fn test_circle_area() {
    let solver = circle_area_solver(0.9999, Duration::from_secs(20));
    assert!(solver.start());
    assert_eq!(solver.state(), SolverState::Done);

    let hall = solver.hall_of_fame();
    assert!(!hall.is_empty());
    let champion = hall
        .iter()
        .find(|solution| solver.is_perfect_match(solution.formula()))
        .expect("no perfect match in the hall of fame");
    for r in [1.0, 2.0, 3.0, 4.0, 5.0] {
        let value = champion.formula().evaluate(&[r]).unwrap();
        assert!((value - std::f64::consts::PI * r * r).abs() < 1e-6);
    }
}

#[test]
/// A modest fitness target terminates the search through the target hook.
fn test_target_termination() {
    let input = vec![vec![1.0], vec![2.0], vec![3.0]];
    let expected = vec![vec![3.0], vec![4.0], vec![5.0]];
    let solver = Solver::new(
        vec!["a".to_string()],
        input,
        expected,
        FitnessKind::Enhanced,
        0.2,
        2,
        Some(Duration::from_secs(20)),
    );
    assert!(solver.start());
    assert_eq!(solver.state(), SolverState::Done);
    assert!(solver.hall_of_fame().iter().any(|s| s.rate() >= 0.2));
}

#[test]
/// An expired deadline stops the search even when nothing fits.
fn test_deadline_termination() {
    let input = vec![vec![1.0], vec![2.0], vec![3.0]];
    let expected = vec![vec![17.0], vec![-3.0], vec![1234.5]];
    let solver = Solver::new(
        vec!["a".to_string()],
        input,
        expected,
        FitnessKind::Basic,
        1.0,
        2,
        Some(Duration::from_secs(1)),
    );
    assert!(!solver.start());
    assert_eq!(solver.state(), SolverState::Done);
}

#[test]
/// A stop requested before starting ends the run immediately.
fn test_stop_request() {
    let solver = circle_area_solver(0.9999, Duration::from_secs(20));
    solver.request_stop();
    assert!(!solver.start());
    assert_eq!(solver.state(), SolverState::Done);
}

#[test]
/// Mild stagnation intervention keeps the prior best and refills the pool with
/// fresh random formulas, bounded by the pool capacity.
fn test_randomness_injection() {
    let solver = circle_area_solver(0.9999, Duration::from_secs(20));
    solver.seed_population();
    let best_before = solver.best().expect("seeding left the pool empty");

    let mut producer = OperationProducer::new();
    solver.inject_randomness(&mut producer);

    let pool = solver.pool();
    assert!(pool.len() > 1);
    assert!(pool.len() <= SOLUTIONS_CAPACITY);
    assert!(
        pool.iter().any(|s| s.text() == best_before.text()),
        "the prior best was lost during injection"
    );
}
