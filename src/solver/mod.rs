//! The concurrent evolutionary loop: ordered solution pool, changer picking,
//! stagnation handling, hall-of-fame, and termination.

use crate::creation::merger::Merger;
use crate::creation::producer::OperationProducer;
use crate::evaluation::{self, FitnessKind};
use crate::expression::EPSILON;
use crate::expression::node::Node;
use crate::expression::operator_enums::{BinaryOp, Constant, UnaryOp};
use crate::formula::Formula;
use crate::mutation::{ChangerKind, Mutator};
use crate::randomness::{Coin, RandomCoin};
use crate::result_print::{DisplayRow, print_solution_table};

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};
use std::thread;
use std::time::{Duration, Instant};

/// Rates above this threshold enter the hall of fame on their own.
pub const ALMOST_PERFECT: f64 = 0.9999999999;

/// Size cap of the ordered solution pool.
pub const SOLUTIONS_CAPACITY: usize = 100;

/// The search ends once this many near-perfect candidates are collected.
pub const HALL_OF_FAME_SIZE: usize = 3;

const INITIAL_POPULATION_SIZE: usize = 20;
const RANDOM_INJECTION_COUNT: usize = 500;
const STAGNATION_THRESHOLD: usize = 500;
const AGGRESSIVE_STAGNATION_THRESHOLD: usize = 1000;
const ITERATION_HARD_CAP: usize = 200_000;
const BEST_RATE_EPSILON: f64 = 1e-8;

/// Creative variants regenerated from the surviving top during aggressive
/// stagnation intervention.
const CREATIVE_VARIANTS: [ChangerKind; 4] = [
    ChangerKind::Simplifier,
    ChangerKind::FunctionTransformer,
    ChangerKind::VariableSwapper,
    ChangerKind::StructureMutator,
];

/// The solver lifecycle. `Done` is terminal; no thread transitions back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SolverState {
    Ready,
    Running,
    Done,
}

impl SolverState {
    fn from_u8(value: u8) -> SolverState {
        match value {
            0 => SolverState::Ready,
            1 => SolverState::Running,
            _ => SolverState::Done,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SolverState::Ready => 0,
            SolverState::Running => 1,
            SolverState::Done => 2,
        }
    }
}

/// One scored pool entry: the formula, its cached canonical string, the tag of
/// the changer that produced it, and its fitness rate.
#[derive(Clone, Debug)]
pub struct Solution {
    formula: Formula,
    text: String,
    changer: ChangerKind,
    rate: f64,
}

impl Solution {
    pub fn new(formula: Formula, changer: ChangerKind, rate: f64) -> Solution {
        let text = formula.to_string();
        Solution {
            formula,
            text,
            changer,
            rate,
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn changer(&self) -> ChangerKind {
        self.changer
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Solutions are ordered by rate ascending (the pool maximum is the best);
/// rate ties prefer the shorter canonical string, and remaining ties fall back
/// to lexicographic order, so the order is total.
impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rate
            .partial_cmp(&other.rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.text.len().cmp(&self.text.len()))
            .then_with(|| other.text.cmp(&self.text))
    }
}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Solution {}

/// The evolutionary solver. One instance drives all worker threads; the pools
/// live behind reader/writer locks and the state in an atomic.
pub struct Solver {
    variables: Vec<String>,
    input: Vec<Vec<f64>>,
    expected: Vec<Vec<f64>>,
    fitness: FitnessKind,
    target: f64,
    workers: usize,
    time_limit: Option<Duration>,
    state: AtomicU8,
    solutions: RwLock<BTreeSet<Solution>>,
    hall_of_fame: RwLock<BTreeSet<Solution>>,
}

impl Solver {
    /// Create a solver over the given data. `threads == 0` selects all
    /// hardware threads but one; `time_limit == None` runs without a deadline.
    pub fn new(
        variables: Vec<String>,
        input: Vec<Vec<f64>>,
        expected: Vec<Vec<f64>>,
        fitness: FitnessKind,
        target: f64,
        threads: usize,
        time_limit: Option<Duration>,
    ) -> Solver {
        let workers = if threads > 0 {
            threads
        } else {
            thread::available_parallelism()
                .map(|cores| cores.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        };
        Solver {
            variables,
            input,
            expected,
            fitness,
            target,
            workers,
            time_limit,
            state: AtomicU8::new(SolverState::Ready.as_u8()),
            solutions: RwLock::new(BTreeSet::new()),
            hall_of_fame: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn state(&self) -> SolverState {
        SolverState::from_u8(self.state.load(AtomicOrdering::SeqCst))
    }

    /// Cooperative stop: every worker exits at its next iteration boundary.
    pub fn request_stop(&self) {
        self.set_done();
    }

    fn set_done(&self) {
        self.state
            .store(SolverState::Done.as_u8(), AtomicOrdering::SeqCst);
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run the search to completion. Returns true when the hall of fame holds a
    /// candidate meeting the target (or a verified perfect match).
    pub fn start(&self) -> bool {
        if self.state() == SolverState::Ready {
            self.seed_population();
            self.state
                .store(SolverState::Running.as_u8(), AtomicOrdering::SeqCst);
        }

        let deadline = self.time_limit.map(|limit| Instant::now() + limit);
        thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| self.work(deadline));
            }
        });

        let success = {
            let hall = self.hall_of_fame.read().unwrap();
            hall.iter()
                .any(|solution| solution.rate() >= self.target || self.is_perfect_match(solution.formula()))
        };
        self.print();
        success
    }

    /// Fill the pool with random formulas plus a few heuristic seeds.
    pub(crate) fn seed_population(&self) {
        let mut producer = OperationProducer::new();
        let mut solutions = self.solutions.write().unwrap();
        for _ in 0..INITIAL_POPULATION_SIZE {
            let Some(node) = producer.produce(&self.variables) else {
                continue;
            };
            let formula = Formula::new(node, self.variables.clone());
            let rate = self.rate_formula(&formula);
            solutions.insert(Solution::new(formula, ChangerKind::Flipper, rate));
        }
        for formula in self.heuristic_seeds() {
            let rate = self.rate_formula(&formula);
            solutions.insert(Solution::new(formula, ChangerKind::Simplifier, rate));
        }
        Self::shrink_locked(&mut solutions);
    }

    /// Common closed-form shapes over the first variable, to shortcut frequent
    /// targets such as areas and circumferences.
    fn heuristic_seeds(&self) -> Vec<Formula> {
        let Some(first) = self.variables.first() else {
            return Vec::new();
        };
        let var = || Node::mk_variable(first);
        let square = || Node::mk_unary(var(), UnaryOp::Square);
        let pi = || Node::mk_constant(Constant::Pi);

        let shapes = [
            square(),
            Node::mk_binary(pi(), square(), BinaryOp::Mul),
            Node::mk_binary(
                Node::mk_number(2.0),
                Node::mk_binary(pi(), var(), BinaryOp::Mul),
                BinaryOp::Mul,
            ),
            Node::mk_binary(Node::mk_number(3.14159265358979), square(), BinaryOp::Mul),
        ];
        shapes
            .into_iter()
            .map(|node| Formula::new(node, self.variables.clone()))
            .collect()
    }

    /// The per-thread worker loop.
    fn work(&self, deadline: Option<Instant>) {
        let mut mutator = Mutator::new();
        let mut merger = Merger::new();
        let mut producer = OperationProducer::new();
        let mut coin = RandomCoin::new();

        let mut stagnation = 0usize;
        let mut aggressive_stagnation = 0usize;
        let mut last_best = 0.0f64;
        let mut iterations = 0usize;

        while self.state() == SolverState::Running {
            iterations += 1;
            if iterations > ITERATION_HARD_CAP {
                self.set_done();
                break;
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    self.set_done();
                    break;
                }
            }

            let mut choice = self.pick_changer(&mut mutator);
            if aggressive_stagnation > AGGRESSIVE_STAGNATION_THRESHOLD {
                choice = Some(mutator.pick_creative());
            }

            let Some((best_formula, existing_formula)) = self.snapshot_parents(&mut coin) else {
                continue; // empty pool, retry
            };

            let (tag, candidate) = match choice {
                None => (
                    ChangerKind::Merger,
                    merger.merge(&best_formula, &existing_formula),
                ),
                Some(kind) => {
                    let base = if coin.toss() {
                        &best_formula
                    } else {
                        &existing_formula
                    };
                    match mutator.apply(kind, base) {
                        Ok(formula) => (kind, formula),
                        Err(_) => continue, // skip failed mutation
                    }
                }
            };
            self.store_solution(tag, candidate);

            let current_best = self.best_rate();
            if (current_best - last_best).abs() < BEST_RATE_EPSILON {
                stagnation += 1;
                aggressive_stagnation += 1;
            } else {
                stagnation = 0;
                aggressive_stagnation = 0;
                last_best = current_best;
            }
            mutator.report_progress(current_best);

            if current_best >= self.target {
                self.set_done();
                break;
            }
            // any perfect pool member ends the search
            if let Some(perfect) = self.find_perfect_member() {
                self.hall_of_fame.write().unwrap().insert(perfect);
                self.set_done();
                break;
            }

            if stagnation > STAGNATION_THRESHOLD {
                self.inject_randomness(&mut producer);
                stagnation = 0;
            }
            if aggressive_stagnation > AGGRESSIVE_STAGNATION_THRESHOLD * 2 {
                self.inject_creative_randomness(&mut mutator);
                aggressive_stagnation = 0;
            }
        }
    }

    /// Pick the next changer: half of the time uniformly at random, otherwise
    /// steered by the tag of a random pool member. `None` requests a merge.
    fn pick_changer(&self, mutator: &mut Mutator) -> Option<ChangerKind> {
        let tag = {
            let solutions = self.solutions.read().unwrap();
            if solutions.is_empty() || mutator.toss() {
                return Some(mutator.pick_random());
            }
            if solutions.len() <= 1 {
                return None;
            }
            let position = mutator.pick_index(solutions.len());
            solutions.iter().nth(position).map(Solution::changer)
        };
        match tag {
            Some(ChangerKind::Merger) | None => None,
            Some(kind) => Some(kind),
        }
    }

    /// Snapshot the pool maximum and one mid-pool member under a shared lock.
    fn snapshot_parents(&self, coin: &mut dyn Coin) -> Option<(Formula, Formula)> {
        let solutions = self.solutions.read().unwrap();
        if solutions.is_empty() {
            return None;
        }
        let best = solutions.iter().next_back()?.formula().clone();
        let shift = if coin.toss() { 1 } else { solutions.len() >> 1 };
        let offset = shift.min(solutions.len() - 1);
        let existing = solutions.iter().rev().nth(offset)?.formula().clone();
        Some((best, existing))
    }

    /// Score a candidate and insert it into the pool (and, when it qualifies,
    /// into the hall of fame, possibly finishing the search).
    fn store_solution(&self, changer: ChangerKind, formula: Formula) {
        let rate = self.rate_formula(&formula);
        let solution = Solution::new(formula, changer, rate);

        if rate >= self.target || self.is_perfect_match(solution.formula()) {
            let mut hall = self.hall_of_fame.write().unwrap();
            hall.insert(solution.clone());
            while hall.len() > HALL_OF_FAME_SIZE {
                hall.pop_first();
            }
            self.set_done();
        } else if rate > ALMOST_PERFECT {
            let mut hall = self.hall_of_fame.write().unwrap();
            hall.insert(solution.clone());
            if hall.len() >= HALL_OF_FAME_SIZE {
                self.set_done();
            }
            while hall.len() > HALL_OF_FAME_SIZE {
                hall.pop_first();
            }
        }

        let mut solutions = self.solutions.write().unwrap();
        solutions.insert(solution);
        if solutions.len() > SOLUTIONS_CAPACITY {
            Self::shrink_locked(&mut solutions);
        }
    }

    /// Mild intervention: keep only the best and refill with fresh random trees.
    pub(crate) fn inject_randomness(&self, producer: &mut OperationProducer) {
        let mut solutions = self.solutions.write().unwrap();
        let Some(best) = solutions.iter().next_back().cloned() else {
            return;
        };
        solutions.clear();
        solutions.insert(best);

        for _ in 0..RANDOM_INJECTION_COUNT {
            let Some(node) = producer.produce(&self.variables) else {
                continue;
            };
            let formula = Formula::new(node, self.variables.clone());
            let rate = self.rate_formula(&formula);
            solutions.insert(Solution::new(formula, ChangerKind::Flipper, rate));
        }
        Self::shrink_locked(&mut solutions);
    }

    /// Aggressive intervention: keep the top three and regenerate variants
    /// through the creative changer subset.
    fn inject_creative_randomness(&self, mutator: &mut Mutator) {
        let mut solutions = self.solutions.write().unwrap();
        let top: Vec<Solution> = solutions.iter().rev().take(3).cloned().collect();
        if top.is_empty() {
            return;
        }
        solutions.clear();
        for solution in &top {
            solutions.insert(solution.clone());
        }
        for base in &top {
            for kind in CREATIVE_VARIANTS {
                let Ok(formula) = mutator.apply(kind, base.formula()) else {
                    continue;
                };
                let rate = self.rate_formula(&formula);
                solutions.insert(Solution::new(formula, kind, rate));
            }
        }
        Self::shrink_locked(&mut solutions);
    }

    fn rate_formula(&self, formula: &Formula) -> f64 {
        evaluation::rate(self.fitness, formula, &self.input, &self.expected)
    }

    /// Whether every row's prediction lands within [EPSILON] of the expectation.
    pub fn is_perfect_match(&self, formula: &Formula) -> bool {
        if self.input.len() != self.expected.len() || self.expected.is_empty() {
            return false;
        }
        for (row, expected_row) in self.input.iter().zip(&self.expected) {
            let Some(expected_value) = expected_row.first() else {
                return false;
            };
            let Some(current) = evaluation::predict(formula, row) else {
                return false;
            };
            if (expected_value - current).abs() >= EPSILON {
                return false;
            }
        }
        true
    }

    fn best_rate(&self) -> f64 {
        let solutions = self.solutions.read().unwrap();
        solutions.iter().next_back().map_or(0.0, Solution::rate)
    }

    /// The best pool entry, if any.
    pub fn best(&self) -> Option<Solution> {
        let solutions = self.solutions.read().unwrap();
        solutions.iter().next_back().cloned()
    }

    /// A snapshot of the hall of fame, best first.
    pub fn hall_of_fame(&self) -> Vec<Solution> {
        let hall = self.hall_of_fame.read().unwrap();
        hall.iter().rev().cloned().collect()
    }

    /// A snapshot of the pool, best first.
    pub fn pool(&self) -> Vec<Solution> {
        let solutions = self.solutions.read().unwrap();
        solutions.iter().rev().cloned().collect()
    }

    fn find_perfect_member(&self) -> Option<Solution> {
        let solutions = self.solutions.read().unwrap();
        solutions
            .iter()
            .rev()
            .find(|solution| self.is_perfect_match(solution.formula()))
            .cloned()
    }

    /// Prune the pool down to its capacity.
    pub fn shrink(&self) {
        let mut solutions = self.solutions.write().unwrap();
        Self::shrink_locked(&mut solutions);
    }

    fn shrink_locked(solutions: &mut BTreeSet<Solution>) {
        while solutions.len() > SOLUTIONS_CAPACITY {
            solutions.pop_first();
        }
    }

    /// Print the hall of fame and the top of the pool.
    pub fn print(&self) {
        print_solution_table("Matches:", &self.display_rows(&self.hall_of_fame()));
        print_solution_table("Previous intentions:", &self.display_rows(&self.pool()));
    }

    fn display_rows(&self, solutions: &[Solution]) -> Vec<DisplayRow> {
        solutions
            .iter()
            .map(|solution| DisplayRow {
                text: solution.text().to_string(),
                code: solution.formula().to_code(),
                rate: solution.rate(),
                perfect: self.is_perfect_match(solution.formula()),
            })
            .collect()
    }
}
