//! The changer catalog: every mutation that turns a formula into a neighbor.
//!
//! Each changer is a [ChangerKind] tag dispatched by [Mutator::apply]; all of
//! them leave the input formula untouched and return a new one. The per-worker
//! [Mutator] owns the randomness sources and the adaptive-mutation state.

pub mod adaptive;
pub mod numeric;
pub mod patterns;
pub mod structural;
pub mod tuning;

use crate::creation::producer::OperationProducer;
use crate::formula::Formula;
use crate::randomness::{Coin, NumberPicker, RandomCoin, UniformPicker};

use adaptive::AdaptiveState;

/// Discriminant tags of the changer catalog.
///
/// `Merger` tags solutions created by crossover; it is not applicable through
/// [Mutator::apply], as it needs two parents.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub enum ChangerKind {
    Flipper,
    IncrementorByOne,
    ReducerByOne,
    IncrementorByDoubling,
    ReducerByHalving,
    IncrementorByFragment,
    ReducerByFragment,
    NumberInserter,
    OperationReplacer,
    Purger,
    Merger,
    Simplifier,
    FunctionTransformer,
    VariableSwapper,
    StructureMutator,
    AdaptiveMutator,
    FilterRelationshipMutator,
    ExponentialPatternEnhancer,
    PowerRelationshipPromoter,
    PrecisionTuner,
    RangeOptimizer,
    NonlinearityInjector,
    TargetedTuner,
    PatternOptimizer,
}

impl ChangerKind {
    /// Every single-parent changer (everything except the crossover tag).
    pub const MUTATING: [ChangerKind; 23] = [
        ChangerKind::Flipper,
        ChangerKind::IncrementorByOne,
        ChangerKind::ReducerByOne,
        ChangerKind::IncrementorByDoubling,
        ChangerKind::ReducerByHalving,
        ChangerKind::IncrementorByFragment,
        ChangerKind::ReducerByFragment,
        ChangerKind::NumberInserter,
        ChangerKind::OperationReplacer,
        ChangerKind::Purger,
        ChangerKind::Simplifier,
        ChangerKind::FunctionTransformer,
        ChangerKind::VariableSwapper,
        ChangerKind::StructureMutator,
        ChangerKind::AdaptiveMutator,
        ChangerKind::FilterRelationshipMutator,
        ChangerKind::ExponentialPatternEnhancer,
        ChangerKind::PowerRelationshipPromoter,
        ChangerKind::PrecisionTuner,
        ChangerKind::RangeOptimizer,
        ChangerKind::NonlinearityInjector,
        ChangerKind::TargetedTuner,
        ChangerKind::PatternOptimizer,
    ];

    /// The "creative" subset used while the search is aggressively stagnated.
    pub const CREATIVE: [ChangerKind; 10] = [
        ChangerKind::TargetedTuner,
        ChangerKind::PatternOptimizer,
        ChangerKind::Simplifier,
        ChangerKind::FunctionTransformer,
        ChangerKind::VariableSwapper,
        ChangerKind::StructureMutator,
        ChangerKind::AdaptiveMutator,
        ChangerKind::FilterRelationshipMutator,
        ChangerKind::ExponentialPatternEnhancer,
        ChangerKind::PowerRelationshipPromoter,
    ];
}

/// Applies changers to formulas. One instance per worker thread: the coin, the
/// integer picker, the tree producer, and the adaptive state are all owned.
pub struct Mutator {
    pub(crate) coin: Box<dyn Coin>,
    pub(crate) picker: Box<dyn NumberPicker>,
    pub(crate) producer: OperationProducer,
    pub(crate) adaptive: AdaptiveState,
}

impl Mutator {
    pub fn new() -> Mutator {
        Self::with_parts(
            Box::new(RandomCoin::new()),
            Box::new(UniformPicker::new()),
            OperationProducer::new(),
        )
    }

    pub fn with_parts(
        coin: Box<dyn Coin>,
        picker: Box<dyn NumberPicker>,
        producer: OperationProducer,
    ) -> Mutator {
        Mutator {
            coin,
            picker,
            producer,
            adaptive: AdaptiveState::default(),
        }
    }

    /// Apply the changer with the given tag, producing a new formula.
    pub fn apply(&mut self, kind: ChangerKind, formula: &Formula) -> Result<Formula, String> {
        match kind {
            ChangerKind::Flipper => Ok(self.flip(formula)),
            ChangerKind::IncrementorByOne => Ok(self.increment_by_one(formula)),
            ChangerKind::ReducerByOne => Ok(self.reduce_by_one(formula)),
            ChangerKind::IncrementorByDoubling => Ok(self.increment_by_doubling(formula)),
            ChangerKind::ReducerByHalving => Ok(self.reduce_by_halving(formula)),
            ChangerKind::IncrementorByFragment => Ok(self.increment_by_fragment(formula)),
            ChangerKind::ReducerByFragment => Ok(self.reduce_by_fragment(formula)),
            ChangerKind::NumberInserter => Ok(self.insert_number(formula)),
            ChangerKind::OperationReplacer => Ok(self.replace_operations(formula)),
            ChangerKind::Purger => self.purge(formula),
            ChangerKind::Merger => Err("the merger needs two parent formulas".to_string()),
            ChangerKind::Simplifier => Ok(self.simplify_formula(formula)),
            ChangerKind::FunctionTransformer => Ok(self.transform_functions(formula)),
            ChangerKind::VariableSwapper => Ok(self.swap_variables(formula)),
            ChangerKind::StructureMutator => Ok(self.mutate_structure(formula)),
            ChangerKind::AdaptiveMutator => Ok(self.mutate_adaptively(formula)),
            ChangerKind::FilterRelationshipMutator => Ok(self.mutate_filter_relationships(formula)),
            ChangerKind::ExponentialPatternEnhancer => {
                Ok(self.enhance_exponential_patterns(formula))
            }
            ChangerKind::PowerRelationshipPromoter => Ok(self.promote_power_relationships(formula)),
            ChangerKind::PrecisionTuner => Ok(self.tune_precision(formula)),
            ChangerKind::RangeOptimizer => Ok(self.optimize_range(formula)),
            ChangerKind::NonlinearityInjector => Ok(self.inject_nonlinearity(formula)),
            ChangerKind::TargetedTuner => Ok(self.tune_targeted(formula)),
            ChangerKind::PatternOptimizer => Ok(self.optimize_patterns(formula)),
        }
    }

    /// Feed the best rate observed after an iteration into the adaptive state.
    pub fn report_progress(&mut self, best_rate: f64) {
        self.adaptive.observe(best_rate);
    }

    /// A uniformly random single-parent changer.
    pub fn pick_random(&mut self) -> ChangerKind {
        ChangerKind::MUTATING[self.pick_index(ChangerKind::MUTATING.len())]
    }

    /// A uniformly random changer from the creative subset.
    pub fn pick_creative(&mut self) -> ChangerKind {
        ChangerKind::CREATIVE[self.pick_index(ChangerKind::CREATIVE.len())]
    }

    /// Toss the mutator's coin (also used by the solver's picker decisions).
    pub fn toss(&mut self) -> bool {
        self.coin.toss()
    }

    /// A uniformly random index below `len`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        self.picker.pick(0, len as i32 - 1) as usize
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::node::Node;
    use crate::expression::operator_enums::BinaryOp;

    #[test]
    /// Every tag is distinct and the catalog tables are consistent.
    fn test_tags() {
        let mut seen = std::collections::HashSet::new();
        for kind in ChangerKind::MUTATING {
            assert!(seen.insert(kind));
        }
        assert!(seen.insert(ChangerKind::Merger));
        for kind in ChangerKind::CREATIVE {
            assert!(seen.contains(&kind));
        }
    }

    #[test]
    /// The merger tag cannot be applied as a single-parent changer.
    fn test_merger_not_applicable() {
        let formula = Formula::new(
            Node::mk_binary(Node::mk_variable("x"), Node::mk_number(1.0), BinaryOp::Add),
            vec!["x".to_string()],
        );
        let mut mutator = Mutator::new();
        assert!(mutator.apply(ChangerKind::Merger, &formula).is_err());
    }

    #[test]
    /// No changer introduces variables beyond the formula's declarations.
    fn test_no_new_variables() {
        let formula = Formula::new(
            Node::mk_binary(
                Node::mk_binary(Node::mk_variable("x"), Node::mk_variable("y"), BinaryOp::Mul),
                Node::mk_number(3.0),
                BinaryOp::Add,
            ),
            vec!["x".to_string(), "y".to_string()],
        );
        let mut mutator = Mutator::new();
        for kind in ChangerKind::MUTATING {
            let changed = mutator.apply(kind, &formula).unwrap();
            for name in changed.root().variable_names() {
                assert!(
                    changed.variables().contains(&name),
                    "{kind:?} produced unknown variable {name}"
                );
            }
        }
    }
}
