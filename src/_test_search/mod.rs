/// **(internal)** End-to-end search scenarios: known closed forms must be
/// recovered and the termination conditions must fire.
mod _test_scenarios;

/// **(internal)** Structural invariants of formulas, the crossover, and the
/// solution ordering.
mod _test_invariants;
