//! Randomized construction of fresh expression trees and the crossover operator.

pub mod merger;
pub mod producer;
