//! Turning backtests into a single score the search can rank.

pub mod aggregator;
pub mod evaluator;

pub use aggregator::{AssetContribution, MultiAssetAggregator};
pub use evaluator::{FitnessEvaluator, SingleAssetFitness};

use crate::engines::generation::genome::Genome;

/// Score of one genome plus whether any backtest behind it was usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub viable: bool,
}

/// Anything that can score a genome.
///
/// Implementations must be pure with respect to the genome: the search loop calls
/// `evaluate` from several worker threads at once and relies on the same genome always
/// getting the same score.
pub trait FitnessFunction: Send + Sync {
    fn evaluate(&self, genome: &Genome) -> Evaluation;

    /// Asset names covered by this function, for logs and run records.
    fn assets(&self) -> Vec<String>;
}
