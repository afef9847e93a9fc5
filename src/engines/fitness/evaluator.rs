use super::{Evaluation, FitnessFunction};
use crate::config::FitnessConfig;
use crate::data::FeatureSeries;
use crate::engines::evaluation::{BacktestOutcome, Backtester};
use crate::engines::generation::genome::Genome;
use crate::types::BacktestSummary;
use std::sync::Arc;

/// Scores a single backtest outcome.
///
/// A completed run scores `sharpe_w * sharpe + return_w * total_return -
/// drawdown_w * |max_drawdown|`; a rejected run scores the configured rejection score.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig) -> Self {
        Self { config }
    }

    pub fn score_summary(&self, summary: &BacktestSummary) -> f64 {
        self.config.sharpe_weight * summary.sharpe
            + self.config.return_weight * summary.total_return
            - self.config.drawdown_weight * summary.max_drawdown.abs()
    }

    pub fn score(&self, outcome: &BacktestOutcome) -> f64 {
        match outcome.summary() {
            Some(summary) => self.score_summary(summary),
            None => self.config.rejection_score,
        }
    }

    pub fn rejection_score(&self) -> f64 {
        self.config.rejection_score
    }
}

/// Fitness against one asset.
pub struct SingleAssetFitness {
    backtester: Arc<Backtester>,
    series: Arc<FeatureSeries>,
    evaluator: FitnessEvaluator,
}

impl SingleAssetFitness {
    pub fn new(backtester: Arc<Backtester>, series: Arc<FeatureSeries>, evaluator: FitnessEvaluator) -> Self {
        Self {
            backtester,
            series,
            evaluator,
        }
    }
}

impl FitnessFunction for SingleAssetFitness {
    fn evaluate(&self, genome: &Genome) -> Evaluation {
        let outcome = self.backtester.run(&self.series, genome);
        Evaluation {
            score: self.evaluator.score(&outcome),
            viable: !outcome.is_rejected(),
        }
    }

    fn assets(&self) -> Vec<String> {
        vec![self.series.asset().to_string()]
    }
}
