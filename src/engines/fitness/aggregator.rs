use super::{Evaluation, FitnessFunction};
use crate::config::AggregationConfig;
use crate::data::FeatureSeries;
use crate::engines::evaluation::{BacktestOutcome, Backtester};
use crate::engines::generation::genome::Genome;
use std::sync::Arc;

/// One asset's share of a multi-asset score.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetContribution {
    pub asset: String,
    pub outcome: BacktestOutcome,
    pub score: f64,
}

/// Soft-mode multi-asset fitness: every asset adds its Sharpe ratio minus penalties,
/// and a failure on one asset lowers the total instead of eliminating the genome.
pub struct MultiAssetAggregator {
    backtester: Arc<Backtester>,
    assets: Vec<Arc<FeatureSeries>>,
    config: AggregationConfig,
}

impl MultiAssetAggregator {
    pub fn new(backtester: Arc<Backtester>, assets: Vec<Arc<FeatureSeries>>, config: AggregationConfig) -> Self {
        Self {
            backtester,
            assets,
            config,
        }
    }

    /// Additive contribution of one asset's outcome.
    pub fn contribution(&self, outcome: &BacktestOutcome) -> f64 {
        let summary = match outcome.summary() {
            Some(summary) => summary,
            None => return self.config.rejection_penalty,
        };

        let mut score = summary.sharpe;
        if summary.total_return < 0.0 {
            score += self.config.losing_penalty;
        }
        if summary.max_drawdown_pct() < self.config.drawdown_floor_pct {
            score += self.config.drawdown_penalty;
        }
        if summary.trades < self.config.min_trades {
            score += self.config.low_trade_penalty;
        }
        score
    }

    /// Per-asset breakdown, in asset order.
    pub fn breakdown(&self, genome: &Genome) -> Vec<AssetContribution> {
        self.assets
            .iter()
            .map(|series| {
                let outcome = self.backtester.run(series, genome);
                let score = self.contribution(&outcome);
                AssetContribution {
                    asset: series.asset().to_string(),
                    outcome,
                    score,
                }
            })
            .collect()
    }

    pub fn total(contributions: &[AssetContribution]) -> Evaluation {
        Evaluation {
            score: contributions.iter().map(|c| c.score).sum(),
            viable: contributions.iter().any(|c| !c.outcome.is_rejected()),
        }
    }
}

impl FitnessFunction for MultiAssetAggregator {
    fn evaluate(&self, genome: &Genome) -> Evaluation {
        Self::total(&self.breakdown(genome))
    }

    fn assets(&self) -> Vec<String> {
        self.assets.iter().map(|s| s.asset().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::engines::evaluation::BacktestResult;
    use crate::types::BacktestSummary;

    fn aggregator() -> MultiAssetAggregator {
        MultiAssetAggregator::new(
            Arc::new(Backtester::new(SimulationConfig::default())),
            vec![],
            AggregationConfig::default(),
        )
    }

    fn completed(sharpe: f64, total_return: f64, max_drawdown: f64, trades: usize) -> BacktestOutcome {
        BacktestOutcome::Completed(BacktestResult {
            equity_curve: vec![],
            trades: vec![],
            summary: BacktestSummary {
                final_balance: 1000.0,
                total_return,
                max_drawdown,
                trades,
                sharpe,
            },
        })
    }

    fn contribution(asset: &str, outcome: BacktestOutcome, agg: &MultiAssetAggregator) -> AssetContribution {
        let score = agg.contribution(&outcome);
        AssetContribution {
            asset: asset.to_string(),
            outcome,
            score,
        }
    }

    #[test]
    fn test_one_rejection_two_healthy_assets() {
        let agg = aggregator();
        let parts = vec![
            contribution("A", BacktestOutcome::Rejected { trades: 12 }, &agg),
            contribution("B", completed(1.0, 0.2, -0.1, 45), &agg),
            contribution("C", completed(1.5, 0.4, -0.2, 60), &agg),
        ];
        let total = MultiAssetAggregator::total(&parts);

        assert!((total.score - (-17.5)).abs() < 1e-12);
        assert!(total.viable);
    }

    #[test]
    fn test_penalties_stack() {
        let agg = aggregator();
        // losing, deep drawdown, lazy: 0.5 - 5 - 5 - 2
        let score = agg.contribution(&completed(0.5, -0.1, -0.4, 10));
        assert!((score - (-11.5)).abs() < 1e-12);
    }

    #[test]
    fn test_drawdown_within_floor_is_not_penalised() {
        let agg = aggregator();
        let score = agg.contribution(&completed(0.0, 0.1, -0.3, 40));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_all_rejected_is_not_viable() {
        let agg = aggregator();
        let parts = vec![
            contribution("A", BacktestOutcome::Rejected { trades: 0 }, &agg),
            contribution("B", BacktestOutcome::Rejected { trades: 1 }, &agg),
        ];
        let total = MultiAssetAggregator::total(&parts);

        assert_eq!(total.score, -40.0);
        assert!(!total.viable);
    }
}
