// src/engines/metrics/engine.rs
use crate::engines::metrics::RiskMetrics;
use crate::types::BacktestSummary;

pub struct MetricsEngine {
    initial_balance: f64,
    periods_per_year: f64,
}

impl MetricsEngine {
    pub fn new(initial_balance: f64, periods_per_year: f64) -> Self {
        Self {
            initial_balance,
            periods_per_year,
        }
    }

    pub fn summarize(&self, equity_curve: &[f64], trades: usize) -> BacktestSummary {
        let final_balance = equity_curve.last().copied().unwrap_or(self.initial_balance);
        let returns = RiskMetrics::calculate_returns(equity_curve);

        BacktestSummary {
            final_balance,
            total_return: (final_balance - self.initial_balance) / self.initial_balance,
            max_drawdown: RiskMetrics::max_drawdown(equity_curve),
            trades,
            sharpe: RiskMetrics::sharpe_ratio(&returns, self.periods_per_year),
        }
    }
}
