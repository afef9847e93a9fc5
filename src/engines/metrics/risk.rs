// src/engines/metrics/risk.rs
use crate::functions::indicators::volatility::sample_std;

/// Sharpe reported when returns have no variance (or too few points to measure it).
pub const DEGENERATE_SHARPE: f64 = -1.0;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Most negative peak-to-trough decline, as a fraction (`-0.2` for 20%).
    pub fn max_drawdown(equity: &[f64]) -> f64 {
        let mut max_dd: f64 = 0.0;
        let mut peak = match equity.first() {
            Some(&first) => first,
            None => return 0.0,
        };

        for &value in equity {
            if value > peak {
                peak = value;
            }
            if peak > 0.0 {
                max_dd = max_dd.min((value - peak) / peak);
            }
        }

        max_dd
    }

    /// Bar-over-bar percentage changes.
    pub fn calculate_returns(equity: &[f64]) -> Vec<f64> {
        equity
            .windows(2)
            .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
            .collect()
    }

    /// Annualized Sharpe ratio with a zero risk-free rate:
    /// `mean * periods / (std * sqrt(periods))`, sample std.
    pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
        if returns.len() < 2 {
            return DEGENERATE_SHARPE;
        }
        let std = sample_std(returns);
        if std == 0.0 || !std.is_finite() {
            return DEGENERATE_SHARPE;
        }
        let mean = returns.iter().sum::<f64>() / returns.len() as f64;
        (mean * periods_per_year) / (std * periods_per_year.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_drawdown() {
        let equity = [100.0, 120.0, 90.0, 130.0, 117.0];
        assert!((RiskMetrics::max_drawdown(&equity) - (-0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_max_drawdown_monotonic_is_zero() {
        assert_eq!(RiskMetrics::max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(RiskMetrics::max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_flat_equity_sharpe_convention() {
        let returns = RiskMetrics::calculate_returns(&[1000.0; 50]);
        assert_eq!(RiskMetrics::sharpe_ratio(&returns, 252.0), DEGENERATE_SHARPE);
        assert_eq!(RiskMetrics::sharpe_ratio(&[0.01], 252.0), DEGENERATE_SHARPE);
    }

    #[test]
    fn test_sharpe_value() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        let mean: f64 = 0.005;
        let std = sample_std(&returns);
        let expected = mean * 252.0 / (std * 252f64.sqrt());
        let sharpe = RiskMetrics::sharpe_ratio(&returns, 252.0);

        assert!((sharpe - expected).abs() < 1e-12);
        assert!(sharpe.is_finite());
    }
}
