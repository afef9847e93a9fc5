use super::traits::{invalid, ConfigSection};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};

/// Highest accepted `rejection_score`. Real runs lose at most the full balance and the
/// full drawdown, so only a Sharpe far below any observed value could sink under it.
pub const REJECTION_SCORE_CEILING: f64 = -100.0;

/// Weights of the single-asset score `sharpe + return - drawdown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub sharpe_weight: f64,
    pub return_weight: f64,
    pub drawdown_weight: f64,
    /// Score given to rejected runs; at most [`REJECTION_SCORE_CEILING`].
    pub rejection_score: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            sharpe_weight: 1.0,
            return_weight: 1.5,
            drawdown_weight: 8.0,
            rejection_score: -999.0,
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        if self.drawdown_weight < 0.0 {
            return Err(invalid(section, "drawdown_weight must not be negative"));
        }
        if !self.rejection_score.is_finite() || self.rejection_score > REJECTION_SCORE_CEILING {
            return Err(invalid(
                section,
                format!(
                    "rejection_score must be finite and <= {}, got {}",
                    REJECTION_SCORE_CEILING, self.rejection_score
                ),
            ));
        }
        Ok(())
    }
}

/// Per-asset soft penalties used when scoring across several assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub rejection_penalty: f64,
    pub losing_penalty: f64,
    /// Drawdown floor in percent, e.g. `-35.0`.
    pub drawdown_floor_pct: f64,
    pub drawdown_penalty: f64,
    pub min_trades: usize,
    pub low_trade_penalty: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            rejection_penalty: -20.0,
            losing_penalty: -5.0,
            drawdown_floor_pct: -35.0,
            drawdown_penalty: -5.0,
            min_trades: 30,
            low_trade_penalty: -2.0,
        }
    }
}

impl ConfigSection for AggregationConfig {
    fn section_name() -> &'static str {
        "aggregation"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        let penalties = [
            ("rejection_penalty", self.rejection_penalty),
            ("losing_penalty", self.losing_penalty),
            ("drawdown_penalty", self.drawdown_penalty),
            ("low_trade_penalty", self.low_trade_penalty),
        ];
        for (name, value) in penalties {
            if value > 0.0 || !value.is_finite() {
                return Err(invalid(section, format!("{} must be a finite value <= 0, got {}", name, value)));
            }
        }
        if self.drawdown_floor_pct > 0.0 {
            return Err(invalid(section, "drawdown_floor_pct is a negative percentage"));
        }
        Ok(())
    }
}
