use super::traits::{invalid, ConfigSection};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_balance: f64,
    /// Runs with fewer completed trades are rejected as statistically unusable.
    pub min_trades: usize,
    /// Realized volatility above this reads as a bearish volatility signal.
    pub volatility_threshold: f64,
    /// Minimum raw score required to enter while price is at or below the regime average.
    pub regime_override: f64,
    pub periods_per_year: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
            min_trades: 40,
            volatility_threshold: 0.04,
            regime_override: 0.3,
            periods_per_year: 252.0,
        }
    }
}

impl ConfigSection for SimulationConfig {
    fn section_name() -> &'static str {
        "simulation"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        if !(self.initial_balance > 0.0) {
            return Err(invalid(section, "initial_balance must be positive"));
        }
        if self.min_trades == 0 {
            return Err(invalid(section, "min_trades must be at least 1"));
        }
        if !(self.periods_per_year > 0.0) {
            return Err(invalid(section, "periods_per_year must be positive"));
        }
        if !self.volatility_threshold.is_finite() || !self.regime_override.is_finite() {
            return Err(invalid(section, "thresholds must be finite"));
        }
        Ok(())
    }
}
