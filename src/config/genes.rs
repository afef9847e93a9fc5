use super::traits::{invalid, ConfigSection};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Integer interval `[min, max]` for period genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    pub min: usize,
    pub max: usize,
}

impl PeriodBounds {
    pub fn clamp(&self, value: i64) -> usize {
        value.max(self.min as i64).min(self.max as i64) as usize
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneConfig {
    pub init: InitialRanges,
    pub mutation: MutationBounds,
    pub skew: SkewConfig,
}

/// Ranges genomes are drawn from at initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialRanges {
    pub w_trend: Bounds,
    pub w_mean_rev: Bounds,
    pub w_vol: Bounds,
    pub rsi_period: PeriodBounds,
    pub buy_thresh: Bounds,
    pub sell_thresh: Bounds,
    pub sl_multiplier: Bounds,
    /// Take-profit is drawn as `sl_multiplier * ratio`.
    pub tp_ratio: Bounds,
}

impl Default for InitialRanges {
    fn default() -> Self {
        Self {
            w_trend: Bounds::new(0.1, 1.0),
            w_mean_rev: Bounds::new(0.1, 1.0),
            w_vol: Bounds::new(0.1, 1.0),
            rsi_period: PeriodBounds { min: 5, max: 20 },
            buy_thresh: Bounds::new(0.05, 0.3),
            sell_thresh: Bounds::new(0.05, 0.3),
            sl_multiplier: Bounds::new(2.0, 5.0),
            tp_ratio: Bounds::new(1.2, 4.0),
        }
    }
}

/// Step sizes and clamps applied by the mutation operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationBounds {
    /// Clamp for weights and thresholds.
    pub unit: Bounds,
    pub unit_delta: f64,
    pub period: PeriodBounds,
    pub period_step: usize,
    pub multiplier_floor: f64,
    pub multiplier_delta: f64,
}

impl Default for MutationBounds {
    fn default() -> Self {
        Self {
            unit: Bounds::new(0.05, 1.0),
            unit_delta: 0.1,
            period: PeriodBounds { min: 4, max: 25 },
            period_step: 2,
            multiplier_floor: 1.5,
            multiplier_delta: 0.5,
        }
    }
}

/// Reward/risk constraint: `tp_multiplier >= factor * sl_multiplier`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewConfig {
    pub factor: f64,
    /// A violating genome gets `tp = sl * r` with `r` drawn from this range.
    pub repair_ratio: Bounds,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            factor: 1.1,
            repair_ratio: Bounds::new(1.5, 1.5),
        }
    }
}

impl ConfigSection for GeneConfig {
    fn section_name() -> &'static str {
        "genes"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        let init = &self.init;
        let ranges = [
            ("init.w_trend", init.w_trend),
            ("init.w_mean_rev", init.w_mean_rev),
            ("init.w_vol", init.w_vol),
            ("init.buy_thresh", init.buy_thresh),
            ("init.sell_thresh", init.sell_thresh),
            ("init.sl_multiplier", init.sl_multiplier),
            ("init.tp_ratio", init.tp_ratio),
            ("mutation.unit", self.mutation.unit),
            ("skew.repair_ratio", self.skew.repair_ratio),
        ];
        for (name, bounds) in ranges {
            if !bounds.is_valid() {
                return Err(invalid(
                    section,
                    format!("{} must satisfy min <= max, got [{}, {}]", name, bounds.min, bounds.max),
                ));
            }
        }

        for (name, period) in [("init.rsi_period", init.rsi_period), ("mutation.period", self.mutation.period)] {
            if period.min == 0 || period.min > period.max {
                return Err(invalid(
                    section,
                    format!("{} must satisfy 1 <= min <= max, got [{}, {}]", name, period.min, period.max),
                ));
            }
        }

        let mutation = &self.mutation;
        for (name, delta) in [
            ("mutation.unit_delta", mutation.unit_delta),
            ("mutation.multiplier_delta", mutation.multiplier_delta),
        ] {
            if !delta.is_finite() || delta < 0.0 {
                return Err(invalid(
                    section,
                    format!("{} must be finite and non-negative, got {}", name, delta),
                ));
            }
        }
        if mutation.period_step == 0 {
            return Err(invalid(section, "mutation.period_step must be at least 1"));
        }

        if init.sl_multiplier.min <= 0.0 || self.mutation.multiplier_floor <= 0.0 {
            return Err(invalid(section, "stop-loss multipliers must be positive"));
        }
        if self.skew.factor <= 0.0 {
            return Err(invalid(section, "skew.factor must be positive"));
        }
        if self.skew.repair_ratio.min < self.skew.factor {
            return Err(invalid(
                section,
                format!(
                    "skew.repair_ratio.min ({}) must be >= skew.factor ({}) or repair cannot restore the constraint",
                    self.skew.repair_ratio.min, self.skew.factor
                ),
            ));
        }
        Ok(())
    }
}
