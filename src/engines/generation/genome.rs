//! Fixed-shape strategy genome.
//!
//! A genome holds the eight parameters of the regime-aware scoring strategy. Operators
//! that need to pick "a random gene" iterate [`Gene::ALL`] instead of inspecting field
//! names, and dispatch on [`GeneKind`] to decide how the chosen gene may move.
//!
//! Serialized as a flat JSON object keyed by gene name, which is also the persisted
//! format of the best genome.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub w_trend: f64,
    pub w_mean_rev: f64,
    pub w_vol: f64,
    pub rsi_period: usize,
    pub buy_thresh: f64,
    pub sell_thresh: f64,
    pub sl_multiplier: f64,
    pub tp_multiplier: f64,
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            w_trend: 0.5,
            w_mean_rev: 0.5,
            w_vol: 0.5,
            rsi_period: 14,
            buy_thresh: 0.2,
            sell_thresh: 0.2,
            sl_multiplier: 2.0,
            tp_multiplier: 3.0,
        }
    }
}

/// How a gene is allowed to move under mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneKind {
    /// Weights and thresholds: continuous, clamped to a closed interval.
    Unit,
    /// Integer lookback: discrete steps, clamped to integer bounds.
    Period,
    /// Stop/target distance in ATR units: continuous, clamped to a floor.
    Multiplier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gene {
    WTrend,
    WMeanRev,
    WVol,
    RsiPeriod,
    BuyThresh,
    SellThresh,
    SlMultiplier,
    TpMultiplier,
}

impl Gene {
    pub const ALL: [Gene; 8] = [
        Gene::WTrend,
        Gene::WMeanRev,
        Gene::WVol,
        Gene::RsiPeriod,
        Gene::BuyThresh,
        Gene::SellThresh,
        Gene::SlMultiplier,
        Gene::TpMultiplier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Gene::WTrend => "w_trend",
            Gene::WMeanRev => "w_mean_rev",
            Gene::WVol => "w_vol",
            Gene::RsiPeriod => "rsi_period",
            Gene::BuyThresh => "buy_thresh",
            Gene::SellThresh => "sell_thresh",
            Gene::SlMultiplier => "sl_multiplier",
            Gene::TpMultiplier => "tp_multiplier",
        }
    }

    pub fn kind(&self) -> GeneKind {
        match self {
            Gene::RsiPeriod => GeneKind::Period,
            Gene::SlMultiplier | Gene::TpMultiplier => GeneKind::Multiplier,
            _ => GeneKind::Unit,
        }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Genome {
    pub fn get(&self, gene: Gene) -> f64 {
        match gene {
            Gene::WTrend => self.w_trend,
            Gene::WMeanRev => self.w_mean_rev,
            Gene::WVol => self.w_vol,
            Gene::RsiPeriod => self.rsi_period as f64,
            Gene::BuyThresh => self.buy_thresh,
            Gene::SellThresh => self.sell_thresh,
            Gene::SlMultiplier => self.sl_multiplier,
            Gene::TpMultiplier => self.tp_multiplier,
        }
    }

    /// Set a gene; period values are rounded to the nearest integer, never below 1.
    pub fn set(&mut self, gene: Gene, value: f64) {
        match gene {
            Gene::WTrend => self.w_trend = value,
            Gene::WMeanRev => self.w_mean_rev = value,
            Gene::WVol => self.w_vol = value,
            Gene::RsiPeriod => self.rsi_period = value.round().max(1.0) as usize,
            Gene::BuyThresh => self.buy_thresh = value,
            Gene::SellThresh => self.sell_thresh = value,
            Gene::SlMultiplier => self.sl_multiplier = value,
            Gene::TpMultiplier => self.tp_multiplier = value,
        }
    }

    /// Take-profit distance per unit of stop-loss distance.
    pub fn risk_ratio(&self) -> f64 {
        self.tp_multiplier / self.sl_multiplier
    }

    pub fn satisfies_skew(&self, factor: f64) -> bool {
        self.tp_multiplier >= factor * self.sl_multiplier
    }

    pub fn iter(&self) -> impl Iterator<Item = (Gene, f64)> + '_ {
        Gene::ALL.iter().map(move |&gene| (gene, self.get(gene)))
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(gene, value)| match gene.kind() {
                GeneKind::Period => format!("{}={}", gene, value),
                _ => format!("{}={:.3}", gene, value),
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}
