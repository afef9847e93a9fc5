use crate::error::{EvolverError, Result};
use crate::functions::indicators::{realized_volatility, sma};
use polars::df;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const FAST_WINDOW: usize = 20;
pub const SLOW_WINDOW: usize = 50;
/// Longest rolling window; bars before it is full never trade.
pub const REGIME_WINDOW: usize = 200;
pub const VOLATILITY_WINDOW: usize = 20;
pub const TRADING_DAYS: f64 = 252.0;

/// One time-ordered row of the feature table.
///
/// Rolling fields are `None` until their window is full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBar {
    pub timestamp: String,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub sma_regime: Option<f64>,
    pub volatility: Option<f64>,
    /// close x volatility
    pub atr: Option<f64>,
}

impl FeatureBar {
    pub fn is_warm(&self) -> bool {
        self.sma_regime.is_some()
    }
}

/// Immutable per-asset feature table, built once and shared read-only by every
/// evaluation (wrap in `Arc` to share across threads).
#[derive(Debug, Clone)]
pub struct FeatureSeries {
    asset: String,
    bars: Vec<FeatureBar>,
    closes: Vec<f64>,
}

impl FeatureSeries {
    /// Derive every indicator from closing prices alone.
    pub fn from_closes(asset: &str, timestamps: Vec<String>, closes: Vec<f64>) -> Result<Self> {
        Self::from_columns(asset, timestamps, closes, None)
    }

    /// Build a series labelled by bar index, mostly useful for synthetic data.
    pub fn from_closes_indexed(asset: &str, closes: Vec<f64>) -> Result<Self> {
        let timestamps = (0..closes.len()).map(|i| format!("bar-{:05}", i)).collect();
        Self::from_closes(asset, timestamps, closes)
    }

    /// Build from a close column plus an optional precomputed volatility column.
    ///
    /// Moving averages and the ATR proxy are always derived from `closes`; volatility is
    /// derived too when not supplied.
    pub fn from_columns(
        asset: &str,
        timestamps: Vec<String>,
        closes: Vec<f64>,
        volatility: Option<Vec<Option<f64>>>,
    ) -> Result<Self> {
        Self::validate(asset, &timestamps, &closes, volatility.as_deref())?;

        let table = Self::derive_indicators(&closes, volatility)?;
        let sma_fast = float_column(&table, "sma_fast")?;
        let sma_slow = float_column(&table, "sma_slow")?;
        let sma_regime = float_column(&table, "sma_regime")?;
        let volatility = float_column(&table, "volatility")?;

        let bars = timestamps
            .into_iter()
            .enumerate()
            .map(|(i, timestamp)| {
                let close = closes[i];
                let vol = volatility[i].filter(|v| v.is_finite());
                FeatureBar {
                    timestamp,
                    close,
                    sma_fast: sma_fast[i],
                    sma_slow: sma_slow[i],
                    sma_regime: sma_regime[i],
                    volatility: vol,
                    atr: vol.map(|v| close * v),
                }
            })
            .collect();

        log::debug!("Built feature series for {} ({} bars)", asset, closes.len());

        Ok(Self {
            asset: asset.to_string(),
            bars,
            closes,
        })
    }

    /// Rolling columns computed in one lazy pass over the close column. A supplied
    /// volatility column is carried through untouched.
    fn derive_indicators(closes: &[f64], volatility: Option<Vec<Option<f64>>>) -> Result<DataFrame> {
        let close = col("close");
        let mut exprs = vec![
            sma(close.clone(), FAST_WINDOW).alias("sma_fast"),
            sma(close.clone(), SLOW_WINDOW).alias("sma_slow"),
            sma(close.clone(), REGIME_WINDOW).alias("sma_regime"),
        ];

        let frame = match volatility {
            Some(vol) => df! { "close" => closes.to_vec(), "volatility" => vol }?,
            None => {
                exprs.push(
                    realized_volatility(close, VOLATILITY_WINDOW, TRADING_DAYS).alias("volatility"),
                );
                df! { "close" => closes.to_vec() }?
            }
        };

        Ok(frame.lazy().with_columns(exprs).collect()?)
    }

    fn validate(
        asset: &str,
        timestamps: &[String],
        closes: &[f64],
        volatility: Option<&[Option<f64>]>,
    ) -> Result<()> {
        if closes.len() < REGIME_WINDOW {
            return Err(EvolverError::data_unavailable(
                asset,
                format!(
                    "{} bars of history, at least {} required",
                    closes.len(),
                    REGIME_WINDOW
                ),
            ));
        }
        if timestamps.len() != closes.len() {
            return Err(EvolverError::data_unavailable(
                asset,
                format!(
                    "{} timestamps for {} closes",
                    timestamps.len(),
                    closes.len()
                ),
            ));
        }
        if let Some(vol) = volatility {
            if vol.len() != closes.len() {
                return Err(EvolverError::data_unavailable(
                    asset,
                    format!("{} volatility rows for {} closes", vol.len(), closes.len()),
                ));
            }
        }
        if let Some(i) = closes.iter().position(|c| !c.is_finite() || *c <= 0.0) {
            return Err(EvolverError::data_unavailable(
                asset,
                format!("invalid close {} at row {}", closes[i], i),
            ));
        }
        Ok(())
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn bars(&self) -> &[FeatureBar] {
        &self.bars
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short_series_is_rejected() {
        let err = FeatureSeries::from_closes_indexed("SHORT", vec![100.0; 199]).unwrap_err();
        assert!(matches!(err, EvolverError::DataUnavailable { .. }));
    }

    #[test]
    fn test_warmup_bars_have_no_regime_average() {
        let series = FeatureSeries::from_closes_indexed("FLAT", vec![100.0; 250]).unwrap();

        assert!(!series.bars()[198].is_warm());
        assert!(series.bars()[199].is_warm());
        assert_eq!(series.bars()[199].sma_regime, Some(100.0));
        assert_eq!(series.bars()[249].atr, Some(0.0));
    }

    #[test]
    fn test_non_positive_close_is_rejected() {
        let mut closes = vec![100.0; 250];
        closes[10] = 0.0;
        assert!(FeatureSeries::from_closes_indexed("BAD", closes).is_err());
    }

    #[test]
    fn test_supplied_volatility_is_used() {
        let closes = vec![100.0; 210];
        let vol = vec![Some(0.5); 210];
        let series =
            FeatureSeries::from_columns("VOL", (0..210).map(|i| i.to_string()).collect(), closes, Some(vol))
                .unwrap();

        assert_eq!(series.bars()[0].volatility, Some(0.5));
        assert_eq!(series.bars()[0].atr, Some(50.0));
    }
}
