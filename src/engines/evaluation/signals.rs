use crate::data::features::FeatureSeries;
use crate::engines::generation::genome::Genome;
use crate::functions::indicators::rsi;

/// +1 when the fast average is above the slow one, otherwise -1 (ties and warmup
/// included).
pub fn trend_signal(sma_fast: Option<f64>, sma_slow: Option<f64>) -> f64 {
    match (sma_fast, sma_slow) {
        (Some(fast), Some(slow)) if fast > slow => 1.0,
        _ => -1.0,
    }
}

/// Maps RSI onto roughly [-1, 1]: oversold is positive.
pub fn rsi_signal(rsi: f64) -> f64 {
    (50.0 - rsi) / 50.0
}

/// +1 in calm markets, -1 when realized volatility exceeds `threshold`.
pub fn vol_signal(volatility: Option<f64>, threshold: f64) -> f64 {
    match volatility {
        Some(v) if v > threshold => -1.0,
        _ => 1.0,
    }
}

/// Weighted composite score for every bar of `series`.
///
/// `None` where the genome's RSI window is not yet full; such bars neither open nor
/// signal-close a position.
pub fn raw_scores(series: &FeatureSeries, genome: &Genome, vol_threshold: f64) -> Vec<Option<f64>> {
    let rsi_values = rsi(series.closes(), genome.rsi_period);

    series
        .bars()
        .iter()
        .zip(rsi_values)
        .map(|(bar, rsi_value)| {
            rsi_value.map(|r| {
                genome.w_trend * trend_signal(bar.sma_fast, bar.sma_slow)
                    + genome.w_mean_rev * rsi_signal(r)
                    + genome.w_vol * vol_signal(bar.volatility, vol_threshold)
            })
        })
        .collect()
}
