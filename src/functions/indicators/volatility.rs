use polars::prelude::*;

/// Natural log returns; the first row is null.
pub fn log_returns(close: Expr) -> Expr {
    (close.clone() / close.shift(lit(1))).log(lit(std::f64::consts::E))
}

/// Rolling sample standard deviation (n - 1 denominator), null until `window`
/// non-null values are in the window.
pub fn rolling_std(series: Expr, window: usize) -> Expr {
    series.rolling_std(RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    })
}

/// Annualized realized volatility: rolling std of log returns scaled by
/// `sqrt(periods_per_year)`.
pub fn realized_volatility(close: Expr, window: usize, periods_per_year: f64) -> Expr {
    rolling_std(log_returns(close), window) * lit(periods_per_year.sqrt())
}

/// Sample standard deviation of a plain slice; 0 for fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
