//! Indicator kernels.
//!
//! Whole-series indicators (moving averages, realized volatility) are polars expressions
//! evaluated once per asset at load. RSI depends on a gene, so it runs per evaluation over
//! a plain slice. Either way a bar before its window is full reads `None`/null.

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use momentum::rsi;
pub use trend::sma;
pub use volatility::{log_returns, realized_volatility, rolling_std};

/// Slice counterpart of the rolling expressions, used by per-evaluation kernels.
/// Apply `f` to every complete window of `values`, yielding `None` for warmup bars and for
/// windows that contain a missing value.
pub(crate) fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for end in window..=values.len() {
        buf.clear();
        buf.extend(values[end - window..end].iter().flatten().copied());
        if buf.len() == window {
            out[end - 1] = Some(f(&buf));
        }
    }
    out
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
