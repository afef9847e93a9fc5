use polars::prelude::*;

/// Simple moving average over `period` rows; null until the window is full.
pub fn sma(series: Expr, period: usize) -> Expr {
    let options = RollingOptionsFixedWindow {
        window_size: period,
        min_periods: period,
        ..Default::default()
    };
    series.rolling_mean(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn run(closes: &[f64], period: usize) -> Vec<Option<f64>> {
        let df = df! { "close" => closes.to_vec() }.unwrap();
        let out = df
            .lazy()
            .select([sma(col("close"), period).alias("sma")])
            .collect()
            .unwrap();
        out.column("sma").unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_sma_warmup_and_values() {
        let out = run(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);

        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[4], Some(4.0));
    }

    #[test]
    fn test_sma_longer_than_series() {
        let out = run(&[1.0, 2.0], 5);
        assert!(out.iter().all(Option::is_none));
    }
}
