use crate::data::features::{FeatureSeries, REGIME_WINDOW};
use crate::error::{EvolverError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use super::{
    types::{FeatureColumn, SourceFormat},
    validator::DataValidator,
};

/// Reads persisted per-asset tables into [`FeatureSeries`].
pub struct FeatureLoader;

impl FeatureLoader {
    /// Load a CSV or Parquet file into a DataFrame, picking the reader by extension.
    pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(SourceFormat::from_extension)
            .ok_or_else(|| {
                EvolverError::Configuration(format!(
                    "Unsupported data file '{}': expected .csv or .parquet",
                    path.display()
                ))
            })?;

        let df = match format {
            SourceFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))?
                .finish()?,
            SourceFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
        };

        Ok(df)
    }

    /// Load, validate and derive the feature series for one asset.
    pub fn load<P: AsRef<Path>>(asset: &str, path: P) -> Result<FeatureSeries> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EvolverError::data_unavailable(
                asset,
                format!("missing data file {}", path.display()),
            ));
        }
        let df = Self::read_frame(path)?;
        Self::from_frame(asset, &df)
    }

    /// Build a feature series from an in-memory frame.
    pub fn from_frame(asset: &str, df: &DataFrame) -> Result<FeatureSeries> {
        let column_map = DataValidator::validate_features(df)?;
        DataValidator::validate_minimum_rows(df, asset, REGIME_WINDOW)?;

        let null_report = DataValidator::check_nulls(df)?;
        if !null_report.is_empty() {
            log::warn!("{}: null values detected: {:?}", asset, null_report);
        }

        let close_name = &column_map[&FeatureColumn::Close];
        let close = df.column(close_name)?.cast(&DataType::Float64)?;
        let mut closes = Vec::with_capacity(df.height());
        for (i, value) in close.f64()?.into_iter().enumerate() {
            match value {
                Some(v) => closes.push(v),
                None => {
                    return Err(EvolverError::data_unavailable(
                        asset,
                        format!("null close at row {}", i),
                    ))
                }
            }
        }

        let ts_name = &column_map[&FeatureColumn::Timestamp];
        let ts = df.column(ts_name)?.cast(&DataType::String)?;
        let timestamps: Vec<String> = ts
            .str()?
            .into_iter()
            .enumerate()
            .map(|(i, v)| v.map(str::to_string).unwrap_or_else(|| format!("row-{}", i)))
            .collect();

        let volatility = match column_map.get(&FeatureColumn::Volatility) {
            Some(name) => {
                let vol = df.column(name)?.cast(&DataType::Float64)?;
                Some(vol.f64()?.into_iter().collect::<Vec<Option<f64>>>())
            }
            None => None,
        };

        log::info!(
            "Loaded {} ({} rows, volatility {})",
            asset,
            closes.len(),
            if volatility.is_some() { "from file" } else { "derived" }
        );

        FeatureSeries::from_columns(asset, timestamps, closes, volatility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn frame(rows: usize) -> DataFrame {
        let dates: Vec<String> = (0..rows).map(|i| format!("2020-01-{:04}", i)).collect();
        let closes: Vec<f64> = (0..rows).map(|i| 100.0 + (i % 7) as f64).collect();
        df! {
            "Date" => dates,
            "Close" => closes,
        }
        .unwrap()
    }

    #[test]
    fn test_from_frame_derives_indicators() {
        let series = FeatureLoader::from_frame("BTC-USD", &frame(260)).unwrap();

        assert_eq!(series.len(), 260);
        assert_eq!(series.asset(), "BTC-USD");
        assert!(series.bars()[259].is_warm());
        assert!(series.bars()[259].atr.is_some());
        assert_eq!(series.bars()[0].timestamp, "2020-01-0000");
    }

    #[test]
    fn test_from_frame_rejects_short_history() {
        let err = FeatureLoader::from_frame("ETH-USD", &frame(150)).unwrap_err();
        assert!(matches!(err, EvolverError::DataUnavailable { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeatureLoader::load("SOL-USD", "does/not/exist.parquet").unwrap_err();
        assert!(matches!(err, EvolverError::DataUnavailable { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(FeatureLoader::read_frame("prices.xlsx").is_err());
    }
}
