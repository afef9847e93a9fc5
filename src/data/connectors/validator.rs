use crate::error::{EvolverError, Result};
use polars::prelude::*;
use super::types::FeatureColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolve the required feature columns (and volatility, when present) to the names
    /// actually used in `df`.
    pub fn validate_features(df: &DataFrame) -> Result<HashMap<FeatureColumn, String>> {
        let mut column_map = HashMap::new();

        for required in FeatureColumn::required() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(EvolverError::MissingColumn {
                        column: required.as_str().to_string(),
                        aliases: required.aliases(),
                    });
                }
            }
        }

        if let Some(col_name) = Self::find_column(df, &FeatureColumn::Volatility) {
            column_map.insert(FeatureColumn::Volatility, col_name.to_string());
        }

        for (feature, actual_name) in &column_map {
            if *feature == FeatureColumn::Timestamp {
                continue;
            }
            let series = df.column(actual_name)?;
            if !matches!(
                series.dtype(),
                DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32
            ) {
                return Err(EvolverError::Configuration(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    feature.as_str(),
                    series.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    /// Find column by checking aliases
    fn find_column<'a>(df: &'a DataFrame, feature: &FeatureColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in feature.aliases() {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias);
            }
        }
        None
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, asset: &str, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(EvolverError::data_unavailable(
                asset,
                format!(
                    "Insufficient data: {} rows, minimum {} required",
                    df.height(),
                    min_rows
                ),
            ));
        }
        Ok(())
    }

    /// Check for null values in every column
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "date" => &["2024-01-01", "2024-01-02"],
            "Close" => &[100.0, 101.0],
            "Volatility_20d" => &[0.3, 0.31],
        }
        .unwrap();

        let map = DataValidator::validate_features(&df).unwrap();
        assert_eq!(map[&FeatureColumn::Close], "Close");
        assert_eq!(map[&FeatureColumn::Volatility], "Volatility_20d");
    }

    #[test]
    fn test_validate_missing_close() {
        let df = df! {
            "date" => &["2024-01-01", "2024-01-02"],
            "open" => &[100.0, 101.0],
        }
        .unwrap();

        let result = DataValidator::validate_features(&df);
        assert!(matches!(result, Err(EvolverError::MissingColumn { .. })));
    }

    #[test]
    fn test_validate_non_numeric_close() {
        let df = df! {
            "timestamp" => &["t0", "t1"],
            "close" => &["a", "b"],
        }
        .unwrap();

        assert!(DataValidator::validate_features(&df).is_err());
    }

    #[test]
    fn test_minimum_rows() {
        let df = df! { "timestamp" => &["t0"], "close" => &[1.0] }.unwrap();
        assert!(DataValidator::validate_minimum_rows(&df, "X", 200).is_err());
        assert!(DataValidator::validate_minimum_rows(&df, "X", 1).is_ok());
    }
}
