use serde::{Deserialize, Serialize};

/// Columns the feature loader looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    Timestamp,
    Close,
    Volatility,
}

impl FeatureColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Close => "close",
            Self::Volatility => "volatility",
        }
    }

    /// Columns without which an asset cannot be loaded.
    pub fn required() -> Vec<Self> {
        vec![Self::Timestamp, Self::Close]
    }

    /// Common alternative column names
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Timestamp => vec!["timestamp", "Timestamp", "date", "Date", "datetime", "Datetime", "time"],
            Self::Close => vec!["close", "Close", "CLOSE", "c"],
            Self::Volatility => vec!["volatility", "Volatility", "volatility_20d", "Volatility_20d"],
        }
    }
}

/// Source file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Parquet,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }
}
