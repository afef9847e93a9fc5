use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvolverError {
    #[error("Data unavailable for {asset}: {reason}")]
    DataUnavailable { asset: String, reason: String },

    #[error("Missing required column: {column} (tried aliases: {aliases:?})")]
    MissingColumn {
        column: String,
        aliases: Vec<&'static str>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Evolution error: {0}")]
    Evolution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl EvolverError {
    pub fn data_unavailable(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            asset: asset.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvolverError>;
