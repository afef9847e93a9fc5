use super::traits::{invalid, ConfigSection};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One asset and the file its feature table is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub assets: Vec<AssetSource>,
    pub output_dir: PathBuf,
    pub best_genome_file: String,
    pub generation_log_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        let asset = |name: &str| AssetSource {
            name: name.to_string(),
            path: PathBuf::from(format!("data/market_data/{}_processed.parquet", name)),
        };
        Self {
            assets: vec![asset("BTC-USD"), asset("ETH-USD"), asset("SOL-USD")],
            output_dir: PathBuf::from("output"),
            best_genome_file: "best_genome.json".to_string(),
            generation_log_file: "generations.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn best_genome_path(&self) -> PathBuf {
        self.output_dir.join(&self.best_genome_file)
    }

    pub fn generation_log_path(&self) -> PathBuf {
        self.output_dir.join(&self.generation_log_file)
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        if self.assets.is_empty() {
            return Err(invalid(section, "at least one asset is required"));
        }
        if self.best_genome_file.is_empty() || self.generation_log_file.is_empty() {
            return Err(invalid(section, "output file names must not be empty"));
        }
        Ok(())
    }
}
