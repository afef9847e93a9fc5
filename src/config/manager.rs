use super::{
    data::DataConfig,
    evolution::EvolutionConfig,
    fitness::{AggregationConfig, FitnessConfig},
    genes::GeneConfig,
    simulation::SimulationConfig,
    traits::ConfigSection,
};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables with this prefix override file values,
/// e.g. `EVOLVER__EVOLUTION__GENERATIONS=5`.
pub const ENV_PREFIX: &str = "EVOLVER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub genes: GeneConfig,
    pub simulation: SimulationConfig,
    pub fitness: FitnessConfig,
    pub aggregation: AggregationConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvolverError> {
        self.evolution.validate()?;
        self.genes.validate()?;
        self.simulation.validate()?;
        self.fitness.validate()?;
        self.aggregation.validate()?;
        self.data.validate()?;
        Ok(())
    }
}

/// Resolves the layered configuration: defaults, then an optional TOML file, then the
/// environment.
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            source: None,
        }
    }

    pub fn load(path: Option<&Path>) -> Result<Self, EvolverError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(EvolverError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;

        if let Some(path) = path {
            log::info!("Loaded configuration from {}", path.display());
        }

        Ok(Self {
            config,
            source: path.map(Path::to_path_buf),
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvolverError> {
        let toml_str = toml::to_string_pretty(&self.config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn update<F>(&mut self, f: F) -> Result<(), EvolverError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
