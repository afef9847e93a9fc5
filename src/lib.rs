//! Regime-filtered strategy evolver.
//!
//! Evolves the parameters of a trend / mean-reversion / volatility signal blend with an
//! elitist genetic search, scoring each candidate by backtesting it over one or more
//! assets' daily closes.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use config::{AppConfig, ConfigManager};
pub use data::{FeatureLoader, FeatureSeries};
pub use engines::evaluation::{BacktestOutcome, Backtester};
pub use engines::generation::{EvolutionEngine, Genome};
pub use error::{EvolverError, Result};
