pub mod traits;
pub mod evolution;
pub mod genes;
pub mod simulation;
pub mod fitness;
pub mod data;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::{EvolutionConfig, ReproductionMode};
pub use genes::{Bounds, GeneConfig, PeriodBounds};
pub use simulation::SimulationConfig;
pub use fitness::{AggregationConfig, FitnessConfig};
pub use data::{AssetSource, DataConfig};
pub use traits::ConfigSection;
