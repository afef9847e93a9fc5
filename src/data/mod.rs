pub mod connectors;
pub mod features;
pub mod genome_store;

pub use connectors::{DataValidator, FeatureColumn, FeatureLoader, SourceFormat};
pub use features::{FeatureBar, FeatureSeries};
pub use genome_store::{GenomeStore, RunLog};
