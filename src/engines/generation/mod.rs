pub mod best_ever;
pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod progress;

pub use best_ever::{BestEver, ScoredGenome};
pub use evolution_engine::{deadline_flag, EvolutionEngine, EvolutionOutcome, GenerationStats, ProgressCallback};
pub use genome::{Gene, GeneKind, Genome};
pub use operators::{crossover, mutate, perturb, random_genome, repair_skew};
pub use progress::LogProgressCallback;
