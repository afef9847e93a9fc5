pub mod risk;
pub mod engine;

pub use risk::RiskMetrics;
pub use engine::MetricsEngine;
