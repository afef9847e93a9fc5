pub mod backtester;
pub mod position;
pub mod signals;

pub use backtester::{BacktestOutcome, BacktestResult, Backtester};
pub use position::{Position, EXIT_PRIORITY};
