use super::evolution_engine::{GenerationStats, ProgressCallback};
use super::best_ever::ScoredGenome;

/// Logs one line per generation through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting", generation + 1);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        match stats.avg_valid_score {
            Some(avg) => log::info!(
                "Gen {:02}: Best Score: {:.4} | Avg: {:.4} | Rejected: {}",
                stats.generation + 1,
                stats.best_score,
                avg,
                stats.rejected
            ),
            None => log::info!(
                "Gen {:02}: Best Score: {:.4} | no viable genomes",
                stats.generation + 1,
                stats.best_score
            ),
        }
    }

    fn on_new_best(&mut self, generation: usize, best: &ScoredGenome) {
        log::debug!(
            "New best in generation {}: {:.4} [{}]",
            generation + 1,
            best.score,
            best.genome
        );
    }
}
