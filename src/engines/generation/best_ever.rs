use crate::engines::generation::genome::Genome;
use serde::{Deserialize, Serialize};

/// A genome paired with its score. The pairing is formed once, right after evaluation,
/// and travels together through sorting and selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredGenome {
    pub genome: Genome,
    pub score: f64,
    /// False when every backtest behind the score was rejected.
    pub viable: bool,
}

/// Best genome seen over the whole run. Its score never decreases.
///
/// The best viable genome is tracked on its own: a rejected genome can outscore every
/// viable one (soft penalties add up per asset) without hiding them.
#[derive(Debug, Clone, Default)]
pub struct BestEver {
    best: Option<ScoredGenome>,
    best_viable: Option<ScoredGenome>,
}

impl BestEver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current best only on a strictly higher score. Returns whether the
    /// overall best changed.
    pub fn observe(&mut self, candidate: &ScoredGenome) -> bool {
        if candidate.viable && improves(&self.best_viable, candidate) {
            self.best_viable = Some(*candidate);
        }
        let improved = improves(&self.best, candidate);
        if improved {
            self.best = Some(*candidate);
        }
        improved
    }

    pub fn get(&self) -> Option<&ScoredGenome> {
        self.best.as_ref()
    }

    pub fn score(&self) -> Option<f64> {
        self.best.map(|b| b.score)
    }

    /// Highest-scoring genome with at least one usable backtest.
    pub fn viable(&self) -> Option<&ScoredGenome> {
        self.best_viable.as_ref()
    }
}

fn improves(current: &Option<ScoredGenome>, candidate: &ScoredGenome) -> bool {
    match current {
        Some(current) => candidate.score > current.score,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(score: f64, w_trend: f64) -> ScoredGenome {
        ScoredGenome {
            genome: Genome {
                w_trend,
                ..Default::default()
            },
            score,
            viable: true,
        }
    }

    #[test]
    fn test_only_strict_improvement_replaces() {
        let mut best = BestEver::new();
        assert!(best.observe(&scored(1.0, 0.1)));
        assert!(!best.observe(&scored(1.0, 0.9)));
        assert!(!best.observe(&scored(0.5, 0.9)));
        assert_eq!(best.get().unwrap().genome.w_trend, 0.1);

        assert!(best.observe(&scored(1.5, 0.7)));
        assert_eq!(best.score(), Some(1.5));
    }

    #[test]
    fn test_non_viable_best_is_hidden() {
        let mut best = BestEver::new();
        best.observe(&ScoredGenome {
            viable: false,
            ..scored(-999.0, 0.1)
        });

        assert!(best.get().is_some());
        assert!(best.viable().is_none());
    }

    #[test]
    fn test_viable_best_survives_higher_rejected_score() {
        let mut best = BestEver::new();
        best.observe(&ScoredGenome {
            viable: false,
            ..scored(-40.0, 0.1)
        });
        best.observe(&scored(-50.0, 0.6));

        assert_eq!(best.score(), Some(-40.0));
        let viable = best.viable().unwrap();
        assert_eq!(viable.score, -50.0);
        assert_eq!(viable.genome.w_trend, 0.6);

        best.observe(&scored(-60.0, 0.9));
        assert_eq!(best.viable().unwrap().genome.w_trend, 0.6);
    }
}
