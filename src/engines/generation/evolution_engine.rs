use crate::config::{EvolutionConfig, GeneConfig, ReproductionMode};
use crate::engines::fitness::{Evaluation, FitnessFunction};
use crate::engines::generation::{
    best_ever::{BestEver, ScoredGenome},
    genome::Genome,
    operators::{crossover, mutate, random_genome},
};
use crate::error::EvolverError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Per-generation summary, also the unit of the persisted generation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_score: f64,
    /// Mean over viable genomes; `None` when the whole generation was rejected.
    pub avg_valid_score: Option<f64>,
    pub rejected: usize,
    #[serde(rename = "genome")]
    pub best_genome: Genome,
}

/// Result of a finished (or stopped) run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Best viable genome found, `None` if no genome ever produced a usable backtest.
    pub best: Option<ScoredGenome>,
    pub history: Vec<GenerationStats>,
    pub stopped_early: bool,
}

/// Stop flag that a background thread raises once `budget` has elapsed. Pass it to
/// [`EvolutionEngine::with_stop_flag`] to bound a run's wall-clock time.
pub fn deadline_flag(budget: Duration) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let raised = Arc::clone(&flag);
    thread::spawn(move || {
        thread::sleep(budget);
        log::warn!("Time budget of {:?} reached, stopping after the current generation", budget);
        raised.store(true, Ordering::Relaxed);
    });
    flag
}

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
    fn on_new_best(&mut self, generation: usize, best: &ScoredGenome);
}

/// Elitist generational search over [`Genome`]s.
///
/// Owns the population: evaluation borrows it immutably (possibly from many threads),
/// and only this engine replaces it, between generations.
pub struct EvolutionEngine<F: FitnessFunction> {
    config: EvolutionConfig,
    genes: GeneConfig,
    fitness: F,
    best: BestEver,
    rng: StdRng,
    stop: Option<Arc<AtomicBool>>,
}

impl<F: FitnessFunction> EvolutionEngine<F> {
    pub fn new(config: EvolutionConfig, genes: GeneConfig, fitness: F) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            genes,
            fitness,
            best: BestEver::new(),
            rng,
            stop: None,
        }
    }

    /// Checked between generations only; a set flag ends the run with the best so far.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    pub fn best_ever(&self) -> &BestEver {
        &self.best
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionOutcome, EvolverError> {
        if self.config.elite_count == 0 || self.config.elite_count >= self.config.population_size {
            return Err(EvolverError::Evolution(format!(
                "elite count {} incompatible with population {}",
                self.config.elite_count, self.config.population_size
            )));
        }

        log::info!(
            "Evolving {} genomes for {} generations on {:?}",
            self.config.population_size,
            self.config.generations,
            self.fitness.assets()
        );

        let mut population = self.initialize_population();
        let mut history = Vec::with_capacity(self.config.generations);
        let mut stopped_early = false;

        for generation in 0..self.config.generations {
            if self.stop_requested() {
                log::warn!("Stop requested, ending before generation {}", generation + 1);
                stopped_early = true;
                break;
            }
            callback.on_generation_start(generation);

            let ranked = self.evaluate_population(&population);
            let stats = Self::generation_stats(generation, &ranked);

            if self.best.observe(&ranked[0]) {
                callback.on_new_best(generation, &ranked[0]);
            }
            if let Some(top_viable) = ranked.iter().find(|s| s.viable) {
                self.best.observe(top_viable);
            }
            callback.on_generation_complete(&stats);
            history.push(stats);

            if generation + 1 == self.config.generations {
                break;
            }
            population = self.create_next_generation(&ranked);
        }

        let best = self.best.viable().copied();
        if best.is_none() {
            log::warn!("No viable genome found: every evaluated genome was rejected");
        }

        Ok(EvolutionOutcome {
            best,
            history,
            stopped_early,
        })
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn initialize_population(&mut self) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| random_genome(&self.genes, &mut self.rng))
            .collect()
    }

    /// Score every genome and return them ranked best-first.
    ///
    /// Workers report `(index, evaluation)` pairs; these are put back in population order
    /// before the stable sort, so ties rank identically in parallel and sequential mode.
    pub fn evaluate_population(&self, population: &[Genome]) -> Vec<ScoredGenome> {
        let fitness = &self.fitness;
        let mut indexed: Vec<(usize, Evaluation)> = if self.config.parallel {
            population
                .par_iter()
                .enumerate()
                .map(|(i, genome)| (i, fitness.evaluate(genome)))
                .collect()
        } else {
            population
                .iter()
                .enumerate()
                .map(|(i, genome)| (i, fitness.evaluate(genome)))
                .collect()
        };
        indexed.sort_by_key(|(i, _)| *i);

        let mut ranked: Vec<ScoredGenome> = indexed
            .into_iter()
            .map(|(i, evaluation)| ScoredGenome {
                genome: population[i],
                score: evaluation.score,
                viable: evaluation.viable,
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        log::debug!("Evaluated {} genomes", ranked.len());
        ranked
    }

    fn generation_stats(generation: usize, ranked: &[ScoredGenome]) -> GenerationStats {
        let valid: Vec<f64> = ranked.iter().filter(|s| s.viable).map(|s| s.score).collect();
        let avg_valid_score = if valid.is_empty() {
            None
        } else {
            Some(valid.iter().sum::<f64>() / valid.len() as f64)
        };

        GenerationStats {
            generation,
            best_score: ranked[0].score,
            avg_valid_score,
            rejected: ranked.len() - valid.len(),
            best_genome: ranked[0].genome,
        }
    }

    /// Elites carried over verbatim, the rest bred from them.
    fn create_next_generation(&mut self, ranked: &[ScoredGenome]) -> Vec<Genome> {
        let survivors: Vec<Genome> = ranked
            .iter()
            .take(self.config.elite_count)
            .map(|s| s.genome)
            .collect();

        let mut next_generation = survivors.clone();
        while next_generation.len() < self.config.population_size {
            let child = match self.config.reproduction {
                ReproductionMode::Mutation => {
                    let parent = survivors[self.rng.gen_range(0..survivors.len())];
                    mutate(&parent, &self.genes, self.config.mutation_rate, &mut self.rng)
                }
                ReproductionMode::Crossover => {
                    let pool: Vec<Genome> = ranked
                        .iter()
                        .take(self.config.crossover_pool)
                        .map(|s| s.genome)
                        .collect();
                    let parents: Vec<&Genome> = pool.choose_multiple(&mut self.rng, 2).collect();
                    let child = match parents.as_slice() {
                        [a, b] => crossover(a, b),
                        _ => pool[0],
                    };
                    mutate(&child, &self.genes, self.config.mutation_rate, &mut self.rng)
                }
            };
            next_generation.push(child);
        }

        next_generation
    }
}
