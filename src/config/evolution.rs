use super::traits::{check_probability, invalid, ConfigSection};
use crate::error::EvolverError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Top-ranked genomes copied verbatim into the next generation.
    pub elite_count: usize,
    pub mutation_rate: f64,
    pub reproduction: ReproductionMode,
    /// Crossover parents are drawn from this many top-ranked genomes.
    pub crossover_pool: usize,
    pub parallel: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReproductionMode {
    /// Mutate a uniformly chosen survivor.
    Mutation,
    /// Average two high-ranking parents, then mutate the child.
    Crossover,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 30,
            elite_count: 15,
            mutation_rate: 0.3,
            reproduction: ReproductionMode::Mutation,
            crossover_pool: 5,
            parallel: true,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvolverError> {
        let section = Self::section_name();
        if self.population_size < 2 {
            return Err(invalid(section, "population_size must be at least 2"));
        }
        if self.generations == 0 {
            return Err(invalid(section, "generations must be at least 1"));
        }
        if self.elite_count == 0 || self.elite_count >= self.population_size {
            return Err(invalid(
                section,
                format!(
                    "elite_count must be in 1..{}, got {}",
                    self.population_size, self.elite_count
                ),
            ));
        }
        check_probability(section, "mutation_rate", self.mutation_rate)?;
        if self.reproduction == ReproductionMode::Crossover
            && (self.crossover_pool < 2 || self.crossover_pool > self.population_size)
        {
            return Err(invalid(
                section,
                format!(
                    "crossover_pool must be in 2..={}, got {}",
                    self.population_size, self.crossover_pool
                ),
            ));
        }
        Ok(())
    }
}
