use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use regime_evolver::config::{AppConfig, ConfigManager, ReproductionMode};
use regime_evolver::data::{FeatureLoader, FeatureSeries, GenomeStore, RunLog};
use regime_evolver::engines::evaluation::Backtester;
use regime_evolver::engines::fitness::{
    FitnessEvaluator, FitnessFunction, MultiAssetAggregator, SingleAssetFitness,
};
use regime_evolver::engines::generation::{
    deadline_flag, EvolutionEngine, EvolutionOutcome, Genome, LogProgressCallback,
};
use regime_evolver::error::EvolverError;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(
    name = "regime-evolver",
    about = "Evolve regime-filtered trend / mean-reversion strategies"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,
    /// TOML config layered over the built-in defaults
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the genetic search and save the best genome
    Evolve {
        /// Restrict the run to these configured assets
        #[arg(long = "asset")]
        assets: Vec<String>,
        #[arg(long)]
        generations: Option<usize>,
        #[arg(long)]
        population: Option<usize>,
        #[arg(long, value_enum)]
        reproduction: Option<Reproduction>,
        #[arg(long)]
        seed: Option<u64>,
        /// Evaluate genomes on the calling thread only
        #[arg(long, default_value_t = false)]
        sequential: bool,
        /// Stop after this many seconds, keeping the best genome found so far
        #[arg(long)]
        time_budget: Option<u64>,
    },
    /// Backtest a saved genome on every configured asset
    Audit {
        genome: PathBuf,
        #[arg(long = "asset")]
        assets: Vec<String>,
    },
    /// Write the default configuration as TOML
    InitConfig {
        #[arg(default_value = "evolver.toml")]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Reproduction {
    Mutation,
    Crossover,
}

impl From<Reproduction> for ReproductionMode {
    fn from(value: Reproduction) -> Self {
        match value {
            Reproduction::Mutation => ReproductionMode::Mutation,
            Reproduction::Crossover => ReproductionMode::Crossover,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let mut manager = ConfigManager::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Evolve {
            assets,
            generations,
            population,
            reproduction,
            seed,
            sequential,
            time_budget,
        } => {
            manager
                .update(|config| {
                    if let Some(generations) = generations {
                        config.evolution.generations = generations;
                    }
                    if let Some(population) = population {
                        config.evolution.population_size = population;
                    }
                    if let Some(reproduction) = reproduction {
                        config.evolution.reproduction = reproduction.into();
                    }
                    if seed.is_some() {
                        config.evolution.seed = seed;
                    }
                    if sequential {
                        config.evolution.parallel = false;
                    }
                })
                .context("applying command line overrides")?;
            let budget = time_budget.map(Duration::from_secs);
            evolve(manager.get(), &assets, budget)?;
        }
        Command::Audit { genome, assets } => {
            let genome = GenomeStore::load_best(&genome)
                .with_context(|| format!("reading genome from {}", genome.display()))?;
            let series = load_assets(manager.get(), &assets)?;
            audit(manager.get(), &genome, &series);
        }
        Command::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ConfigManager::new()
                .save_to_file(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("wrote default configuration to {}", path.display());
        }
    }

    println!("elapsed: {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Load the selected assets, skipping (with a warning) any that cannot be read.
fn load_assets(config: &AppConfig, filter: &[String]) -> Result<Vec<Arc<FeatureSeries>>> {
    for name in filter {
        if !config.data.assets.iter().any(|a| &a.name == name) {
            log::warn!("Asset {} is not configured, ignoring", name);
        }
    }

    let mut loaded = Vec::new();
    for source in &config.data.assets {
        if !filter.is_empty() && !filter.contains(&source.name) {
            continue;
        }
        match FeatureLoader::load(&source.name, &source.path) {
            Ok(series) => loaded.push(Arc::new(series)),
            Err(e) => log::warn!("Skipping {}: {}", source.name, e),
        }
    }

    if loaded.is_empty() {
        return Err(EvolverError::data_unavailable("all", "no asset could be loaded").into());
    }
    Ok(loaded)
}

fn evolve(config: &AppConfig, filter: &[String], budget: Option<Duration>) -> Result<()> {
    let series = load_assets(config, filter)?;
    let backtester = Arc::new(Backtester::new(config.simulation.clone()));
    let started_at = Utc::now();

    let outcome = if series.len() == 1 {
        let fitness = SingleAssetFitness::new(
            Arc::clone(&backtester),
            Arc::clone(&series[0]),
            FitnessEvaluator::new(config.fitness.clone()),
        );
        search(config, fitness, budget)?
    } else {
        let fitness = MultiAssetAggregator::new(
            Arc::clone(&backtester),
            series.clone(),
            config.aggregation.clone(),
        );
        search(config, fitness, budget)?
    };

    if outcome.stopped_early {
        println!("stopped early after {} generations", outcome.history.len());
    }

    let run_log = RunLog {
        started_at,
        finished_at: Utc::now(),
        assets: series.iter().map(|s| s.asset().to_string()).collect(),
        best_score: outcome.best.map(|b| b.score),
        stopped_early: outcome.stopped_early,
        generations: outcome.history.clone(),
    };
    GenomeStore::save_run_log(config.data.generation_log_path(), &run_log)
        .context("writing generation log")?;

    match outcome.best {
        Some(best) => {
            println!("best score: {:.4}", best.score);
            println!("best genome: {}", best.genome);
            GenomeStore::save_best(config.data.best_genome_path(), &best.genome)
                .context("writing best genome")?;
            audit(config, &best.genome, &series);
        }
        None => println!("no viable genome: every candidate was rejected"),
    }
    Ok(())
}

fn search<F: FitnessFunction>(
    config: &AppConfig,
    fitness: F,
    budget: Option<Duration>,
) -> Result<EvolutionOutcome> {
    let mut engine = EvolutionEngine::new(config.evolution.clone(), config.genes.clone(), fitness);
    if let Some(budget) = budget {
        engine = engine.with_stop_flag(deadline_flag(budget));
    }
    Ok(engine.run(LogProgressCallback)?)
}

fn audit(config: &AppConfig, genome: &Genome, series: &[Arc<FeatureSeries>]) {
    let backtester = Backtester::new(config.simulation.clone());

    println!("--- audit ---");
    println!("genome: {}", genome);
    println!("risk ratio: 1:{:.2}", genome.risk_ratio());
    for asset in series {
        match backtester.report(asset, genome) {
            Some(report) => println!("[{}]\n{}", asset.asset(), report),
            None => println!("[{}]\nFAILED (too few trades)", asset.asset()),
        }
    }
}
