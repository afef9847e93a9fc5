//! Persistence for evolved genomes and per-run generation logs.

use crate::engines::generation::{GenerationStats, Genome};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Record of one evolution run, written next to the best genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLog {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub assets: Vec<String>,
    pub best_score: Option<f64>,
    pub stopped_early: bool,
    pub generations: Vec<GenerationStats>,
}

pub struct GenomeStore;

impl GenomeStore {
    /// Write a genome as a flat JSON object keyed by gene name.
    pub fn save_best<P: AsRef<Path>>(path: P, genome: &Genome) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, serde_json::to_string_pretty(genome)?)?;
        log::info!("Saved best genome to {}", path.display());
        Ok(())
    }

    pub fn load_best<P: AsRef<Path>>(path: P) -> Result<Genome> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_run_log<P: AsRef<Path>>(path: P, run: &RunLog) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, serde_json::to_string_pretty(run)?)?;
        log::info!(
            "Saved {} generation records to {}",
            run.generations.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load_run_log<P: AsRef<Path>>(path: P) -> Result<RunLog> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_best_genome_is_flat_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/best.json");
        let genome = Genome {
            rsi_period: 9,
            tp_multiplier: 4.5,
            ..Default::default()
        };

        GenomeStore::save_best(&path, &genome).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rsi_period"], 9);
        assert_eq!(value["tp_multiplier"], 4.5);
        assert_eq!(GenomeStore::load_best(&path).unwrap(), genome);
    }

    #[test]
    fn test_run_log_keeps_generation_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("generations.json");
        let now = Utc::now();
        let generations = (0..3)
            .map(|g| GenerationStats {
                generation: g,
                best_score: g as f64,
                avg_valid_score: if g == 0 { None } else { Some(0.5) },
                rejected: 3 - g,
                best_genome: Genome::default(),
            })
            .collect();
        let run = RunLog {
            started_at: now,
            finished_at: now,
            assets: vec!["BTC-USD".to_string()],
            best_score: Some(2.0),
            stopped_early: false,
            generations,
        };

        GenomeStore::save_run_log(&path, &run).unwrap();
        let loaded = GenomeStore::load_run_log(&path).unwrap();

        assert_eq!(loaded.generations, run.generations);
        assert_eq!(loaded.generations[0].avg_valid_score, None);
        assert_eq!(loaded.started_at, now);
    }

    #[test]
    fn test_missing_genome_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = GenomeStore::load_best(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::error::EvolverError::Io(_)));
    }
}
