//! Tuning configuration and the default search space

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hpo::{Config, ParameterDomain, ParameterValue, SearchSpace};

/// Search strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Tpe,
    Random,
    Grid,
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tpe" | "bayesian" => Ok(Self::Tpe),
            "random" => Ok(Self::Random),
            "grid" => Ok(Self::Grid),
            _ => Err(format!("unknown strategy: {s}. Use: tpe, random, grid")),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tpe => write!(f, "tpe"),
            Self::Random => write!(f, "random"),
            Self::Grid => write!(f, "grid"),
        }
    }
}

/// Tuning run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneConfig {
    /// Maximum number of trials
    pub num_samples: usize,
    /// Wall-clock budget in seconds (None = unlimited)
    pub time_budget_secs: Option<u64>,
    /// Search strategy
    pub strategy: Strategy,
    /// Thread count for the evaluation pool
    pub threads: usize,
    /// Seed for splitting, searchers, and per-trial training
    pub seed: u64,
    /// Fraction of interactions kept for training in each trial's split
    pub train_fraction: f64,
    /// Latent factor count for every trial
    pub factors: usize,
    /// Cutoff for AUC@K
    pub auc_k: usize,
    /// Cutoff for NDCG@K
    pub ndcg_k: usize,
    /// Number of best-trial model checkpoints to keep
    pub keep_checkpoints: usize,
    /// Abort the run on the first trial failure instead of recording it
    pub fail_fast: bool,
    /// Evaluate the known low-cost configuration as the first trial
    pub warm_start: bool,
    /// Directory for trial records, checkpoints, and final results
    pub output_dir: PathBuf,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            num_samples: 500,
            time_budget_secs: Some(3600),
            strategy: Strategy::Tpe,
            threads: 8,
            seed: 42,
            train_fraction: 0.9,
            factors: 8,
            auc_k: 10,
            ndcg_k: 3,
            keep_checkpoints: 10,
            fail_fast: false,
            warm_start: true,
            output_dir: PathBuf::from("afinar_results"),
        }
    }
}

/// The tuned search space: regularization and learning rate log-uniform in
/// [1e-6, 1e-1], iteration count log-spaced in [50, 500].
pub fn default_search_space() -> SearchSpace {
    let mut space = SearchSpace::new();
    space.add(
        "regularization",
        ParameterDomain::Continuous { low: 1e-6, high: 1e-1, log_scale: true },
    );
    space.add(
        "learning_rate",
        ParameterDomain::Continuous { low: 1e-6, high: 1e-1, log_scale: true },
    );
    space.add(
        "iterations",
        ParameterDomain::Discrete { low: 50, high: 500, log_scale: true },
    );
    space
}

/// Cheap-but-reasonable starting configuration used for the warm-start trial.
pub fn low_cost_config() -> Config {
    let mut config = Config::new();
    config.insert("regularization".into(), ParameterValue::Float(0.003));
    config.insert("learning_rate".into(), ParameterValue::Float(0.0025));
    config.insert("iterations".into(), ParameterValue::Int(50));
    config
}

/// Pull the three tuned BPR hyperparameters out of a trial configuration.
pub fn extract_bpr_params(config: &Config) -> (f32, f32, usize) {
    let regularization = config
        .get("regularization")
        .map(ParameterValue::as_float)
        .unwrap_or(0.01) as f32;
    let learning_rate = config
        .get("learning_rate")
        .map(ParameterValue::as_float)
        .unwrap_or(0.01) as f32;
    let iterations = config
        .get("iterations")
        .map(ParameterValue::as_int)
        .unwrap_or(100)
        .max(1) as usize;
    (regularization, learning_rate, iterations)
}
