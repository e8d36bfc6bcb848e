//! Searcher implementations
//!
//! - `TpeSearcher` — Bayesian optimization (default)
//! - `RandomSearcher` — uniform sampling
//! - `GridSearcher` — exhaustive cartesian grid

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::{HpoError, Result};
use super::grid::grid_configurations;
use super::space::SearchSpace;
use super::tpe::TpeOptimizer;
use super::trial::{Trial, TrialStatus};
use super::Config;

/// Search strategy for proposing hyperparameter configurations.
pub trait Searcher {
    /// Suggest the next trial to evaluate.
    fn suggest(&mut self) -> Result<Trial>;

    /// Record a completed trial's objective score (lower is better).
    fn record(&mut self, trial: Trial, score: f64);

    /// Record a trial that failed to complete.
    fn record_failed(&mut self, trial: Trial);

    /// Best completed trial so far (lowest score).
    fn best(&self) -> Option<&Trial>;
}

fn min_by_score(trials: &[Trial]) -> Option<&Trial> {
    trials
        .iter()
        .filter(|t| t.status == TrialStatus::Completed)
        .min_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}

// ═══════════════════════════════════════════════════════════════════════
// TPE
// ═══════════════════════════════════════════════════════════════════════

/// TPE-based searcher (Bayesian optimization).
pub struct TpeSearcher {
    optimizer: TpeOptimizer,
}

impl TpeSearcher {
    /// Create a TPE searcher over the given space.
    pub fn new(space: SearchSpace, n_startup: usize, seed: u64) -> Self {
        let optimizer = TpeOptimizer::new(space, seed).with_startup(n_startup);
        Self { optimizer }
    }
}

impl Searcher for TpeSearcher {
    fn suggest(&mut self) -> Result<Trial> {
        self.optimizer.suggest()
    }

    fn record(&mut self, trial: Trial, score: f64) {
        self.optimizer.record(trial, score);
    }

    fn record_failed(&mut self, trial: Trial) {
        self.optimizer.record_failed(trial);
    }

    fn best(&self) -> Option<&Trial> {
        self.optimizer.best_trial()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Random
// ═══════════════════════════════════════════════════════════════════════

/// Random searcher (uniform sampling).
pub struct RandomSearcher {
    space: SearchSpace,
    trials: Vec<Trial>,
    next_id: usize,
    rng: StdRng,
}

impl RandomSearcher {
    /// Create a random searcher over the given space.
    pub fn new(space: SearchSpace, seed: u64) -> Self {
        Self {
            space,
            trials: Vec::new(),
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Searcher for RandomSearcher {
    fn suggest(&mut self) -> Result<Trial> {
        if self.space.is_empty() {
            return Err(HpoError::EmptySpace);
        }
        let config = self.space.sample_random(&mut self.rng);
        let trial = Trial::new(self.next_id, config);
        self.next_id += 1;
        Ok(trial)
    }

    fn record(&mut self, mut trial: Trial, score: f64) {
        trial.complete(score);
        self.trials.push(trial);
    }

    fn record_failed(&mut self, mut trial: Trial) {
        trial.fail();
        self.trials.push(trial);
    }

    fn best(&self) -> Option<&Trial> {
        min_by_score(&self.trials)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Grid
// ═══════════════════════════════════════════════════════════════════════

/// Grid searcher (exhaustive).
pub struct GridSearcher {
    configs: Vec<Config>,
    trials: Vec<Trial>,
    next_idx: usize,
}

impl GridSearcher {
    /// Create a grid searcher with `n_points` points per parameter.
    pub fn new(space: &SearchSpace, n_points: usize) -> Self {
        let configs = grid_configurations(space, n_points);
        Self { configs, trials: Vec::new(), next_idx: 0 }
    }
}

impl Searcher for GridSearcher {
    fn suggest(&mut self) -> Result<Trial> {
        if self.next_idx >= self.configs.len() {
            return Err(HpoError::Exhausted(self.configs.len()));
        }
        let config = self.configs[self.next_idx].clone();
        let trial = Trial::new(self.next_idx, config);
        self.next_idx += 1;
        Ok(trial)
    }

    fn record(&mut self, mut trial: Trial, score: f64) {
        trial.complete(score);
        self.trials.push(trial);
    }

    fn record_failed(&mut self, mut trial: Trial) {
        trial.fail();
        self.trials.push(trial);
    }

    fn best(&self) -> Option<&Trial> {
        min_by_score(&self.trials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hpo::ParameterDomain;

    fn space() -> SearchSpace {
        let mut space = SearchSpace::new();
        space.add(
            "regularization",
            ParameterDomain::Continuous { low: 1e-6, high: 1e-1, log_scale: true },
        );
        space
    }

    #[test]
    fn test_random_searcher_records_best() {
        let mut searcher = RandomSearcher::new(space(), 42);
        for score in [0.5, -0.9, 0.1] {
            let trial = searcher.suggest().expect("suggest");
            searcher.record(trial, score);
        }
        let best = searcher.best().expect("has best");
        assert!((best.score - -0.9).abs() < 1e-12);
    }

    #[test]
    fn test_random_searcher_empty_space() {
        let mut searcher = RandomSearcher::new(SearchSpace::new(), 42);
        assert!(matches!(searcher.suggest(), Err(HpoError::EmptySpace)));
    }

    #[test]
    fn test_grid_searcher_exhausts() {
        let mut searcher = GridSearcher::new(&space(), 3);
        for _ in 0..3 {
            let trial = searcher.suggest().expect("suggest");
            searcher.record(trial, 0.0);
        }
        assert!(matches!(searcher.suggest(), Err(HpoError::Exhausted(3))));
    }

    #[test]
    fn test_tpe_searcher_through_trait() {
        let mut searcher: Box<dyn Searcher> = Box::new(TpeSearcher::new(space(), 2, 42));
        let trial = searcher.suggest().expect("suggest");
        searcher.record(trial, 1.0);
        let failed = searcher.suggest().expect("suggest");
        searcher.record_failed(failed);
        assert!(searcher.best().is_some());
    }

    #[test]
    fn test_failed_trials_excluded_from_best() {
        let mut searcher = RandomSearcher::new(space(), 42);
        let trial = searcher.suggest().expect("suggest");
        searcher.record_failed(trial);
        assert!(searcher.best().is_none());
    }
}
