//! The tuning loop

use std::time::{Duration, Instant};

use chrono::Utc;
use rayon::ThreadPool;

use crate::data::{train_test_split, CsrMatrix};
use crate::eval::{auc_at_k, ndcg_at_k};
use crate::hpo::{
    GridSearcher, HpoError, RandomSearcher, Searcher, SearchSpace, TpeSearcher, Trial, TrialStatus,
};
use crate::model::{Bpr, BprConfig};
use crate::{Error, Result};

use super::config::{default_search_space, extract_bpr_params, low_cost_config, Strategy, TuneConfig};
use super::store::ResultsStore;
use super::summary::{TrialSummary, TuneResult};

/// Progress callback: (trials finished, budget, latest summary)
pub type TrialCallback = fn(usize, usize, &TrialSummary);

/// Grid points per parameter when the grid strategy is selected
const GRID_POINTS: usize = 8;

/// Orchestrates the hyperparameter search.
///
/// Owns the search space and the evaluation thread pool; the pool is the one
/// shared execution handle passed into every trial's evaluation calls.
pub struct Tuner {
    config: TuneConfig,
    space: SearchSpace,
    pool: ThreadPool,
    on_trial: Option<TrialCallback>,
}

impl Tuner {
    /// Create a tuner over the default search space.
    pub fn new(config: TuneConfig) -> Result<Self> {
        if config.num_samples == 0 {
            return Err(Error::Config("num_samples must be > 0".into()));
        }
        if config.threads == 0 {
            return Err(Error::Config("threads must be > 0".into()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| Error::Config(format!("failed to build thread pool: {e}")))?;

        Ok(Self {
            config,
            space: default_search_space(),
            pool,
            on_trial: None,
        })
    }

    /// Report each finished trial through `cb`.
    pub fn with_progress(mut self, cb: TrialCallback) -> Self {
        self.on_trial = Some(cb);
        self
    }

    /// The space being searched
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    fn build_searcher(&self) -> Box<dyn Searcher> {
        let n_startup = (self.config.num_samples / 10).clamp(3, 20);
        match self.config.strategy {
            Strategy::Tpe => Box::new(TpeSearcher::new(
                self.space.clone(),
                n_startup,
                self.config.seed,
            )),
            Strategy::Random => Box::new(RandomSearcher::new(self.space.clone(), self.config.seed)),
            Strategy::Grid => Box::new(GridSearcher::new(&self.space, GRID_POINTS)),
        }
    }

    /// Run a single trial: split, train, evaluate.
    ///
    /// Returns (AUC@K, NDCG@K, trained model). Errors propagate to the run
    /// loop, which records the trial as failed unless `fail_fast` is set.
    pub fn run_trial(&self, data: &CsrMatrix, trial: &Trial) -> Result<(f64, f64, Bpr)> {
        let (train, test) =
            train_test_split(data, self.config.train_fraction, self.config.seed)?;

        let (regularization, learning_rate, iterations) = extract_bpr_params(&trial.config);
        let bpr_config = BprConfig {
            factors: self.config.factors,
            learning_rate,
            regularization,
            iterations,
            verify_negative_samples: true,
            seed: self.config.seed.wrapping_add(trial.id as u64),
        };

        let model = Bpr::fit(&bpr_config, &train)?;
        let auc = auc_at_k(&model, &train, &test, self.config.auc_k, &self.pool)?;
        let ndcg = ndcg_at_k(&model, &train, &test, self.config.ndcg_k, &self.pool)?;
        Ok((auc, ndcg, model))
    }

    /// Run the full search over `data`.
    ///
    /// Trials execute until the sample budget, the time budget, or (for grid
    /// search) the configuration set is exhausted. Results are persisted to
    /// `output_dir` as the run progresses.
    pub fn run(&self, data: &CsrMatrix) -> Result<TuneResult> {
        let store = ResultsStore::open(&self.config.output_dir)?;
        let mut searcher = self.build_searcher();
        let budget = self.config.num_samples;
        let deadline = self.config.time_budget_secs.map(Duration::from_secs);

        let mut result = TuneResult::new(self.config.strategy, budget, Utc::now());
        // Checkpointed trials as (id, auc), worst kept last
        let mut kept: Vec<(usize, f64)> = Vec::new();
        let run_start = Instant::now();

        for idx in 0..budget {
            if let Some(limit) = deadline {
                if run_start.elapsed() >= limit {
                    break;
                }
            }

            let mut trial = match searcher.suggest() {
                Ok(t) => t,
                Err(HpoError::Exhausted(_)) => break,
                Err(e) => return Err(e.into()),
            };
            if idx == 0 && self.config.warm_start {
                trial.config = low_cost_config();
            }

            let trial_start = Instant::now();
            let summary = match self.run_trial(data, &trial) {
                Ok((auc, ndcg, model)) => {
                    let summary = self.summarize(&trial, auc, ndcg, trial_start);
                    searcher.record(trial, -auc);
                    self.keep_best_checkpoints(&store, &summary, &model, &mut kept)?;
                    summary
                }
                Err(e) if self.config.fail_fast => return Err(e),
                Err(_) => {
                    let summary = self.summarize_failed(&trial, trial_start);
                    searcher.record_failed(trial);
                    summary
                }
            };

            store.record_trial(&summary)?;
            if let Some(cb) = self.on_trial {
                cb(idx + 1, budget, &summary);
            }
            result.trials.push(summary);
        }

        result.total_time_ms = run_start.elapsed().as_millis() as u64;
        result.sort();
        store.write_result(&result)?;
        Ok(result)
    }

    fn summarize(&self, trial: &Trial, auc: f64, ndcg: f64, started: Instant) -> TrialSummary {
        let (regularization, learning_rate, iterations) = extract_bpr_params(&trial.config);
        TrialSummary {
            id: trial.id,
            auc,
            ndcg,
            regularization: regularization as f64,
            learning_rate: learning_rate as f64,
            iterations: iterations as i64,
            time_ms: started.elapsed().as_millis() as u64,
            config: trial.config.clone(),
            status: TrialStatus::Completed,
        }
    }

    fn summarize_failed(&self, trial: &Trial, started: Instant) -> TrialSummary {
        let (regularization, learning_rate, iterations) = extract_bpr_params(&trial.config);
        TrialSummary {
            id: trial.id,
            auc: 0.0,
            ndcg: 0.0,
            regularization: regularization as f64,
            learning_rate: learning_rate as f64,
            iterations: iterations as i64,
            time_ms: started.elapsed().as_millis() as u64,
            config: trial.config.clone(),
            status: TrialStatus::Failed,
        }
    }

    /// Keep model checkpoints for the top trials by AUC, pruning the rest.
    fn keep_best_checkpoints(
        &self,
        store: &ResultsStore,
        summary: &TrialSummary,
        model: &Bpr,
        kept: &mut Vec<(usize, f64)>,
    ) -> Result<()> {
        let capacity = self.config.keep_checkpoints;
        if capacity == 0 {
            return Ok(());
        }

        let qualifies = kept.len() < capacity
            || kept.last().is_some_and(|&(_, worst)| summary.auc > worst);
        if !qualifies {
            return Ok(());
        }

        store.save_checkpoint(summary.id, model)?;
        kept.push((summary.id, summary.auc));
        kept.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        while kept.len() > capacity {
            if let Some((evicted, _)) = kept.pop() {
                store.remove_checkpoint(evicted)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Block-structured synthetic interactions: two user groups with
    /// disjoint item tastes plus a little noise.
    fn synthetic_data() -> CsrMatrix {
        let mut triplets = Vec::new();
        for u in 0..12u32 {
            for i in 0..8u32 {
                let same_block = (u < 6) == (i < 4);
                if same_block || (u + i) % 5 == 0 {
                    triplets.push((u, i, 1.0));
                }
            }
        }
        CsrMatrix::from_triplets(12, 8, &triplets).expect("valid")
    }

    fn small_config(output_dir: PathBuf) -> TuneConfig {
        TuneConfig {
            num_samples: 4,
            time_budget_secs: None,
            threads: 2,
            keep_checkpoints: 2,
            output_dir,
            ..TuneConfig::default()
        }
    }

    #[test]
    fn test_run_completes_all_trials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out"))).expect("tuner");
        let result = tuner.run(&synthetic_data()).expect("run");

        assert_eq!(result.trials.len(), 4);
        assert!(result
            .trials
            .iter()
            .all(|t| t.status == TrialStatus::Completed));
        assert!(result.best_by_auc.is_some());
        assert!(dir.path().join("out/results.json").exists());
        assert!(dir.path().join("out/best_config.json").exists());
    }

    #[test]
    fn test_run_metrics_in_unit_interval() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out"))).expect("tuner");
        let result = tuner.run(&synthetic_data()).expect("run");

        for trial in &result.trials {
            assert!(trial.auc.is_finite() && (0.0..=1.0).contains(&trial.auc));
            assert!(trial.ndcg.is_finite() && (0.0..=1.0).contains(&trial.ndcg));
        }
    }

    #[test]
    fn test_warm_start_uses_low_cost_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out"))).expect("tuner");
        let result = tuner.run(&synthetic_data()).expect("run");

        let first = result
            .trials
            .iter()
            .find(|t| t.id == 0)
            .expect("first trial");
        assert!((first.regularization - 0.003).abs() < 1e-9);
        assert!((first.learning_rate - 0.0025).abs() < 1e-9);
        assert_eq!(first.iterations, 50);
    }

    #[test]
    fn test_checkpoints_bounded_by_keep_count() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let tuner = Tuner::new(small_config(out.clone())).expect("tuner");
        tuner.run(&synthetic_data()).expect("run");

        let count = std::fs::read_dir(out.join("checkpoints"))
            .expect("dir")
            .count();
        assert!(count <= 2, "expected at most 2 checkpoints, found {count}");
        assert!(count >= 1);
    }

    #[test]
    fn test_run_trial_within_space_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out"))).expect("tuner");

        let trial = Trial::new(0, low_cost_config());
        let (auc, ndcg, model) = tuner.run_trial(&synthetic_data(), &trial).expect("trial");
        assert!((0.0..=1.0).contains(&auc));
        assert!((0.0..=1.0).contains(&ndcg));
        assert_eq!(model.n_users(), 12);
    }

    #[test]
    fn test_time_budget_zero_runs_no_trials() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = small_config(dir.path().join("out"));
        config.time_budget_secs = Some(0);
        let tuner = Tuner::new(config).expect("tuner");
        let result = tuner.run(&synthetic_data()).expect("run");
        assert!(result.trials.is_empty());
        assert!(dir.path().join("out/results.json").exists());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let config = TuneConfig { num_samples: 0, ..TuneConfig::default() };
        assert!(matches!(Tuner::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_reproducible_for_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = Tuner::new(small_config(dir.path().join("a")))
            .expect("tuner")
            .run(&synthetic_data())
            .expect("run");
        let b = Tuner::new(small_config(dir.path().join("b")))
            .expect("tuner")
            .run(&synthetic_data())
            .expect("run");

        let aucs =
            |r: &TuneResult| r.trials.iter().map(|t| (t.id, t.auc)).collect::<Vec<_>>();
        assert_eq!(aucs(&a), aucs(&b));
    }

    #[test]
    fn test_failed_trial_recorded_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out"))).expect("tuner");

        // An unsplittable dataset (one interaction) fails inside run_trial
        let tiny = CsrMatrix::from_triplets(1, 1, &[(0, 0, 1.0)]).expect("valid");
        let result = tuner.run(&tiny).expect("run");
        assert!(result
            .trials
            .iter()
            .all(|t| t.status == TrialStatus::Failed));
        assert!(result.best_by_auc.is_none());
    }

    #[test]
    fn test_fail_fast_propagates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = small_config(dir.path().join("out"));
        config.fail_fast = true;
        let tuner = Tuner::new(config).expect("tuner");

        let tiny = CsrMatrix::from_triplets(1, 1, &[(0, 0, 1.0)]).expect("valid");
        assert!(tuner.run(&tiny).is_err());
    }

    #[test]
    fn test_progress_callback_invoked() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn count(_done: usize, _total: usize, _s: &TrialSummary) {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = Tuner::new(small_config(dir.path().join("out")))
            .expect("tuner")
            .with_progress(count);
        tuner.run(&synthetic_data()).expect("run");
        assert_eq!(CALLS.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_extracted_params_respect_space() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = small_config(dir.path().join("out"));
        config.warm_start = false;
        config.strategy = Strategy::Random;
        let tuner = Tuner::new(config).expect("tuner");
        let result = tuner.run(&synthetic_data()).expect("run");

        // Summary values round-trip through f32; compare with widened bounds
        let (low, high) = (1e-6f32 as f64 * 0.999, 1e-1f32 as f64 * 1.001);
        for t in &result.trials {
            assert!((low..=high).contains(&t.regularization), "reg {}", t.regularization);
            assert!((low..=high).contains(&t.learning_rate), "lr {}", t.learning_rate);
            assert!((50..=500).contains(&t.iterations));
        }
    }
}
