//! Trial summaries and the final run result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hpo::{Config, TrialStatus};

use super::config::Strategy;

/// Summary of one completed (or failed) trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Trial index
    pub id: usize,
    /// AUC@K over held-out interactions (0.0 for failed trials)
    pub auc: f64,
    /// NDCG@K over held-out interactions (0.0 for failed trials)
    pub ndcg: f64,
    /// Sampled regularization
    pub regularization: f64,
    /// Sampled learning rate
    pub learning_rate: f64,
    /// Sampled iteration count
    pub iterations: i64,
    /// Wall-clock time in milliseconds
    pub time_ms: u64,
    /// Full sampled configuration
    pub config: Config,
    /// Trial status
    pub status: TrialStatus,
}

impl TrialSummary {
    /// Geometric mean of the two reported metrics.
    pub fn geo(&self) -> f64 {
        (self.auc * self.ndcg).sqrt()
    }
}

/// Result of a complete tuning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneResult {
    /// Strategy used
    pub strategy: Strategy,
    /// Requested trial budget
    pub num_samples: usize,
    /// Run start timestamp
    pub started_at: DateTime<Utc>,
    /// Total wall-clock time in milliseconds
    pub total_time_ms: u64,
    /// Trial summaries, sorted by AUC descending after `sort`
    pub trials: Vec<TrialSummary>,
    /// ID of the best completed trial by AUC
    pub best_by_auc: Option<usize>,
    /// ID of the best completed trial by geometric-mean metric
    pub best_by_geo: Option<usize>,
}

impl TuneResult {
    /// Create an empty result for a starting run
    pub fn new(strategy: Strategy, num_samples: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            strategy,
            num_samples,
            started_at,
            total_time_ms: 0,
            trials: Vec::new(),
            best_by_auc: None,
            best_by_geo: None,
        }
    }

    /// Sort trials by AUC descending and refresh the best-trial ids.
    pub fn sort(&mut self) {
        self.trials.sort_by(|a, b| {
            b.auc
                .partial_cmp(&a.auc)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.best_by_auc = self
            .completed()
            .max_by(|a, b| a.auc.partial_cmp(&b.auc).unwrap_or(std::cmp::Ordering::Equal))
            .map(|t| t.id);
        self.best_by_geo = self
            .completed()
            .max_by(|a, b| {
                a.geo()
                    .partial_cmp(&b.geo())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|t| t.id);
    }

    /// Completed trials only
    pub fn completed(&self) -> impl Iterator<Item = &TrialSummary> {
        self.trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
    }

    /// Best completed trial by AUC
    pub fn best_auc_trial(&self) -> Option<&TrialSummary> {
        self.find(self.best_by_auc?)
    }

    /// Best completed trial by the geometric-mean metric
    pub fn best_geo_trial(&self) -> Option<&TrialSummary> {
        self.find(self.best_by_geo?)
    }

    fn find(&self, id: usize) -> Option<&TrialSummary> {
        self.trials.iter().find(|t| t.id == id)
    }
}
