//! Trial bookkeeping

use serde::{Deserialize, Serialize};

use super::Config;

/// A single trial: one configuration and its objective score.
///
/// Searchers minimize `score`; callers maximizing a metric record the
/// negated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trial {
    /// Trial ID
    pub id: usize,
    /// Parameter configuration
    pub config: Config,
    /// Objective score (lower is better)
    pub score: f64,
    /// Trial status
    pub status: TrialStatus,
}

impl Trial {
    /// Create a new pending trial
    pub fn new(id: usize, config: Config) -> Self {
        Self {
            id,
            config,
            score: f64::INFINITY,
            status: TrialStatus::Pending,
        }
    }

    /// Mark trial as complete with its score
    pub fn complete(&mut self, score: f64) {
        self.score = score;
        self.status = TrialStatus::Completed;
    }

    /// Mark trial as failed
    pub fn fail(&mut self) {
        self.status = TrialStatus::Failed;
    }
}

/// Trial status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TrialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrialStatus::Pending => write!(f, "pending"),
            TrialStatus::Completed => write!(f, "completed"),
            TrialStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_lifecycle() {
        let mut trial = Trial::new(0, Config::new());
        assert_eq!(trial.status, TrialStatus::Pending);
        assert!(trial.score.is_infinite());

        trial.complete(-0.8);
        assert_eq!(trial.status, TrialStatus::Completed);
        assert!((trial.score - -0.8).abs() < 1e-12);
    }

    #[test]
    fn test_trial_fail() {
        let mut trial = Trial::new(3, Config::new());
        trial.fail();
        assert_eq!(trial.status, TrialStatus::Failed);
    }
}
