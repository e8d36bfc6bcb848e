//! Filesystem persistence for tuning runs
//!
//! Layout under the run's output directory:
//!
//! ```text
//! <output>/
//!   trials/trial_0007.json        one record per trial
//!   checkpoints/trial_0007.json   factor snapshots for the best trials
//!   results.json                  full run result
//!   best_config.json              winning configuration
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Bpr;

use super::summary::{TrialSummary, TuneResult};

/// Errors from results persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Serializable snapshot of a trained model's factors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub n_users: usize,
    pub n_items: usize,
    /// Factor width including the bias column
    pub width: usize,
    /// Row-major user factors
    pub user_factors: Vec<f32>,
    /// Row-major item factors
    pub item_factors: Vec<f32>,
}

impl Checkpoint {
    /// Snapshot a trained model
    pub fn of(model: &Bpr) -> Self {
        Self {
            n_users: model.n_users(),
            n_items: model.n_items(),
            width: model.user_factors().ncols(),
            user_factors: model.user_factors().iter().copied().collect(),
            item_factors: model.item_factors().iter().copied().collect(),
        }
    }
}

/// JSON-file store for one tuning run
#[derive(Debug)]
pub struct ResultsStore {
    root: PathBuf,
}

impl ResultsStore {
    /// Open (creating directories as needed) a store rooted at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root.join("trials"))?;
        fs::create_dir_all(root.join("checkpoints"))?;
        Ok(Self { root: root.to_path_buf() })
    }

    /// Store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one trial record
    pub fn record_trial(&self, summary: &TrialSummary) -> Result<()> {
        let path = self.trial_path(summary.id);
        fs::write(path, serde_json::to_string_pretty(summary)?)?;
        Ok(())
    }

    /// Persist a model checkpoint for a trial
    pub fn save_checkpoint(&self, trial_id: usize, model: &Bpr) -> Result<()> {
        let path = self.checkpoint_path(trial_id);
        fs::write(path, serde_json::to_string(&Checkpoint::of(model))?)?;
        Ok(())
    }

    /// Remove the checkpoint of a trial that fell out of the kept set
    pub fn remove_checkpoint(&self, trial_id: usize) -> Result<()> {
        let path = self.checkpoint_path(trial_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Load a persisted checkpoint
    pub fn load_checkpoint(&self, trial_id: usize) -> Result<Checkpoint> {
        let bytes = fs::read(self.checkpoint_path(trial_id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Persist the final run result and the winning configuration
    pub fn write_result(&self, result: &TuneResult) -> Result<()> {
        fs::write(
            self.root.join("results.json"),
            serde_json::to_string_pretty(result)?,
        )?;

        if let Some(best) = result.best_geo_trial().or_else(|| result.best_auc_trial()) {
            fs::write(
                self.root.join("best_config.json"),
                serde_json::to_string_pretty(&best.config)?,
            )?;
        }
        Ok(())
    }

    /// Read back a persisted run result
    pub fn read_result(&self) -> Result<TuneResult> {
        let bytes = fs::read(self.root.join("results.json"))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn trial_path(&self, id: usize) -> PathBuf {
        self.root.join("trials").join(format!("trial_{id:04}.json"))
    }

    fn checkpoint_path(&self, id: usize) -> PathBuf {
        self.root
            .join("checkpoints")
            .join(format!("trial_{id:04}.json"))
    }
}
