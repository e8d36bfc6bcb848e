//! Hyperparameter tuning runner
//!
//! Drives the search loop: a searcher proposes a configuration, one trial
//! splits the data, trains BPR, evaluates AUC@K / NDCG@K, and the result is
//! recorded, persisted, and (for the best trials) checkpointed.

mod config;
mod report;
mod runner;
mod store;
mod summary;

pub use config::{default_search_space, extract_bpr_params, low_cost_config, Strategy, TuneConfig};
pub use report::best_config_block;
pub use runner::{TrialCallback, Tuner};
pub use store::{Checkpoint, ResultsStore, StoreError};
pub use summary::{TrialSummary, TuneResult};
