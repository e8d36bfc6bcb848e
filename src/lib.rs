//! Afinar: Hyperparameter Search for Implicit-Feedback Recommenders
//!
//! Tunes a Bayesian Personalized Ranking (BPR) matrix-factorization model
//! over a sparse user × item interaction matrix. A searcher (TPE, random, or
//! grid) proposes configurations; each trial splits the data, trains BPR with
//! the sampled hyperparameters, and reports AUC@10 and NDCG@3 over the
//! held-out interactions.
//!
//! # Example
//!
//! ```ignore
//! use afinar::data::load_movielens;
//! use afinar::tune::{TuneConfig, Tuner};
//!
//! let data = load_movielens("~/.cache/afinar/movielens".as_ref())?;
//! let tuner = Tuner::new(TuneConfig::default())?;
//! let result = tuner.run(&data)?;
//! println!("{result}");
//! ```

pub mod cli;
pub mod data;
pub mod eval;
pub mod hpo;
pub mod model;
pub mod tune;

use thiserror::Error;

/// Crate-level error aggregating module errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Hpo(#[from] hpo::HpoError),

    #[error(transparent)]
    Data(#[from] data::DataError),

    #[error(transparent)]
    Model(#[from] model::ModelError),

    #[error(transparent)]
    Eval(#[from] eval::EvalError),

    #[error(transparent)]
    Store(#[from] tune::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;
