//! Hyperparameter search primitives
//!
//! Search spaces, trials, and the searchers that propose configurations:
//! TPE (Bayesian), random, and grid.
//!
//! # Example
//!
//! ```ignore
//! use afinar::hpo::{ParameterDomain, SearchSpace, TpeSearcher, Searcher};
//!
//! let mut space = SearchSpace::new();
//! space.add("learning_rate", ParameterDomain::Continuous {
//!     low: 1e-6, high: 1e-1, log_scale: true,
//! });
//! let mut searcher = TpeSearcher::new(space, 10, 42);
//! let trial = searcher.suggest()?;
//! ```
//!
//! # References
//!
//! \[1\] Bergstra et al. (2011) - Algorithms for Hyper-Parameter Optimization (TPE)

mod error;
mod grid;
mod parameter;
mod searchers;
mod space;
mod tpe;
mod trial;

pub use error::{HpoError, Result};
pub use grid::grid_configurations;
pub use parameter::{ParameterDomain, ParameterValue};
pub use searchers::{GridSearcher, RandomSearcher, Searcher, TpeSearcher};
pub use space::SearchSpace;
pub use tpe::TpeOptimizer;
pub use trial::{Trial, TrialStatus};

use std::collections::BTreeMap;

/// A sampled configuration: parameter name → value.
///
/// Ordered so that serialized output and seeded sampling are deterministic.
pub type Config = BTreeMap<String, ParameterValue>;
