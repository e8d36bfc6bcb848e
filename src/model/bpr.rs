//! Bayesian Personalized Ranking matrix factorization
//!
//! Learns user and item latent factors by stochastic gradient descent over
//! sampled (user, positive item, negative item) triplets.
//!
//! Factor matrices carry one extra column: the last user component is pinned
//! to 1.0 so the matching item component acts as a per-item bias.
//!
//! # References
//!
//! \[1\] Rendle et al. (2009) - BPR: Bayesian Personalized Ranking from
//!       Implicit Feedback

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::CsrMatrix;

use super::error::{ModelError, Result};

/// Resampling attempts before giving up on a verified negative for one step
const MAX_NEGATIVE_RESAMPLES: usize = 100;

/// BPR training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BprConfig {
    /// Latent factor count (excluding the bias column)
    pub factors: usize,
    /// SGD learning rate
    pub learning_rate: f32,
    /// L2 regularization strength
    pub regularization: f32,
    /// Training epochs; each epoch draws one sample per stored interaction
    pub iterations: usize,
    /// Resample negatives that the user has actually interacted with
    pub verify_negative_samples: bool,
    /// RNG seed for factor init and triplet sampling
    pub seed: u64,
}

impl Default for BprConfig {
    fn default() -> Self {
        Self {
            factors: 8,
            learning_rate: 0.01,
            regularization: 0.01,
            iterations: 100,
            verify_negative_samples: true,
            seed: 42,
        }
    }
}

impl BprConfig {
    fn validate(&self) -> Result<()> {
        if self.factors == 0 {
            return Err(ModelError::InvalidConfig("factors must be > 0".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.regularization >= 0.0 && self.regularization.is_finite()) {
            return Err(ModelError::InvalidConfig(format!(
                "regularization must be non-negative, got {}",
                self.regularization
            )));
        }
        if self.iterations == 0 {
            return Err(ModelError::InvalidConfig("iterations must be > 0".into()));
        }
        Ok(())
    }
}

/// Trained BPR model
#[derive(Debug, Clone)]
pub struct Bpr {
    /// n_users × (factors + 1); last column pinned to 1.0
    user_factors: Array2<f32>,
    /// n_items × (factors + 1); last column is the item bias
    item_factors: Array2<f32>,
}

impl Bpr {
    /// Train a model on the given interaction matrix.
    pub fn fit(config: &BprConfig, train: &CsrMatrix) -> Result<Self> {
        config.validate()?;
        if train.nnz() == 0 {
            return Err(ModelError::EmptyTraining);
        }

        let n_users = train.n_rows();
        let n_items = train.n_cols();
        let width = config.factors + 1;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut user_factors =
            Array2::from_shape_fn((n_users, width), |_| rng.random::<f32>() * 0.01);
        let mut item_factors =
            Array2::from_shape_fn((n_items, width), |_| rng.random::<f32>() * 0.01);
        user_factors.column_mut(config.factors).fill(1.0);

        // Flattened positives for uniform sampling
        let mut users: Vec<u32> = Vec::with_capacity(train.nnz());
        let mut items: Vec<u32> = Vec::with_capacity(train.nnz());
        for (u, i, _) in train.iter_triplets() {
            users.push(u);
            items.push(i);
        }

        let lr = config.learning_rate;
        let reg = config.regularization;

        for _ in 0..config.iterations {
            for _ in 0..users.len() {
                let s = rng.random_range(0..users.len());
                let u = users[s] as usize;
                let i = items[s] as usize;

                let Some(j) = sample_negative(train, u, n_items, config, &mut rng) else {
                    continue;
                };

                // score = w_u · h_i - w_u · h_j, bias included via the pinned column
                let mut score = 0.0f32;
                for f in 0..width {
                    score += user_factors[[u, f]]
                        * (item_factors[[i, f]] - item_factors[[j, f]]);
                }
                let z = 1.0 / (1.0 + score.exp());

                for f in 0..config.factors {
                    let temp = user_factors[[u, f]];
                    user_factors[[u, f]] += lr
                        * (z * (item_factors[[i, f]] - item_factors[[j, f]])
                            - reg * user_factors[[u, f]]);
                    item_factors[[i, f]] += lr * (z * temp - reg * item_factors[[i, f]]);
                    item_factors[[j, f]] += lr * (-z * temp - reg * item_factors[[j, f]]);
                }
                // Bias terms; the user-side component stays 1.0
                let b = config.factors;
                item_factors[[i, b]] += lr * (z - reg * item_factors[[i, b]]);
                item_factors[[j, b]] += lr * (-z - reg * item_factors[[j, b]]);
            }
        }

        Ok(Self { user_factors, item_factors })
    }

    /// Build a model from pre-computed factors.
    ///
    /// Both matrices must share a column count; rows are users and items
    /// respectively.
    pub fn from_factors(user_factors: Array2<f32>, item_factors: Array2<f32>) -> Result<Self> {
        if user_factors.ncols() != item_factors.ncols() {
            return Err(ModelError::InvalidConfig(format!(
                "factor width mismatch: users {} vs items {}",
                user_factors.ncols(),
                item_factors.ncols()
            )));
        }
        Ok(Self { user_factors, item_factors })
    }

    /// Preference score for a (user, item) pair
    pub fn score(&self, user: usize, item: usize) -> f32 {
        self.user_factors.row(user).dot(&self.item_factors.row(item))
    }

    /// Number of users
    pub fn n_users(&self) -> usize {
        self.user_factors.nrows()
    }

    /// Number of items
    pub fn n_items(&self) -> usize {
        self.item_factors.nrows()
    }

    /// User factor matrix (includes the pinned ones column)
    pub fn user_factors(&self) -> &Array2<f32> {
        &self.user_factors
    }

    /// Item factor matrix (includes the bias column)
    pub fn item_factors(&self) -> &Array2<f32> {
        &self.item_factors
    }
}

/// Draw a negative item for user `u`.
///
/// With verification on, items the user has interacted with are rejected;
/// gives up after a bounded number of resamples (e.g. a user who has seen
/// nearly everything) and the caller skips the step.
fn sample_negative<R: Rng>(
    train: &CsrMatrix,
    u: usize,
    n_items: usize,
    config: &BprConfig,
    rng: &mut R,
) -> Option<usize> {
    if !config.verify_negative_samples {
        return Some(rng.random_range(0..n_items));
    }
    for _ in 0..MAX_NEGATIVE_RESAMPLES {
        let j = rng.random_range(0..n_items);
        if !train.contains(u, j as u32) {
            return Some(j);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_matrix() -> CsrMatrix {
        // Two user groups with disjoint tastes
        let mut triplets = Vec::new();
        for u in 0..5u32 {
            for i in 0..4u32 {
                triplets.push((u, i, 1.0));
            }
        }
        for u in 5..10u32 {
            for i in 4..8u32 {
                triplets.push((u, i, 1.0));
            }
        }
        CsrMatrix::from_triplets(10, 8, &triplets).expect("valid")
    }

    #[test]
    fn test_fit_produces_finite_factors() {
        let config = BprConfig { iterations: 20, ..BprConfig::default() };
        let model = Bpr::fit(&config, &toy_matrix()).expect("fit");
        assert_eq!(model.n_users(), 10);
        assert_eq!(model.n_items(), 8);
        assert!(model.user_factors().iter().all(|v| v.is_finite()));
        assert!(model.item_factors().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_fit_seed_reproducible() {
        let config = BprConfig { iterations: 5, ..BprConfig::default() };
        let m = toy_matrix();
        let a = Bpr::fit(&config, &m).expect("fit");
        let b = Bpr::fit(&config, &m).expect("fit");
        assert_eq!(a.user_factors(), b.user_factors());
        assert_eq!(a.item_factors(), b.item_factors());
    }

    #[test]
    fn test_fit_separates_groups() {
        let config = BprConfig { iterations: 60, ..BprConfig::default() };
        let model = Bpr::fit(&config, &toy_matrix()).expect("fit");
        // User 0 trains on items 0-3, never on 4-7
        let liked: f32 = (0..4).map(|i| model.score(0, i)).sum();
        let unliked: f32 = (4..8).map(|i| model.score(0, i)).sum();
        assert!(
            liked > unliked,
            "expected liked items to outscore unliked: {liked} vs {unliked}"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let m = toy_matrix();
        let zero_lr = BprConfig { learning_rate: 0.0, ..BprConfig::default() };
        assert!(matches!(
            Bpr::fit(&zero_lr, &m),
            Err(ModelError::InvalidConfig(_))
        ));

        let zero_factors = BprConfig { factors: 0, ..BprConfig::default() };
        assert!(matches!(
            Bpr::fit(&zero_factors, &m),
            Err(ModelError::InvalidConfig(_))
        ));

        let zero_iters = BprConfig { iterations: 0, ..BprConfig::default() };
        assert!(matches!(
            Bpr::fit(&zero_iters, &m),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unverified_negatives_still_train() {
        let config = BprConfig {
            iterations: 5,
            verify_negative_samples: false,
            ..BprConfig::default()
        };
        assert!(Bpr::fit(&config, &toy_matrix()).is_ok());
    }

    #[test]
    fn test_from_factors_width_mismatch() {
        let users = array![[1.0f32, 0.0]];
        let items = array![[1.0f32, 0.0, 0.0]];
        assert!(matches!(
            Bpr::from_factors(users, items),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_score_matches_dot_product() {
        let users = array![[1.0f32, 2.0, 1.0]];
        let items = array![[3.0f32, 0.5, 0.25]];
        let model = Bpr::from_factors(users, items).expect("valid");
        assert!((model.score(0, 0) - (3.0 + 1.0 + 0.25)).abs() < 1e-6);
    }
}
