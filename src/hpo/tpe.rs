//! Tree-structured Parzen Estimator
//!
//! Splits completed trials into good/bad sets by quantile and samples new
//! candidates where the density ratio l(x)/g(x) is highest.
//!
//! # References
//!
//! \[1\] Bergstra et al. (2011) - Algorithms for Hyper-Parameter Optimization

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{HpoError, Result};
use super::parameter::{ParameterDomain, ParameterValue};
use super::space::SearchSpace;
use super::trial::{Trial, TrialStatus};
use super::Config;

/// Number of candidates scored per parameter when sampling from l/g
const N_CANDIDATES: usize = 24;

/// Tree-structured Parzen Estimator optimizer
#[derive(Debug, Clone)]
pub struct TpeOptimizer {
    space: SearchSpace,
    /// Quantile for splitting good/bad trials
    gamma: f64,
    /// Number of startup trials sampled uniformly at random
    n_startup: usize,
    /// KDE bandwidth scale
    kde_bandwidth: f64,
    trials: Vec<Trial>,
    next_id: usize,
    rng: StdRng,
}

impl TpeOptimizer {
    /// Create a new TPE optimizer
    pub fn new(space: SearchSpace, seed: u64) -> Self {
        Self {
            space,
            gamma: 0.25,
            n_startup: 10,
            kde_bandwidth: 1.0,
            trials: Vec::new(),
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Set gamma (quantile for splitting)
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma.clamp(0.01, 0.99);
        self
    }

    /// Set number of startup trials
    pub fn with_startup(mut self, n: usize) -> Self {
        self.n_startup = n.max(1);
        self
    }

    /// Number of completed trials
    pub fn n_completed(&self) -> usize {
        self.trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
            .count()
    }

    /// Best completed trial so far (lowest score)
    pub fn best_trial(&self) -> Option<&Trial> {
        self.trials
            .iter()
            .filter(|t| t.status == TrialStatus::Completed)
            .min_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Suggest the next configuration to try
    pub fn suggest(&mut self) -> Result<Trial> {
        if self.space.is_empty() {
            return Err(HpoError::EmptySpace);
        }

        let config = if self.n_completed() < self.n_startup {
            self.space.sample_random(&mut self.rng)
        } else {
            self.tpe_sample()
        };

        let trial = Trial::new(self.next_id, config);
        self.next_id += 1;
        Ok(trial)
    }

    /// Record a completed trial
    pub fn record(&mut self, mut trial: Trial, score: f64) {
        trial.complete(score);
        self.trials.push(trial);
    }

    /// Record a failed trial
    pub fn record_failed(&mut self, mut trial: Trial) {
        trial.fail();
        self.trials.push(trial);
    }

    fn tpe_sample(&mut self) -> Config {
        let completed: Vec<usize> = self
            .trials
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == TrialStatus::Completed)
            .map(|(i, _)| i)
            .collect();

        if completed.len() < 2 {
            return self.space.sample_random(&mut self.rng);
        }

        // Split trials into good and bad by the gamma quantile of score
        let n_good = ((completed.len() as f64) * self.gamma).ceil() as usize;
        let n_good = n_good.clamp(1, completed.len() - 1);

        let mut sorted = completed;
        sorted.sort_by(|&a, &b| {
            self.trials[a]
                .score
                .partial_cmp(&self.trials[b].score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let (good_idx, bad_idx) = sorted.split_at(n_good);

        let space = self.space.clone();
        let mut config = Config::new();
        for (name, domain) in space.iter() {
            let value = self.sample_parameter(name, domain, good_idx, bad_idx);
            config.insert(name.clone(), value);
        }
        config
    }

    /// Collect a parameter's values from trials, mapped to the sampling scale
    fn observed(&self, name: &str, idx: &[usize], log_scale: bool) -> Vec<f64> {
        idx.iter()
            .filter_map(|&i| self.trials[i].config.get(name))
            .map(ParameterValue::as_float)
            .map(|v| if log_scale { v.max(f64::MIN_POSITIVE).ln() } else { v })
            .collect()
    }

    fn sample_parameter(
        &mut self,
        name: &str,
        domain: &ParameterDomain,
        good_idx: &[usize],
        bad_idx: &[usize],
    ) -> ParameterValue {
        // Discrete log-scale domains are sampled as continuous in ln space
        // and rounded; linear scales are sampled directly.
        let (low, high, log_scale, discrete) = match *domain {
            ParameterDomain::Continuous { low, high, log_scale } => (low, high, log_scale, false),
            ParameterDomain::Discrete { low, high, log_scale } => {
                (low as f64, high as f64, log_scale, true)
            }
        };

        let good = self.observed(name, good_idx, log_scale);
        let bad = self.observed(name, bad_idx, log_scale);

        let (effective_low, effective_high) = if log_scale {
            (low.max(f64::MIN_POSITIVE).ln(), high.max(f64::MIN_POSITIVE).ln())
        } else {
            (low, high)
        };

        let sampled = sample_ei_ratio(
            &good,
            &bad,
            effective_low,
            effective_high,
            self.kde_bandwidth,
            &mut self.rng,
        );

        let value = if log_scale { sampled.exp() } else { sampled };
        let value = value.clamp(low, high);

        if discrete {
            ParameterValue::Int((value.round() as i64).clamp(low as i64, high as i64))
        } else {
            ParameterValue::Float(value)
        }
    }
}

/// Sample a value maximizing the l(x)/g(x) density ratio over candidates
/// drawn from a KDE of the good observations.
fn sample_ei_ratio<R: Rng>(
    good: &[f64],
    bad: &[f64],
    low: f64,
    high: f64,
    kde_bandwidth: f64,
    rng: &mut R,
) -> f64 {
    if good.is_empty() {
        return low + rng.random::<f64>() * (high - low);
    }

    let bandwidth = kde_bandwidth * (high - low) / 10.0;
    let mut best_value = low;
    let mut best_ei = f64::NEG_INFINITY;

    for _ in 0..N_CANDIDATES {
        let idx = (rng.random::<f64>() * good.len() as f64).floor() as usize;
        let base = good[idx.min(good.len() - 1)];
        // Box-Muller transform for Gaussian perturbation
        let u1: f64 = rng.random::<f64>().max(1e-10);
        let u2: f64 = rng.random::<f64>();
        let noise = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * bandwidth;
        let candidate = (base + noise).clamp(low, high);

        let l_score = kde_score(candidate, good, bandwidth);
        let g_score = kde_score(candidate, bad, bandwidth);
        let ei = l_score / (g_score + 1e-10);

        if ei > best_ei {
            best_ei = ei;
            best_value = candidate;
        }
    }

    best_value
}

/// Gaussian KDE density estimate at `x`
fn kde_score(x: f64, values: &[f64], bandwidth: f64) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    values
        .iter()
        .map(|&v| (-(x - v).powi(2) / (2.0 * bandwidth.powi(2))).exp())
        .sum::<f64>()
        / values.len() as f64
}
