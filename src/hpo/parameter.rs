//! Parameter value and domain types

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameter value (sampled from a domain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Float(f64),
    Int(i64),
}

impl ParameterValue {
    /// Get as float (converts int to float if needed)
    pub fn as_float(&self) -> f64 {
        match self {
            ParameterValue::Float(v) => *v,
            ParameterValue::Int(v) => *v as f64,
        }
    }

    /// Get as int (truncates float if needed)
    pub fn as_int(&self) -> i64 {
        match self {
            ParameterValue::Int(v) => *v,
            ParameterValue::Float(v) => *v as i64,
        }
    }
}

impl std::fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterValue::Float(v) => write!(f, "{v:.6e}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
        }
    }
}

/// Parameter domain (search range)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParameterDomain {
    /// Continuous range [low, high], optionally sampled on a log scale
    Continuous {
        low: f64,
        high: f64,
        log_scale: bool,
    },
    /// Integer range [low, high], optionally sampled on a log scale
    Discrete {
        low: i64,
        high: i64,
        log_scale: bool,
    },
}

impl ParameterDomain {
    /// Sample a random value from this domain
    pub fn sample<R: Rng>(&self, rng: &mut R) -> ParameterValue {
        match self {
            ParameterDomain::Continuous {
                low,
                high,
                log_scale,
            } => {
                let value = if *log_scale {
                    let log_low = low.ln();
                    let log_high = high.ln();
                    let log_val = log_low + rng.random::<f64>() * (log_high - log_low);
                    log_val.exp()
                } else {
                    low + rng.random::<f64>() * (high - low)
                };
                ParameterValue::Float(value.clamp(*low, *high))
            }
            ParameterDomain::Discrete {
                low,
                high,
                log_scale,
            } => {
                let value = if *log_scale {
                    // Log-spaced integer: uniform in [ln(low), ln(high + 1))
                    let log_low = (*low as f64).ln();
                    let log_high = (*high as f64 + 1.0).ln();
                    let log_val = log_low + rng.random::<f64>() * (log_high - log_low);
                    log_val.exp().floor() as i64
                } else {
                    let range = (*high - *low + 1) as f64;
                    let offset = (rng.random::<f64>() * range).floor() as i64;
                    *low + offset
                };
                ParameterValue::Int(value.clamp(*low, *high))
            }
        }
    }

    /// Check if a value is valid for this domain
    pub fn is_valid(&self, value: &ParameterValue) -> bool {
        match (self, value) {
            (ParameterDomain::Continuous { low, high, .. }, ParameterValue::Float(v)) => {
                *v >= *low && *v <= *high
            }
            (ParameterDomain::Discrete { low, high, .. }, ParameterValue::Int(v)) => {
                *v >= *low && *v <= *high
            }
            _ => false,
        }
    }

    /// Lower bound as float (for bounds reporting)
    pub fn low_f64(&self) -> f64 {
        match self {
            ParameterDomain::Continuous { low, .. } => *low,
            ParameterDomain::Discrete { low, .. } => *low as f64,
        }
    }

    /// Upper bound as float (for bounds reporting)
    pub fn high_f64(&self) -> f64 {
        match self {
            ParameterDomain::Continuous { high, .. } => *high,
            ParameterDomain::Discrete { high, .. } => *high as f64,
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_continuous_sample_bounded(seed in 0u64..1000, log_scale in any::<bool>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let domain = ParameterDomain::Continuous { low: 1e-6, high: 1e-1, log_scale };
            let v = domain.sample(&mut rng).as_float();
            prop_assert!((1e-6..=1e-1).contains(&v));
        }

        #[test]
        fn prop_discrete_sample_bounded(seed in 0u64..1000, log_scale in any::<bool>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let domain = ParameterDomain::Discrete { low: 50, high: 500, log_scale };
            let v = domain.sample(&mut rng).as_int();
            prop_assert!((50..=500).contains(&v));
        }
    }
}
