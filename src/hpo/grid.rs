//! Grid configuration generation

use super::parameter::{ParameterDomain, ParameterValue};
use super::space::SearchSpace;
use super::Config;

/// Generate grid values for a single parameter domain.
///
/// Linear discrete domains enumerate every integer; log-scale discrete
/// domains take `n_points` log-spaced values (deduplicated after rounding).
fn domain_grid_values(domain: &ParameterDomain, n_points: usize) -> Vec<ParameterValue> {
    let divisor = (n_points - 1) as f64;
    match domain {
        ParameterDomain::Continuous { low, high, log_scale } => {
            if *log_scale {
                let log_low = low.max(f64::MIN_POSITIVE).ln();
                let log_high = high.max(f64::MIN_POSITIVE).ln();
                (0..n_points)
                    .map(|i| {
                        let t = i as f64 / divisor;
                        ParameterValue::Float((log_low + t * (log_high - log_low)).exp())
                    })
                    .collect()
            } else {
                (0..n_points)
                    .map(|i| {
                        let t = i as f64 / divisor;
                        ParameterValue::Float(low + t * (high - low))
                    })
                    .collect()
            }
        }
        ParameterDomain::Discrete { low, high, log_scale } => {
            if *log_scale {
                let log_low = (*low as f64).ln();
                let log_high = (*high as f64).ln();
                let mut values: Vec<i64> = (0..n_points)
                    .map(|i| {
                        let t = i as f64 / divisor;
                        (log_low + t * (log_high - log_low)).exp().round() as i64
                    })
                    .map(|v| v.clamp(*low, *high))
                    .collect();
                values.dedup();
                values.into_iter().map(ParameterValue::Int).collect()
            } else {
                (*low..=*high).map(ParameterValue::Int).collect()
            }
        }
    }
}

/// Generate all grid configurations for a space as the cartesian product of
/// per-parameter grids with `n_points` points (minimum 2).
pub fn grid_configurations(space: &SearchSpace, n_points: usize) -> Vec<Config> {
    let n_points = n_points.max(2);
    let param_values: Vec<(String, Vec<ParameterValue>)> = space
        .iter()
        .map(|(name, domain)| (name.clone(), domain_grid_values(domain, n_points)))
        .collect();

    cartesian_product(&param_values)
}

fn cartesian_product(param_values: &[(String, Vec<ParameterValue>)]) -> Vec<Config> {
    if param_values.is_empty() {
        return vec![Config::new()];
    }

    let (name, values) = &param_values[0];
    let rest_configs = cartesian_product(&param_values[1..]);

    values
        .iter()
        .flat_map(|v| {
            rest_configs.iter().map(move |config| {
                let mut new_config = config.clone();
                new_config.insert(name.clone(), v.clone());
                new_config
            })
        })
        .collect()
}
