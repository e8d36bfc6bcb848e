//! Property tests for the search surface
//!
//! - any configuration inside the documented ranges trains and evaluates
//!   without error on a small synthetic dataset;
//! - reported metrics are finite and bounded to [0, 1];
//! - the default space matches the documented bounds.

use proptest::prelude::*;

use afinar::data::CsrMatrix;
use afinar::hpo::{Config, ParameterValue, Trial};
use afinar::tune::{default_search_space, TuneConfig, Tuner};

fn tiny_interactions() -> CsrMatrix {
    let mut triplets = Vec::new();
    for u in 0..10u32 {
        for i in 0..8u32 {
            if (u + 2 * i) % 3 != 0 {
                triplets.push((u, i, 1.0));
            }
        }
    }
    CsrMatrix::from_triplets(10, 8, &triplets).expect("valid triplets")
}

fn tuner(dir: &std::path::Path) -> Tuner {
    let config = TuneConfig {
        num_samples: 1,
        threads: 2,
        output_dir: dir.join("out"),
        ..TuneConfig::default()
    };
    Tuner::new(config).expect("tuner")
}

fn config_from(regularization: f64, learning_rate: f64, iterations: i64) -> Config {
    let mut config = Config::new();
    config.insert("regularization".into(), ParameterValue::Float(regularization));
    config.insert("learning_rate".into(), ParameterValue::Float(learning_rate));
    config.insert("iterations".into(), ParameterValue::Int(iterations));
    config
}

proptest! {
    // Each case trains a model; keep the count modest.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_any_config_in_ranges_trains(
        // Log-uniform over the documented ranges
        reg_exp in -6.0f64..-1.0,
        lr_exp in -6.0f64..-1.0,
        iterations in 50i64..=500,
    ) {
        // powf is not exactly rounded at the range edges; clamp into bounds
        let reg = 10f64.powf(reg_exp).clamp(1e-6, 1e-1);
        let lr = 10f64.powf(lr_exp).clamp(1e-6, 1e-1);
        let config = config_from(reg, lr, iterations);
        prop_assert!(default_search_space().validate(&config).is_ok());

        let dir = tempfile::tempdir().expect("tempdir");
        let tuner = tuner(dir.path());
        let trial = Trial::new(0, config);

        let (auc, ndcg, _model) = tuner
            .run_trial(&tiny_interactions(), &trial)
            .expect("trial inside declared ranges must succeed");

        prop_assert!(auc.is_finite() && (0.0..=1.0).contains(&auc), "auc {auc}");
        prop_assert!(ndcg.is_finite() && (0.0..=1.0).contains(&ndcg), "ndcg {ndcg}");
    }
}

#[test]
fn documented_bounds_match_space() {
    let space = default_search_space();

    for name in ["regularization", "learning_rate"] {
        let domain = space.get(name).expect("domain exists");
        assert!((domain.low_f64() - 1e-6).abs() < 1e-18);
        assert!((domain.high_f64() - 1e-1).abs() < 1e-12);
    }

    let iterations = space.get("iterations").expect("domain exists");
    assert!((iterations.low_f64() - 50.0).abs() < 1e-12);
    assert!((iterations.high_f64() - 500.0).abs() < 1e-12);
}

#[test]
fn boundary_configs_train() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tuner = tuner(dir.path());
    let data = tiny_interactions();

    for (reg, lr, iters) in [
        (1e-6, 1e-6, 50),
        (1e-1, 1e-1, 50),
        (1e-6, 1e-1, 500),
        (1e-1, 1e-6, 500),
    ] {
        let trial = Trial::new(0, config_from(reg, lr, iters));
        let (auc, ndcg, _) = tuner.run_trial(&data, &trial).expect("boundary config");
        assert!((0.0..=1.0).contains(&auc));
        assert!((0.0..=1.0).contains(&ndcg));
    }
}
