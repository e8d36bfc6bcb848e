//! Tune command implementation

use crate::cli::args::TuneArgs;
use crate::cli::logging::{log, LogLevel};
use crate::data::load_movielens;
use crate::tune::{best_config_block, Strategy, TrialSummary, TuneConfig, Tuner};

pub fn run_tune(args: TuneArgs, level: LogLevel) -> Result<(), String> {
    let strategy: Strategy = args.strategy.parse()?;

    log(level, LogLevel::Normal, &format!("Loading ratings from: {}", args.data.display()));
    let data = load_movielens(&args.data).map_err(|e| format!("Failed to load ratings: {e}"))?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "  {} users x {} items, {} interactions",
            data.n_rows(),
            data.n_cols(),
            data.nnz(),
        ),
    );

    let config = TuneConfig {
        num_samples: args.samples,
        time_budget_secs: (args.time_budget > 0).then_some(args.time_budget),
        strategy,
        threads: args.threads,
        seed: args.seed,
        keep_checkpoints: args.keep_checkpoints,
        fail_fast: args.fail_fast,
        warm_start: !args.no_warm_start,
        output_dir: args.output.clone(),
        ..TuneConfig::default()
    };

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Searching: {} trials max, strategy={}, threads={}",
            config.num_samples, config.strategy, config.threads,
        ),
    );

    let tuner = Tuner::new(config)
        .map_err(|e| format!("Failed to set up tuner: {e}"))?
        .with_progress(print_trial);
    let result = tuner.run(&data).map_err(|e| format!("Search failed: {e}"))?;

    // Results table and best-config summary on stdout
    println!("\n{result}");
    println!("{}", best_config_block(&result));

    log(
        level,
        LogLevel::Normal,
        &format!("\nResults saved to: {}", args.output.display()),
    );
    Ok(())
}

fn print_trial(done: usize, total: usize, summary: &TrialSummary) {
    eprintln!(
        "  [{done}/{total}] auc={:.4} ndcg={:.4} reg={:.2e} lr={:.2e} iters={} [{}]",
        summary.auc,
        summary.ndcg,
        summary.regularization,
        summary.learning_rate,
        summary.iterations,
        summary.status,
    );
}
