//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Afinar: Hyperparameter Search for Implicit-Feedback Recommenders
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "afinar")]
#[command(version)]
#[command(about = "Hyperparameter search for BPR matrix-factorization recommenders")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run a hyperparameter search over a ratings dataset
    Tune(TuneArgs),

    /// Display statistics about a ratings dataset
    Info(InfoArgs),
}

/// Arguments for the tune command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TuneArgs {
    /// Directory holding the cached ratings file (or the file itself)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Maximum number of trials
    #[arg(short = 'n', long, default_value_t = 500)]
    pub samples: usize,

    /// Wall-clock budget in seconds (0 = unlimited)
    #[arg(long, default_value_t = 3600)]
    pub time_budget: u64,

    /// Search strategy: tpe, random, or grid
    #[arg(short, long, default_value = "tpe")]
    pub strategy: String,

    /// Thread count for training-adjacent evaluation
    #[arg(short, long, default_value_t = 8)]
    pub threads: usize,

    /// Random seed for split, searcher, and trainers
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output directory for trial records and checkpoints
    #[arg(short, long, default_value = "afinar_results")]
    pub output: PathBuf,

    /// Number of best-trial checkpoints to keep
    #[arg(long, default_value_t = 10)]
    pub keep_checkpoints: usize,

    /// Abort the whole run on the first failed trial
    #[arg(long)]
    pub fail_fast: bool,

    /// Skip the warm-start trial with the known low-cost configuration
    #[arg(long)]
    pub no_warm_start: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Directory holding the cached ratings file (or the file itself)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tune_defaults() {
        let cli = Cli::try_parse_from(["afinar", "tune", "data/ml-10m"]).expect("parse");
        match cli.command {
            Command::Tune(args) => {
                assert_eq!(args.samples, 500);
                assert_eq!(args.time_budget, 3600);
                assert_eq!(args.strategy, "tpe");
                assert_eq!(args.threads, 8);
                assert!(!args.fail_fast);
                assert!(!args.no_warm_start);
            }
            other => panic!("expected tune, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tune_overrides() {
        let cli = Cli::try_parse_from([
            "afinar", "tune", "d", "-n", "25", "--strategy", "random", "--threads", "2",
            "--fail-fast",
        ])
        .expect("parse");
        match cli.command {
            Command::Tune(args) => {
                assert_eq!(args.samples, 25);
                assert_eq!(args.strategy, "random");
                assert_eq!(args.threads, 2);
                assert!(args.fail_fast);
            }
            other => panic!("expected tune, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_info() {
        let cli = Cli::try_parse_from(["afinar", "info", "d", "--verbose"]).expect("parse");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Info(_)));
    }

    #[test]
    fn test_missing_data_arg_fails() {
        assert!(Cli::try_parse_from(["afinar", "tune"]).is_err());
    }
}
