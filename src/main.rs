//! Afinar CLI
//!
//! Hyperparameter search entry point.
//!
//! # Usage
//!
//! ```bash
//! # Search over a cached MovieLens dataset
//! afinar tune ~/.cache/afinar/ml-10m
//!
//! # Bounded quick run
//! afinar tune ratings.csv -n 50 --time-budget 600 --strategy random
//!
//! # Dataset statistics
//! afinar info ratings.csv
//! ```

use afinar::cli::{run_command, Cli};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
