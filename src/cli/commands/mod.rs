//! CLI command implementations

mod info;
mod tune;

use super::args::{Cli, Command};
use super::logging::LogLevel;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };

    match cli.command {
        Command::Tune(args) => tune::run_tune(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
    }
}
