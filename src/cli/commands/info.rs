//! Info command implementation

use crate::cli::args::InfoArgs;
use crate::cli::logging::{log, LogLevel};
use crate::data::load_movielens;

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let data = load_movielens(&args.data).map_err(|e| format!("Failed to load ratings: {e}"))?;

    log(level, LogLevel::Normal, &format!("Dataset: {}", args.data.display()));
    log(level, LogLevel::Normal, &format!("  Users:        {}", data.n_rows()));
    log(level, LogLevel::Normal, &format!("  Items:        {}", data.n_cols()));
    log(level, LogLevel::Normal, &format!("  Interactions: {}", data.nnz()));
    log(
        level,
        LogLevel::Normal,
        &format!("  Density:      {:.4}%", data.density() * 100.0),
    );

    let per_user: Vec<usize> = (0..data.n_rows()).map(|u| data.row_nnz(u)).collect();
    let active = per_user.iter().filter(|&&n| n > 0).count();
    let max = per_user.iter().max().copied().unwrap_or(0);
    let mean = if active > 0 {
        data.nnz() as f64 / active as f64
    } else {
        0.0
    };
    log(
        level,
        LogLevel::Verbose,
        &format!("  Active users: {active} (mean {mean:.1}, max {max} interactions)"),
    );

    Ok(())
}
