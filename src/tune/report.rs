//! Results table and best-configuration summary

use std::fmt;

use super::summary::{TrialSummary, TuneResult};

const COLUMNS: [(&str, usize); 8] = [
    ("Trial", 7),
    ("AUC", 8),
    ("NDCG", 8),
    ("geo", 8),
    ("reg", 11),
    ("lr", 11),
    ("iters", 7),
    ("time (s)", 9),
];

impl fmt::Display for TuneResult {
    /// Render the run as a table sorted by AUC descending.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trials.is_empty() {
            return writeln!(f, "No trials completed.");
        }

        write_rule(f, '┌', '┬', '┐')?;
        write!(f, "│")?;
        for (name, width) in COLUMNS {
            write!(f, " {name:>width$} │")?;
        }
        writeln!(f)?;
        write_rule(f, '├', '┼', '┤')?;

        for trial in &self.trials {
            write_row(f, trial)?;
        }
        write_rule(f, '└', '┴', '┘')?;

        writeln!(
            f,
            "{} trials in {:.1}s ({} strategy)",
            self.trials.len(),
            self.total_time_ms as f64 / 1000.0,
            self.strategy,
        )
    }
}

fn write_rule(f: &mut fmt::Formatter<'_>, left: char, mid: char, right: char) -> fmt::Result {
    write!(f, "{left}")?;
    for (i, (_, width)) in COLUMNS.iter().enumerate() {
        for _ in 0..width + 2 {
            write!(f, "─")?;
        }
        if i + 1 < COLUMNS.len() {
            write!(f, "{mid}")?;
        }
    }
    writeln!(f, "{right}")
}

fn write_row(f: &mut fmt::Formatter<'_>, t: &TrialSummary) -> fmt::Result {
    let marker = match t.status {
        crate::hpo::TrialStatus::Completed => format!("{}", t.id),
        _ => format!("{}!", t.id),
    };
    writeln!(
        f,
        "│ {:>7} │ {:>8.4} │ {:>8.4} │ {:>8.4} │ {:>11.4e} │ {:>11.4e} │ {:>7} │ {:>9.1} │",
        marker,
        t.auc,
        t.ndcg,
        t.geo(),
        t.regularization,
        t.learning_rate,
        t.iterations,
        t.time_ms as f64 / 1000.0,
    )
}

/// Multi-line best-configuration summary, selected by the geometric-mean
/// metric (falling back to AUC when only one metric ever completed).
pub fn best_config_block(result: &TuneResult) -> String {
    let Some(best) = result.best_geo_trial().or_else(|| result.best_auc_trial()) else {
        return "Best config: none (no completed trials)".to_string();
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Best config (geo={:.4}, auc={:.4}, ndcg={:.4}), trial {}:\n",
        best.geo(),
        best.auc,
        best.ndcg,
        best.id,
    ));
    out.push_str(&format!("  regularization: {:.6e}\n", best.regularization));
    out.push_str(&format!("  learning_rate:  {:.6e}\n", best.learning_rate));
    out.push_str(&format!("  iterations:     {}", best.iterations));
    out
}
