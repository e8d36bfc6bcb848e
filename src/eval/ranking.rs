//! AUC@K and NDCG@K
//!
//! Both metrics rank the top-K unseen items per user (training interactions
//! are excluded from candidate rankings) and average per-user scores over
//! users that hold at least one held-out interaction. Per-user work fans out
//! on the caller's thread pool.

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::data::CsrMatrix;
use crate::model::Bpr;

use super::{EvalError, Result};

/// Mean AUC restricted to the top-K recommendations per user.
///
/// Positives missing from the top-K list are credited as if ranked uniformly
/// among the remaining items, matching the classic truncated-AUC estimate.
pub fn auc_at_k(
    model: &Bpr,
    train: &CsrMatrix,
    test: &CsrMatrix,
    k: usize,
    pool: &ThreadPool,
) -> Result<f64> {
    check_dims(model, train, test, k)?;
    let n_items = test.n_cols();

    // Per-user scores gather in row order and sum sequentially so results
    // do not depend on how rayon splits the range.
    let per_user: Vec<Option<f64>> = pool.install(|| {
        (0..test.n_rows())
            .into_par_iter()
            .map(|u| {
                if test.row_nnz(u) == 0 {
                    return None;
                }
                let (likes, _) = test.row(u);
                let num_pos = likes.len() as f64;
                let num_neg = n_items as f64 - num_pos;
                if num_neg <= 0.0 {
                    return None;
                }

                let ids = ranked_top_k(model, train, u, k);
                let mut auc = 0.0;
                let mut hit = 0.0;
                let mut miss = 0.0;
                for &item in &ids {
                    if likes.binary_search(&item).is_ok() {
                        hit += 1.0;
                    } else {
                        miss += 1.0;
                        auc += hit;
                    }
                }
                // Positives beyond the cutoff: assume mid-rank among the rest
                auc += ((hit + num_pos) / 2.0) * (num_neg - miss);
                Some(auc / (num_pos * num_neg))
            })
            .collect()
    });

    Ok(mean(&per_user))
}

/// Mean NDCG over the top-K recommendations per user.
pub fn ndcg_at_k(
    model: &Bpr,
    train: &CsrMatrix,
    test: &CsrMatrix,
    k: usize,
    pool: &ThreadPool,
) -> Result<f64> {
    check_dims(model, train, test, k)?;

    // Discounted gain per rank and its prefix sums for the ideal ordering
    let cg: Vec<f64> = (0..k).map(|i| 1.0 / ((i + 2) as f64).log2()).collect();
    let cg_sum: Vec<f64> = cg
        .iter()
        .scan(0.0, |acc, &g| {
            *acc += g;
            Some(*acc)
        })
        .collect();

    let per_user: Vec<Option<f64>> = pool.install(|| {
        (0..test.n_rows())
            .into_par_iter()
            .map(|u| {
                if test.row_nnz(u) == 0 {
                    return None;
                }
                let (likes, _) = test.row(u);
                let ids = ranked_top_k(model, train, u, k);

                let idcg = cg_sum[likes.len().min(k) - 1];
                let dcg: f64 = ids
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| likes.binary_search(item).is_ok())
                    .map(|(pos, _)| cg[pos])
                    .sum();
                Some(dcg / idcg)
            })
            .collect()
    });

    Ok(mean(&per_user))
}

/// Mean over users that produced a score; 0.0 when none did.
fn mean(per_user: &[Option<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut users = 0usize;
    for value in per_user.iter().flatten() {
        sum += value;
        users += 1;
    }
    if users == 0 {
        return 0.0;
    }
    sum / users as f64
}

/// Top-K items for a user by model score, excluding training interactions.
fn ranked_top_k(model: &Bpr, train: &CsrMatrix, user: usize, k: usize) -> Vec<u32> {
    let (seen, _) = train.row(user);
    let mut scored: Vec<(f32, u32)> = (0..model.n_items() as u32)
        .filter(|item| seen.binary_search(item).is_err())
        .map(|item| (model.score(user, item as usize), item))
        .collect();

    scored.sort_unstable_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored.into_iter().map(|(_, item)| item).collect()
}

fn check_dims(model: &Bpr, train: &CsrMatrix, test: &CsrMatrix, k: usize) -> Result<()> {
    if k == 0 {
        return Err(EvalError::InvalidK);
    }
    if model.n_users() != train.n_rows()
        || model.n_users() != test.n_rows()
        || model.n_items() != train.n_cols()
        || model.n_items() != test.n_cols()
    {
        return Err(EvalError::DimensionMismatch(format!(
            "model {}x{}, train {}x{}, test {}x{}",
            model.n_users(),
            model.n_items(),
            train.n_rows(),
            train.n_cols(),
            test.n_rows(),
            test.n_cols()
        )));
    }
    Ok(())
}
