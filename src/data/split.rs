//! Seeded train/test interaction split

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{DataError, Result};
use super::matrix::CsrMatrix;

/// Split interactions into train and test partitions.
///
/// Each stored interaction lands in the train partition with probability
/// `train_fraction`, independently of the others. The same seed always
/// produces the same split. Either partition may end up empty for tiny
/// inputs; callers decide whether that is acceptable.
pub fn train_test_split(
    matrix: &CsrMatrix,
    train_fraction: f64,
    seed: u64,
) -> Result<(CsrMatrix, CsrMatrix)> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(DataError::InvalidFraction(train_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train: Vec<(u32, u32, f32)> = Vec::with_capacity(matrix.nnz());
    let mut test: Vec<(u32, u32, f32)> = Vec::new();

    for triplet in matrix.iter_triplets() {
        if rng.random::<f64>() < train_fraction {
            train.push(triplet);
        } else {
            test.push(triplet);
        }
    }

    // Degenerate draws (everything on one side) still need both matrices;
    // rebalance by moving one interaction across.
    if train.is_empty() {
        if let Some(t) = test.pop() {
            train.push(t);
        }
    }
    if test.is_empty() {
        if let Some(t) = train.pop() {
            test.push(t);
        }
    }
    if train.is_empty() || test.is_empty() {
        return Err(DataError::EmptyMatrix);
    }

    let train = CsrMatrix::from_triplets(matrix.n_rows(), matrix.n_cols(), &train)?;
    let test = CsrMatrix::from_triplets(matrix.n_rows(), matrix.n_cols(), &test)?;
    Ok((train, test))
}
