//! Interaction data: sparse matrix, dataset loading, train/test split

mod error;
mod matrix;
mod movielens;
mod split;

pub use error::{DataError, Result};
pub use matrix::CsrMatrix;
pub use movielens::load_movielens;
pub use split::train_test_split;
