//! Matrix-factorization models

mod bpr;
mod error;

pub use bpr::{Bpr, BprConfig};
pub use error::{ModelError, Result};
