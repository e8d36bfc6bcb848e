//! MovieLens ratings loader
//!
//! Reads an already-cached MovieLens ratings file from a local directory.
//! Both the `::`-separated `ratings.dat` form (ML-1M/10M) and the
//! comma-separated `ratings.csv` form (ML-20M/25M) are accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::{DataError, Result};
use super::matrix::CsrMatrix;

/// Load a MovieLens interaction matrix from `dir`.
///
/// Looks for `ratings.dat`, then `ratings.csv`; `dir` may also point
/// directly at a ratings file. Matrix dimensions are the maximum observed
/// user/item id plus one.
pub fn load_movielens(dir: &Path) -> Result<CsrMatrix> {
    let path = if dir.is_file() {
        dir.to_path_buf()
    } else {
        let dat = dir.join("ratings.dat");
        let csv = dir.join("ratings.csv");
        if dat.is_file() {
            dat
        } else if csv.is_file() {
            csv
        } else {
            return Err(DataError::RatingsNotFound(dir.to_path_buf()));
        }
    };

    let separator = if path.extension().is_some_and(|e| e == "dat") {
        "::"
    } else {
        ","
    };

    let reader = BufReader::new(File::open(&path)?);
    let mut triplets: Vec<(u32, u32, f32)> = Vec::new();
    let mut max_user = 0u32;
    let mut max_item = 0u32;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // CSV exports carry a `userId,movieId,rating,timestamp` header
        if line_no == 0 && !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }

        let mut fields = trimmed.split(separator);
        let (user, item, rating) = parse_fields(&mut fields).ok_or_else(|| {
            DataError::MalformedLine {
                line: line_no + 1,
                reason: format!("expected user{separator}item{separator}rating, got {trimmed:?}"),
            }
        })?;

        max_user = max_user.max(user);
        max_item = max_item.max(item);
        triplets.push((user, item, rating));
    }

    CsrMatrix::from_triplets(max_user as usize + 1, max_item as usize + 1, &triplets)
}

fn parse_fields<'a, I: Iterator<Item = &'a str>>(fields: &mut I) -> Option<(u32, u32, f32)> {
    let user = fields.next()?.parse::<u32>().ok()?;
    let item = fields.next()?.parse::<u32>().ok()?;
    let rating = fields.next()?.parse::<f32>().ok()?;
    Some((user, item, rating))
}
