//! Compressed sparse row matrix over user × item interactions

use super::error::{DataError, Result};

/// Sparse user × item interaction matrix in CSR form.
///
/// Rows are users, columns are items, values are interaction confidences
/// (e.g. ratings). Column indices within each row are sorted, which makes
/// membership checks a binary search.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<f32>,
}

impl CsrMatrix {
    /// Build from (row, col, value) triplets.
    ///
    /// Triplets may arrive in any order; duplicates are summed.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(u32, u32, f32)],
    ) -> Result<Self> {
        if triplets.is_empty() {
            return Err(DataError::EmptyMatrix);
        }

        if let Some(&(r, c, _)) = triplets
            .iter()
            .find(|&&(r, c, _)| r as usize >= n_rows || c as usize >= n_cols)
        {
            return Err(DataError::IndexOutOfBounds { row: r, col: c });
        }

        let mut sorted: Vec<(u32, u32, f32)> = triplets.to_vec();
        sorted.sort_by_key(|&(r, c, _)| (r, c));

        let mut indptr = vec![0usize; n_rows + 1];
        let mut indices = Vec::with_capacity(sorted.len());
        let mut data: Vec<f32> = Vec::with_capacity(sorted.len());
        let mut last: Option<(u32, u32)> = None;

        for &(r, c, v) in &sorted {
            if last == Some((r, c)) {
                // Duplicate entry: accumulate
                if let Some(prev) = data.last_mut() {
                    *prev += v;
                }
                continue;
            }
            indices.push(c);
            data.push(v);
            indptr[r as usize + 1] += 1;
            last = Some((r, c));
        }

        for r in 0..n_rows {
            indptr[r + 1] += indptr[r];
        }

        Ok(Self { n_rows, n_cols, indptr, indices, data })
    }

    /// Number of user rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of item columns
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored interactions
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Fraction of the dense matrix that is populated
    pub fn density(&self) -> f64 {
        if self.n_rows == 0 || self.n_cols == 0 {
            return 0.0;
        }
        self.nnz() as f64 / (self.n_rows as f64 * self.n_cols as f64)
    }

    /// Column indices and values for one row
    pub fn row(&self, row: usize) -> (&[u32], &[f32]) {
        let start = self.indptr[row];
        let end = self.indptr[row + 1];
        (&self.indices[start..end], &self.data[start..end])
    }

    /// Number of stored entries in one row
    pub fn row_nnz(&self, row: usize) -> usize {
        self.indptr[row + 1] - self.indptr[row]
    }

    /// Whether (row, col) holds an interaction
    pub fn contains(&self, row: usize, col: u32) -> bool {
        let (cols, _) = self.row(row);
        cols.binary_search(&col).is_ok()
    }

    /// Iterate over all (row, col, value) triplets in row-major order
    pub fn iter_triplets(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        (0..self.n_rows).flat_map(move |r| {
            let (cols, vals) = self.row(r);
            cols.iter()
                .zip(vals.iter())
                .map(move |(&c, &v)| (r as u32, c, v))
        })
    }
}
