//! Dense row-major similarity matrix.

use fieldmap_model::clamp_unit;

/// Similarity scores between `rows` source names and `cols` target names.
///
/// Every entry lies in [0, 1]; NaN inputs are stored as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from per-source rows.
    ///
    /// Rows shorter than `cols` are padded with zeros and longer rows are
    /// truncated, so a misbehaving provider cannot corrupt indexing.
    pub fn from_rows(rows: Vec<Vec<f64>>, cols: usize) -> Self {
        let row_count = rows.len();
        let mut data = Vec::with_capacity(row_count * cols);
        for row in rows {
            let len = row.len().min(cols);
            data.extend(row.into_iter().take(len).map(clamp_unit));
            data.extend(std::iter::repeat_n(0.0, cols - len));
        }
        Self {
            rows: row_count,
            cols,
            data,
        }
    }

    /// Builds a matrix by evaluating `score` for every (row, col) pair.
    pub fn from_fn(rows: usize, cols: usize, mut score: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(clamp_unit(score(i, j)));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at (row, col); out-of-range lookups return 0.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows || col >= self.cols {
            return 0.0;
        }
        self.data[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        if row >= self.rows {
            return &[];
        }
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// True when the matrix dimensions match the requested name lists.
    pub fn has_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols
    }
}
