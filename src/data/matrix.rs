// ---------------------------------------------------------------------------
// Matrix: fixed-shape row-major storage for loaded vectors
// ---------------------------------------------------------------------------

/// Rectangular row-major matrix of `f64`.
///
/// Shape is fixed at allocation; the loader writes rows through
/// [`Matrix::row_mut`] and reads afterwards hand out plain slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let idx = i * self.cols;
        &self.data[idx..idx + self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let idx = i * self.cols;
        &mut self.data[idx..idx + self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_disjoint_slices() {
        let mut m = Matrix::zeros(2, 3);
        m.row_mut(0).copy_from_slice(&[1.0, 2.0, 3.0]);
        m.row_mut(1).copy_from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(m.row(0), [1.0, 2.0, 3.0]);
        assert_eq!(m.row(1), [4.0, 5.0, 6.0]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
    }
}
