use std::ops::{Index, IndexMut};

use crate::SolverError;

/// A dense, row-major N x N matrix owned by a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

/// Allocates a zero-filled vector, reporting allocation failure instead of aborting.
pub(crate) fn try_zeroed_vec(len: usize, n: usize) -> Result<Vec<f64>, SolverError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| SolverError::OutOfMemory(n))?;
    data.resize(len, 0.0);
    Ok(data)
}

impl SquareMatrix {
    /// Creates a zero matrix of size `n x n`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::OutOfMemory`] if the buffer cannot be reserved.
    pub fn try_zeros(n: usize) -> Result<Self, SolverError> {
        let len = n.checked_mul(n).ok_or(SolverError::OutOfMemory(n))?;
        Ok(Self {
            n,
            data: try_zeroed_vec(len, n)?,
        })
    }

    /// Creates a matrix from its rows.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Internal`] if the rows are not all of length `rows.len()`.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SolverError> {
        let n = rows.len();
        let mut m = Self::try_zeros(n)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SolverError::Internal(format!(
                    "row {i} has {} columns, expected {n}",
                    row.len()
                )));
            }
            m.data[i * n..(i + 1) * n].copy_from_slice(row);
        }
        Ok(m)
    }

    /// Returns the dimension of the matrix.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Returns a row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Swaps two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.n;
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.data.split_at_mut(hi * n);
        head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
    }

    /// Multiplies the matrix by a vector.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| self.row(i).iter().zip(v).map(|(a, b)| a * b).sum())
            .collect()
    }
}

impl Index<(usize, usize)> for SquareMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.n + col]
    }
}

impl IndexMut<(usize, usize)> for SquareMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.n + col]
    }
}
