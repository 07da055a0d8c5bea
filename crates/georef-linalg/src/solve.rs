use crate::matrix::try_zeroed_vec;
use crate::{SolverError, SquareMatrix};

/// Solves `M x = a` and `M y = b` for a shared square matrix.
///
/// Uses Gaussian elimination with partial pivoting. Every column is
/// eliminated from all other rows (Gauss-Jordan), so the matrix is diagonal
/// at the end and each solution component is `rhs[i] / M[i][i]`.
///
/// The inputs are copied into working buffers owned by this call; the
/// caller's matrix and right-hand sides are never modified.
///
/// # Arguments
///
/// * `m` - The N x N coefficient matrix.
/// * `a` - The first right-hand side, of length N.
/// * `b` - The second right-hand side, of length N.
///
/// # Returns
///
/// The pair of solutions `(x, y)`.
///
/// # Errors
///
/// * [`SolverError::Unsolvable`] if a pivot column is entirely zero.
/// * [`SolverError::OutOfMemory`] if the working buffers cannot be allocated.
/// * [`SolverError::Internal`] if the right-hand sides do not have length N.
///
/// # Example
///
/// ```
/// use georef_linalg::{solve_pair, SquareMatrix};
///
/// let m = SquareMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let (x, y) = solve_pair(&m, &[3.0, 5.0], &[1.0, 2.0]).unwrap();
///
/// assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
/// assert!((y[0] - 0.2).abs() < 1e-12 && (y[1] - 0.6).abs() < 1e-12);
/// ```
pub fn solve_pair(
    m: &SquareMatrix,
    a: &[f64],
    b: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), SolverError> {
    let n = m.size();
    if a.len() != n || b.len() != n {
        return Err(SolverError::Internal(format!(
            "right-hand sides have lengths {} and {}, expected {n}",
            a.len(),
            b.len()
        )));
    }

    // working copies
    let mut mat = SquareMatrix::try_zeros(n)?;
    for i in 0..n {
        for j in 0..n {
            mat[(i, j)] = m[(i, j)];
        }
    }
    let mut rhs_a = try_zeroed_vec(n, n)?;
    rhs_a.copy_from_slice(a);
    let mut rhs_b = try_zeroed_vec(n, n)?;
    rhs_b.copy_from_slice(b);

    for i in 0..n {
        // find the row with the largest magnitude in this column
        let mut pivot = mat[(i, i)];
        let mut imark = i;
        for i2 in (i + 1)..n {
            if mat[(i2, i)].abs() > pivot.abs() {
                pivot = mat[(i2, i)];
                imark = i2;
            }
        }

        // an exact zero means the points are collinear
        if pivot == 0.0 {
            return Err(SolverError::Unsolvable);
        }

        if imark != i {
            mat.swap_rows(imark, i);
            rhs_a.swap(imark, i);
            rhs_b.swap(imark, i);
        }

        // zero the column above and below the pivot
        for i2 in 0..n {
            if i2 == i {
                continue;
            }
            let factor = mat[(i2, i)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j2 in i..n {
                mat[(i2, j2)] -= factor * mat[(i, j2)];
            }
            rhs_a[i2] -= factor * rhs_a[i];
            rhs_b[i2] -= factor * rhs_b[i];
        }
    }

    let x = (0..n).map(|i| rhs_a[i] / mat[(i, i)]).collect();
    let y = (0..n).map(|i| rhs_b[i] / mat[(i, i)]).collect();

    Ok((x, y))
}
