use georef_core::Correspondence;

use crate::matrix::try_zeroed_vec;
use crate::{solve_pair, SolverError, SquareMatrix};

/// Order of a 2D georeferencing polynomial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolynomialOrder {
    /// Affine: 3 terms.
    First,
    /// Quadratic: 6 terms.
    Second,
    /// Cubic: 10 terms.
    Third,
}

impl PolynomialOrder {
    /// Returns the number of terms of the polynomial.
    ///
    /// This is also the minimum number of active points needed for a fit.
    pub fn term_count(self) -> usize {
        match self {
            PolynomialOrder::First => 3,
            PolynomialOrder::Second => 6,
            PolynomialOrder::Third => 10,
        }
    }

    /// Returns the order as an integer.
    pub fn degree(self) -> u8 {
        match self {
            PolynomialOrder::First => 1,
            PolynomialOrder::Second => 2,
            PolynomialOrder::Third => 3,
        }
    }
}

impl TryFrom<u8> for PolynomialOrder {
    type Error = SolverError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PolynomialOrder::First),
            2 => Ok(PolynomialOrder::Second),
            3 => Ok(PolynomialOrder::Third),
            _ => Err(SolverError::Internal(format!(
                "unsupported polynomial order {value}"
            ))),
        }
    }
}

// (easting, northing) exponents of each term
const TERM_EXPONENTS: [(i32, i32); 10] = [
    (0, 0),
    (1, 0),
    (0, 1),
    (2, 0),
    (1, 1),
    (0, 2),
    (3, 0),
    (2, 1),
    (1, 2),
    (0, 3),
];

/// Evaluates term `index` of the monomial basis at `(e, n)`.
///
/// The basis is `1, e, n, e², e·n, n², e³, e²·n, e·n², n³`.
pub fn term(index: usize, e: f64, n: f64) -> f64 {
    let (pe, pn) = TERM_EXPONENTS[index];
    e.powi(pe) * n.powi(pn)
}

fn fill_terms(order: PolynomialOrder, e: f64, n: f64, out: &mut [f64]) {
    for (i, t) in out.iter_mut().enumerate().take(order.term_count()) {
        *t = term(i, e, n);
    }
}

/// Coefficients of a fitted 2D polynomial, one vector per destination axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCoefficients {
    /// Coefficients producing the destination X.
    pub x: Vec<f64>,
    /// Coefficients producing the destination Y.
    pub y: Vec<f64>,
    /// Offset subtracted from the source coordinate before evaluation.
    pub offset: [f64; 2],
    /// Order of the polynomial.
    pub order: PolynomialOrder,
}

impl PolynomialCoefficients {
    /// Evaluates the polynomial at a source coordinate.
    pub fn evaluate(&self, src: [f64; 2]) -> [f64; 2] {
        let e = src[0] - self.offset[0];
        let n = src[1] - self.offset[1];
        let mut dst = [0.0, 0.0];
        for i in 0..self.order.term_count() {
            let t = term(i, e, n);
            dst[0] += self.x[i] * t;
            dst[1] += self.y[i] * t;
        }
        dst
    }
}

/// Fits a 2D polynomial mapping source to destination coordinates.
///
/// When the number of active points equals the number of terms the system is
/// solved exactly, otherwise the normal equations of the least squares
/// problem are solved.
///
/// # Arguments
///
/// * `points` - The correspondences. Inactive points are skipped.
/// * `offset` - Subtracted from every source coordinate, usually the centroid.
/// * `order` - The polynomial order.
///
/// # Errors
///
/// * [`SolverError::NotEnoughPoints`] if fewer active points than terms.
/// * [`SolverError::Unsolvable`] if the points are degenerate, e.g. collinear.
/// * [`SolverError::OutOfMemory`] if the system cannot be allocated.
///
/// # Example
///
/// ```
/// use georef_core::Correspondence;
/// use georef_linalg::{fit_polynomial, PolynomialOrder};
///
/// let points = [
///     Correspondence::new([0.0, 0.0], [10.0, 20.0]),
///     Correspondence::new([1.0, 0.0], [12.0, 20.0]),
///     Correspondence::new([0.0, 1.0], [10.0, 17.0]),
/// ];
/// let fit = fit_polynomial(&points, [0.0, 0.0], PolynomialOrder::First).unwrap();
///
/// let [x, y] = fit.evaluate([2.0, 2.0]);
/// assert!((x - 14.0).abs() < 1e-9 && (y - 14.0).abs() < 1e-9);
/// ```
pub fn fit_polynomial(
    points: &[Correspondence],
    offset: [f64; 2],
    order: PolynomialOrder,
) -> Result<PolynomialCoefficients, SolverError> {
    let nterms = order.term_count();
    let nactive = points.iter().filter(|p| p.active).count();

    if nactive < nterms {
        return Err(SolverError::NotEnoughPoints {
            required: nterms,
            actual: nactive,
        });
    }

    let (x, y) = if nactive == nterms {
        log::debug!("exact polynomial fit of order {} on {nactive} points", order.degree());
        fit_exact(points, offset, order)?
    } else {
        log::debug!(
            "least squares polynomial fit of order {} on {nactive} points",
            order.degree()
        );
        fit_least_squares(points, offset, order)?
    };

    Ok(PolynomialCoefficients {
        x,
        y,
        offset,
        order,
    })
}

fn fit_exact(
    points: &[Correspondence],
    offset: [f64; 2],
    order: PolynomialOrder,
) -> Result<(Vec<f64>, Vec<f64>), SolverError> {
    let nterms = order.term_count();
    let mut m = SquareMatrix::try_zeros(nterms)?;
    let mut a = try_zeroed_vec(nterms, nterms)?;
    let mut b = try_zeroed_vec(nterms, nterms)?;
    let mut terms = [0.0; 10];

    let mut row = 0;
    for p in points.iter().filter(|p| p.active) {
        if row == nterms {
            break;
        }
        fill_terms(order, p.src[0] - offset[0], p.src[1] - offset[1], &mut terms);
        for (j, t) in terms.iter().take(nterms).enumerate() {
            m[(row, j)] = *t;
        }
        a[row] = p.dst[0];
        b[row] = p.dst[1];
        row += 1;
    }

    if row != nterms {
        return Err(SolverError::Internal(format!(
            "populated {row} rows for {nterms} terms"
        )));
    }

    solve_pair(&m, &a, &b)
}

fn fit_least_squares(
    points: &[Correspondence],
    offset: [f64; 2],
    order: PolynomialOrder,
) -> Result<(Vec<f64>, Vec<f64>), SolverError> {
    let nterms = order.term_count();
    let mut m = SquareMatrix::try_zeros(nterms)?;
    let mut a = try_zeroed_vec(nterms, nterms)?;
    let mut b = try_zeroed_vec(nterms, nterms)?;
    let mut terms = [0.0; 10];

    let mut nactive = 0;
    for p in points.iter().filter(|p| p.active) {
        nactive += 1;
        fill_terms(order, p.src[0] - offset[0], p.src[1] - offset[1], &mut terms);

        for i in 0..nterms {
            for j in i..nterms {
                m[(i, j)] += terms[i] * terms[j];
            }
            a[i] += p.dst[0] * terms[i];
            b[i] += p.dst[1] * terms[i];
        }
    }

    if nactive <= nterms {
        return Err(SolverError::NotEnoughPoints {
            required: nterms + 1,
            actual: nactive,
        });
    }

    // mirror the upper triangle
    for i in 1..nterms {
        for j in 0..i {
            m[(i, j)] = m[(j, i)];
        }
    }

    solve_pair(&m, &a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn affine(src: [f64; 2]) -> [f64; 2] {
        [
            300.0 + 2.5 * src[0] - 0.75 * src[1],
            -40.0 + 0.5 * src[0] + 1.25 * src[1],
        ]
    }

    #[test]
    fn test_term_basis() {
        let (e, n) = (2.0, 3.0);
        let expected = [1.0, 2.0, 3.0, 4.0, 6.0, 9.0, 8.0, 12.0, 18.0, 27.0];
        for (i, v) in expected.iter().enumerate() {
            assert_eq!(term(i, e, n), *v);
        }
    }

    #[test]
    fn test_exact_first_order() -> Result<(), SolverError> {
        let srcs = [[0.0, 0.0], [10.0, 0.0], [3.0, 7.0]];
        let points = srcs
            .iter()
            .map(|&s| Correspondence::new(s, affine(s)))
            .collect::<Vec<_>>();
        let fit = fit_polynomial(&points, [0.0, 0.0], PolynomialOrder::First)?;

        for p in &points {
            let [x, y] = fit.evaluate(p.src);
            assert_relative_eq!(x, p.dst[0], epsilon = 1e-9);
            assert_relative_eq!(y, p.dst[1], epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_least_squares_with_offset() -> Result<(), SolverError> {
        let srcs = [
            [0.0, 0.0],
            [10.0, 0.0],
            [0.0, 10.0],
            [10.0, 10.0],
            [5.0, 2.0],
            [7.0, 9.0],
        ];
        let points = srcs
            .iter()
            .map(|&s| Correspondence::new(s, affine(s)))
            .collect::<Vec<_>>();
        let fit = fit_polynomial(&points, [5.5, 5.1], PolynomialOrder::First)?;

        for p in &points {
            let [x, y] = fit.evaluate(p.src);
            assert_relative_eq!(x, p.dst[0], epsilon = 1e-9);
            assert_relative_eq!(y, p.dst[1], epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_second_order_exact_on_quadratic() -> Result<(), SolverError> {
        let f = |s: [f64; 2]| {
            [
                1.0 + s[0] + 0.1 * s[0] * s[1],
                2.0 - s[1] + 0.05 * s[0] * s[0],
            ]
        };
        let points = (0..4)
            .flat_map(|i| (0..3).map(move |j| [i as f64 * 3.0, j as f64 * 4.0]))
            .map(|s| Correspondence::new(s, f(s)))
            .collect::<Vec<_>>();
        let fit = fit_polynomial(&points, [4.5, 4.0], PolynomialOrder::Second)?;

        let [x, y] = fit.evaluate([2.0, 5.0]);
        let [ex, ey] = f([2.0, 5.0]);
        assert_relative_eq!(x, ex, epsilon = 1e-8);
        assert_relative_eq!(y, ey, epsilon = 1e-8);
        Ok(())
    }

    #[test]
    fn test_inactive_points_skipped() {
        let mut points = vec![
            Correspondence::new([0.0, 0.0], [0.0, 0.0]),
            Correspondence::new([1.0, 0.0], [1.0, 0.0]),
            Correspondence::new([0.0, 1.0], [0.0, 1.0]),
        ];
        points[2].active = false;
        assert_eq!(
            fit_polynomial(&points, [0.0, 0.0], PolynomialOrder::First),
            Err(SolverError::NotEnoughPoints {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_order_from_u8() {
        assert_eq!(PolynomialOrder::try_from(2), Ok(PolynomialOrder::Second));
        assert!(PolynomialOrder::try_from(4).is_err());
        assert_eq!(PolynomialOrder::Third.term_count(), 10);
    }
}
