use georef_core::{Correspondence, QuadraticGeoTransform};

use crate::{fit_polynomial, PolynomialOrder, SolverError};

const GRID_STEPS: usize = 100;
const GRID_ORIGIN: f64 = -500.0;
const GRID_SPACING: f64 = 10.0;

/// Inverts a quadratic geotransform by resampling it.
///
/// The forward transform is evaluated on a regular 100 x 100 grid covering
/// `[-500, 490]` in both pixel and line, and a second order polynomial is
/// fitted from the projected coordinates back to the grid.
///
/// # Arguments
///
/// * `gt` - The forward geotransform, pixel/line to X/Y.
///
/// # Returns
///
/// The inverse geotransform, X/Y to pixel/line.
///
/// # Errors
///
/// Returns the error of the underlying fit, typically
/// [`SolverError::Unsolvable`] when the forward transform collapses the grid.
pub fn invert_quadratic_geotransform(
    gt: &QuadraticGeoTransform,
) -> Result<QuadraticGeoTransform, SolverError> {
    let mut points = Vec::new();
    points
        .try_reserve_exact(GRID_STEPS * GRID_STEPS)
        .map_err(|_| SolverError::OutOfMemory(GRID_STEPS * GRID_STEPS))?;

    for y in 0..GRID_STEPS {
        for x in 0..GRID_STEPS {
            let pixel = GRID_ORIGIN + x as f64 * GRID_SPACING;
            let line = GRID_ORIGIN + y as f64 * GRID_SPACING;
            points.push(Correspondence::new(gt.apply(pixel, line), [pixel, line]));
        }
    }

    let fit = fit_polynomial(&points, [0.0, 0.0], PolynomialOrder::Second)?;
    let (cx, cy) = (&fit.x, &fit.y);

    // terms are 1, x, y, x², xy, y²
    Ok(QuadraticGeoTransform([
        cx[0], cx[1], cx[2], cy[0], cy[1], cy[2], cx[3], cx[5], cx[4], cy[3], cy[5], cy[4],
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use georef_core::GeoTransform;

    #[test]
    fn test_invert_affine_as_quadratic() -> Result<(), SolverError> {
        let gt = GeoTransform([1000.0, 2.0, 0.0, 2000.0, 0.0, -2.0]);
        let inv = invert_quadratic_geotransform(&gt.into())?;

        let [p, l] = inv.apply(1020.0, 1980.0);
        assert_relative_eq!(p, 10.0, epsilon = 1e-4);
        assert_relative_eq!(l, 10.0, epsilon = 1e-4);
        for c in &inv.coeffs()[6..] {
            assert_relative_eq!(*c, 0.0, epsilon = 1e-8);
        }
        Ok(())
    }

    #[test]
    fn test_invert_mild_quadratic() -> Result<(), SolverError> {
        let mut coeffs = [0.0; 12];
        coeffs[..6].copy_from_slice(&[10.0, 1.0, 0.1, -5.0, -0.05, 1.0]);
        coeffs[6] = 1e-5;
        coeffs[11] = -2e-5;
        let gt = QuadraticGeoTransform(coeffs);
        let inv = invert_quadratic_geotransform(&gt)?;

        for &(p, l) in &[(0.0, 0.0), (100.0, -50.0), (-200.0, 300.0)] {
            let [x, y] = gt.apply(p, l);
            let [p2, l2] = inv.apply(x, y);
            assert_relative_eq!(p2, p, epsilon = 0.5);
            assert_relative_eq!(l2, l, epsilon = 0.5);
        }
        Ok(())
    }

    #[test]
    fn test_invert_degenerate() {
        let gt = QuadraticGeoTransform([0.0; 12]);
        assert!(invert_quadratic_geotransform(&gt).is_err());
    }
}
