use georef_core::{Correspondence, GeoTransform};

use crate::{fit_polynomial, PolynomialOrder, SolverError};

/// A best-fit affine geotransform together with its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineFit {
    /// Maps source to destination coordinates.
    pub forward: GeoTransform,
    /// Maps destination back to source coordinates.
    pub inverse: GeoTransform,
}

/// Computes the best-fit affine geotransform of a set of correspondences.
///
/// A first order polynomial is fitted around the centroid of the active
/// source coordinates and the centroid is folded back into the translation
/// terms.
///
/// # Arguments
///
/// * `points` - At least three active correspondences.
///
/// # Returns
///
/// The forward geotransform (source to destination) and its inverse.
///
/// # Errors
///
/// * [`SolverError::NotEnoughPoints`] if fewer than three points are active.
/// * [`SolverError::Unsolvable`] if the points are collinear or the fitted
///   geotransform is not invertible.
pub fn fit_affine(points: &[Correspondence]) -> Result<AffineFit, SolverError> {
    let (sum, count) = points
        .iter()
        .filter(|p| p.active)
        .fold(([0.0, 0.0], 0usize), |(s, c), p| {
            ([s[0] + p.src[0], s[1] + p.src[1]], c + 1)
        });
    let mean = if count > 0 {
        [sum[0] / count as f64, sum[1] / count as f64]
    } else {
        [0.0, 0.0]
    };

    let fit = fit_polynomial(points, mean, PolynomialOrder::First)?;
    let (cx, cy) = (&fit.x, &fit.y);

    let forward = GeoTransform([
        cx[0] - cx[1] * mean[0] - cx[2] * mean[1],
        cx[1],
        cx[2],
        cy[0] - cy[1] * mean[0] - cy[2] * mean[1],
        cy[1],
        cy[2],
    ]);
    let inverse = forward.invert()?;

    Ok(AffineFit { forward, inverse })
}
