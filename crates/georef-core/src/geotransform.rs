use serde::{Deserialize, Serialize};

use crate::GeoTransformError;

/// A 6-term affine geotransform.
///
/// The coefficients follow the usual raster layout:
///
/// ```text
/// x = gt[0] + pixel * gt[1] + line * gt[2]
/// y = gt[3] + pixel * gt[4] + line * gt[5]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform(pub [f64; 6]);

impl Default for GeoTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GeoTransform {
    /// Returns the identity geotransform.
    pub fn identity() -> Self {
        Self([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Returns the all-zero geotransform, used as the placeholder of a
    /// degenerate fit.
    pub fn zeroed() -> Self {
        Self([0.0; 6])
    }

    /// Returns true if every coefficient is zero.
    pub fn is_zeroed(&self) -> bool {
        self.0.iter().all(|&c| c == 0.0)
    }

    /// Returns the raw coefficients.
    pub fn coeffs(&self) -> &[f64; 6] {
        &self.0
    }

    /// Applies the geotransform to a pixel/line location.
    ///
    /// # Examples
    ///
    /// ```
    /// use georef_core::GeoTransform;
    ///
    /// let gt = GeoTransform([100.0, 2.0, 0.0, 50.0, 0.0, -2.0]);
    /// assert_eq!(gt.apply(1.0, 1.0), [102.0, 48.0]);
    /// ```
    pub fn apply(&self, pixel: f64, line: f64) -> [f64; 2] {
        let gt = &self.0;
        [
            gt[0] + pixel * gt[1] + line * gt[2],
            gt[3] + pixel * gt[4] + line * gt[5],
        ]
    }

    /// Applies only the linear part of the geotransform to a displacement.
    pub fn apply_linear(&self, dx: f64, dy: f64) -> [f64; 2] {
        let gt = &self.0;
        [dx * gt[1] + dy * gt[2], dx * gt[4] + dy * gt[5]]
    }

    /// Inverts the geotransform.
    ///
    /// The 2x2 linear part is inverted and the translation recomputed so that
    /// `inv.apply(gt.apply(p, l)) == (p, l)`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoTransformError::NotInvertible`] if the determinant of the
    /// linear part is exactly zero.
    pub fn invert(&self) -> Result<Self, GeoTransformError> {
        let gt = &self.0;

        let determinant = gt[1] * gt[5] - gt[2] * gt[4];
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(GeoTransformError::NotInvertible);
        }
        let inv_determinant = 1.0 / determinant;

        Ok(Self([
            (gt[2] * gt[3] - gt[0] * gt[5]) * inv_determinant,
            gt[5] * inv_determinant,
            -gt[2] * inv_determinant,
            (-gt[1] * gt[3] + gt[0] * gt[4]) * inv_determinant,
            -gt[4] * inv_determinant,
            gt[1] * inv_determinant,
        ]))
    }
}

/// A 12-term geotransform with second order terms.
///
/// ```text
/// x = gt[0] + p*gt[1] + l*gt[2] + p*p*gt[6] + l*l*gt[7]  + p*l*gt[8]
/// y = gt[3] + p*gt[4] + l*gt[5] + p*p*gt[9] + l*l*gt[10] + p*l*gt[11]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticGeoTransform(pub [f64; 12]);

impl From<GeoTransform> for QuadraticGeoTransform {
    fn from(gt: GeoTransform) -> Self {
        let mut coeffs = [0.0; 12];
        coeffs[..6].copy_from_slice(&gt.0);
        Self(coeffs)
    }
}

impl QuadraticGeoTransform {
    /// Returns the raw coefficients.
    pub fn coeffs(&self) -> &[f64; 12] {
        &self.0
    }

    /// Applies the geotransform to a pixel/line location.
    pub fn apply(&self, pixel: f64, line: f64) -> [f64; 2] {
        let gt = &self.0;
        let (pp, ll, pl) = (pixel * pixel, line * line, pixel * line);
        [
            gt[0] + pixel * gt[1] + line * gt[2] + pp * gt[6] + ll * gt[7] + pl * gt[8],
            gt[3] + pixel * gt[4] + line * gt[5] + pp * gt[9] + ll * gt[10] + pl * gt[11],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invert_roundtrip() -> Result<(), GeoTransformError> {
        let gt = GeoTransform([440720.0, 60.0, 0.5, 3751320.0, -0.25, -60.0]);
        let inv = gt.invert()?;

        for &(p, l) in &[(0.0, 0.0), (10.0, 20.0), (-3.5, 1000.25)] {
            let [x, y] = gt.apply(p, l);
            let [p2, l2] = inv.apply(x, y);
            assert_relative_eq!(p2, p, epsilon = 1e-8);
            assert_relative_eq!(l2, l, epsilon = 1e-8);
        }
        Ok(())
    }

    #[test]
    fn test_invert_singular() {
        let gt = GeoTransform([1.0, 2.0, 4.0, 3.0, 1.0, 2.0]);
        assert_eq!(gt.invert(), Err(GeoTransformError::NotInvertible));
        assert_eq!(
            GeoTransform::zeroed().invert(),
            Err(GeoTransformError::NotInvertible)
        );
    }

    #[test]
    fn test_quadratic_matches_affine_without_second_order() {
        let gt = GeoTransform([5.0, 1.5, -0.5, 7.0, 0.25, 2.0]);
        let q = QuadraticGeoTransform::from(gt);
        assert_eq!(q.apply(3.0, -4.0), gt.apply(3.0, -4.0));
    }

    #[test]
    fn test_quadratic_terms() {
        let mut coeffs = [0.0; 12];
        coeffs[6] = 1.0; // p*p
        coeffs[8] = 2.0; // p*l
        coeffs[10] = 3.0; // l*l
        let q = QuadraticGeoTransform(coeffs);
        assert_eq!(q.apply(2.0, 3.0), [4.0 + 12.0, 27.0]);
    }
}
