use crate::CollinearityModel;

/// Rotation matrix of the collinearity equations.
///
/// `0[i][j]` is the coefficient `a(i+1)(j+1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [[f64; 3]; 3]);

impl RotationMatrix {
    /// Builds the rotation from omega, phi and kappa in radians.
    pub fn from_angles(omega: f64, phi: f64, kappa: f64) -> Self {
        let (so, co) = omega.sin_cos();
        let (sp, cp) = phi.sin_cos();
        let (sk, ck) = kappa.sin_cos();

        Self([
            [cp * ck - sp * so * sk, -(cp * sk) - sp * so * ck, -(sp * co)],
            [co * sk, co * ck, -so],
            [sp * ck + cp * so * sk, -(sp * sk) + cp * so * ck, cp * co],
        ])
    }
}

/// Projects ground coordinates into the image with the collinearity equations.
///
/// Only the first coefficient of each attitude series is used and no lens
/// distortion or pixel size correction is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollinearityProjector {
    rotation: RotationMatrix,
    center: [f64; 3],
    focal_length: f64,
}

impl CollinearityProjector {
    /// Creates the projector of a model.
    pub fn new(model: &CollinearityModel) -> Self {
        let e = &model.exterior;
        Self {
            rotation: RotationMatrix::from_angles(e.omega[0], e.phi[0], e.kappa[0]),
            center: [e.xs, e.ys, e.zs],
            focal_length: model.interior.focal_length,
        }
    }

    /// Returns the rotation matrix.
    pub fn rotation(&self) -> &RotationMatrix {
        &self.rotation
    }

    /// Projects a ground point to pixel/line.
    ///
    /// # Arguments
    ///
    /// * `x` - Ground X.
    /// * `y` - Ground Y.
    /// * `height` - Height of the point.
    ///
    /// # Returns
    ///
    /// The `[pixel, line]` location.
    pub fn project(&self, x: f64, y: f64, height: f64) -> [f64; 2] {
        let a = &self.rotation.0;
        let [xs, ys, zs] = self.center;
        let f = self.focal_length;

        let denom = a[2][0] * x + a[2][1] * y - a[2][2] * f;
        let (dx, dy, dz) = (x - xs, y - ys, height - zs);

        [
            -f * ((a[0][0] * dx + a[1][0] * dy + a[2][0] * dz) / denom),
            -f * ((a[0][1] * dx + a[1][1] * dy + a[2][1] * dz) / denom),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExteriorOrientation;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = RotationMatrix::from_angles(0.1, -0.2, 0.7).0;
        for i in 0..3 {
            for j in 0..3 {
                let dot: f64 = (0..3).map(|k| r[i][k] * r[j][k]).sum();
                assert_relative_eq!(dot, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_level_camera_is_a_translation() {
        let mut model = CollinearityModel {
            exterior: ExteriorOrientation {
                xs: 100.0,
                ys: 200.0,
                zs: 1000.0,
                ..Default::default()
            },
            ..Default::default()
        };
        model.interior.focal_length = 50.0;

        let projector = CollinearityProjector::new(&model);
        let [p, l] = projector.project(130.0, 170.0, 25.0);
        assert_relative_eq!(p, 30.0, epsilon = 1e-12);
        assert_relative_eq!(l, -30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_project_tilted_camera() {
        let mut model = CollinearityModel::default();
        model.interior.focal_length = 50.0;
        model.exterior = ExteriorOrientation {
            xs: 100.0,
            ys: 200.0,
            zs: 1000.0,
            omega: [0.01, 0.0, 0.0],
            phi: [0.02, 0.0, 0.0],
            kappa: [0.03, 0.0, 0.0],
        };

        let [p, l] = CollinearityProjector::new(&model).project(100.0, 200.0, 0.0);
        assert_relative_eq!(p, -22.01565006675091, epsilon = 1e-9);
        assert_relative_eq!(l, -10.192594274747188, epsilon = 1e-9);
    }
}
