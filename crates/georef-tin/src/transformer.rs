use std::sync::Arc;

use georef_core::{
    check_batch, Correspondence, Gcp, GeoTransform, TransformDirection, TransformError,
    Transformer,
};
use georef_linalg::{fit_affine, AffineFit};

use crate::{TinError, Triangulation};

/// Affine transforms of one facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetAffine {
    /// Maps pixel/line to ground.
    pub forward: GeoTransform,
    /// Maps ground to pixel/line.
    pub inverse: GeoTransform,
}

impl FacetAffine {
    fn zeroed() -> Self {
        Self {
            forward: GeoTransform::zeroed(),
            inverse: GeoTransform::zeroed(),
        }
    }
}

impl From<AffineFit> for FacetAffine {
    fn from(fit: AffineFit) -> Self {
        Self {
            forward: fit.forward,
            inverse: fit.inverse,
        }
    }
}

/// The solved network, shared by transformers at the same scale.
#[derive(Debug)]
struct TinModel {
    gcps: Vec<Gcp>,
    global: AffineFit,
    // keyed on ground coordinates
    ground: Triangulation,
    // same facets keyed on pixel/line
    image: Triangulation,
    affines: Vec<FacetAffine>,
}

impl TinModel {
    fn solve(gcps: &[Gcp]) -> Result<Self, TinError> {
        if gcps.len() < 3 {
            return Err(TinError::NotEnoughPoints(gcps.len()));
        }

        let ground_points: Vec<[f64; 2]> = gcps.iter().map(|g| [g.x, g.y]).collect();
        let image_points: Vec<[f64; 2]> = gcps.iter().map(|g| [g.pixel, g.line]).collect();

        let ground = Triangulation::delaunay(&ground_points)?;
        let image = ground.mirrored(&image_points);

        let correspondences: Vec<Correspondence> =
            gcps.iter().map(Gcp::correspondence).collect();
        let global = fit_affine(&correspondences).unwrap_or_else(|err| {
            log::warn!("global affine fallback is zeroed: {err}");
            AffineFit {
                forward: GeoTransform::zeroed(),
                inverse: GeoTransform::zeroed(),
            }
        });

        let affines = ground
            .facets()
            .iter()
            .enumerate()
            .map(|(i, facet)| {
                let corners = facet.vertices.map(|v| correspondences[v]);
                match fit_affine(&corners) {
                    Ok(fit) => FacetAffine::from(fit),
                    Err(err) => {
                        log::debug!("facet {i} has no affine transform: {err}");
                        FacetAffine::zeroed()
                    }
                }
            })
            .collect();

        log::debug!(
            "solved TIN over {} control points, {} facets",
            gcps.len(),
            ground.len()
        );

        Ok(Self {
            gcps: gcps.to_vec(),
            global,
            ground,
            image,
            affines,
        })
    }
}

/// A piecewise affine transformer over a triangulated network of ground
/// control points.
///
/// The network is built on the ground coordinates of the control points.
/// Inside a facet the transform is the exact affine through its three
/// vertices, so it interpolates every control point. Outside the network
/// the best-fit affine over all points is used, hence no point ever fails.
///
/// The forward direction maps pixel/line to ground unless the transformer
/// is reversed.
///
/// # Examples
///
/// ```
/// use georef_core::{Gcp, TransformDirection, Transformer};
/// use georef_tin::TinTransformer;
///
/// let gcps = [
///     Gcp::new(0.0, 0.0, 0.0, 0.0),
///     Gcp::new(1.0, 0.0, 2.0, 0.0),
///     Gcp::new(0.0, 1.0, 0.0, 2.0),
///     Gcp::new(1.0, 1.0, 2.0, 2.0),
/// ];
/// let tin = TinTransformer::new(&gcps, false).unwrap();
///
/// let [x, y] = tin
///     .transform_point(TransformDirection::Forward, 0.25, 0.5, 0.0)
///     .unwrap();
/// assert!((x - 0.5).abs() < 1e-12 && (y - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct TinTransformer {
    model: Arc<TinModel>,
    reversed: bool,
}

impl TinTransformer {
    /// Builds the network of a set of control points.
    ///
    /// # Arguments
    ///
    /// * `gcps` - The control points, at least three.
    /// * `reversed` - Swap the forward and inverse directions.
    ///
    /// # Errors
    ///
    /// * [`TinError::NotEnoughPoints`] with fewer than three points.
    /// * [`TinError::Triangulation`] if the ground coordinates are collinear
    ///   or coincident.
    ///
    /// A best-fit affine that cannot be solved, for instance over collinear
    /// pixel/line coordinates, is replaced by a zeroed transform.
    pub fn new(gcps: &[Gcp], reversed: bool) -> Result<Self, TinError> {
        Ok(Self {
            model: Arc::new(TinModel::solve(gcps)?),
            reversed,
        })
    }

    /// Returns a transformer for an image resampled by the given ratios.
    ///
    /// At unit ratios the solved network is shared, otherwise it is rebuilt
    /// from control points whose pixel/line are divided by the ratios.
    ///
    /// # Errors
    ///
    /// Same as [`TinTransformer::new`].
    pub fn create_similar(&self, ratio_x: f64, ratio_y: f64) -> Result<Self, TinError> {
        if ratio_x == 1.0 && ratio_y == 1.0 {
            return Ok(self.clone());
        }

        let gcps: Vec<Gcp> = self
            .model
            .gcps
            .iter()
            .map(|g| Gcp {
                pixel: g.pixel / ratio_x,
                line: g.line / ratio_y,
                ..g.clone()
            })
            .collect();
        Self::new(&gcps, self.reversed)
    }

    /// Returns how many transformers share the solved network.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.model)
    }

    /// Returns the control points.
    pub fn gcps(&self) -> &[Gcp] {
        &self.model.gcps
    }

    /// Whether the forward and inverse directions are swapped.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns the best-fit affine over all control points.
    pub fn global(&self) -> &AffineFit {
        &self.model.global
    }

    /// Returns the network keyed on ground coordinates.
    pub fn triangulation(&self) -> &Triangulation {
        &self.model.ground
    }

    /// Returns the affine transforms, indexed like the facets.
    pub fn facet_affines(&self) -> &[FacetAffine] {
        &self.model.affines
    }

    // pixel/line to ground when `to_ground`, ground to pixel/line otherwise
    fn transform_one(&self, to_ground: bool, x: f64, y: f64, hint: &mut usize) -> [f64; 2] {
        let model = &self.model;
        let tin = if to_ground { &model.image } else { &model.ground };

        let gt = match tin.find_facet_directed(*hint, x, y) {
            Some(facet) => {
                *hint = facet;
                let affine = &model.affines[facet];
                if to_ground {
                    &affine.forward
                } else {
                    &affine.inverse
                }
            }
            None if to_ground => &model.global.forward,
            None => &model.global.inverse,
        };
        gt.apply(x, y)
    }
}

impl Transformer for TinTransformer {
    fn transform(
        &self,
        direction: TransformDirection,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&mut [f64]>,
        success: &mut [bool],
    ) -> Result<(), TransformError> {
        check_batch(x, y, z.as_deref(), success)?;

        let to_ground = direction.resolve(self.reversed) == TransformDirection::Forward;
        let mut hint = 0;

        for ((xi, yi), ok) in x.iter_mut().zip(y.iter_mut()).zip(success.iter_mut()) {
            [*xi, *yi] = self.transform_one(to_ground, *xi, *yi, &mut hint);
            *ok = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Gcp> {
        vec![
            Gcp::new(0.0, 0.0, 0.0, 0.0),
            Gcp::new(1.0, 0.0, 2.0, 0.0),
            Gcp::new(0.0, 1.0, 0.0, 2.0),
            Gcp::new(1.0, 1.0, 2.0, 2.0),
            Gcp::new(0.5, 0.5, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_unit_square_with_center() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TinTransformer::new(&unit_square(), false)?;
        assert_eq!(tin.triangulation().len(), 4);

        let ground = tin
            .transform_point(TransformDirection::Forward, 0.5, 0.5, 0.0)
            .ok_or("no ground point")?;
        assert_relative_eq!(ground[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ground[1], 1.0, epsilon = 1e-12);

        let image = tin
            .transform_point(TransformDirection::Inverse, 1.0, 1.0, 0.0)
            .ok_or("no image point")?;
        assert_relative_eq!(image[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(image[1], 0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_not_enough_points() {
        let gcps = &unit_square()[..2];
        assert!(matches!(
            TinTransformer::new(gcps, false),
            Err(TinError::NotEnoughPoints(2))
        ));
    }

    #[test]
    fn test_collinear_points() {
        let gcps: Vec<Gcp> = (0..5)
            .map(|i| Gcp::new(i as f64, 0.0, i as f64, i as f64))
            .collect();
        assert!(matches!(
            TinTransformer::new(&gcps, false),
            Err(TinError::Triangulation(5))
        ));
    }

    #[test]
    fn test_unsolvable_global_affine_is_zeroed() -> Result<(), Box<dyn std::error::Error>> {
        // ground spans a triangle but pixel/line are collinear
        let gcps = [
            Gcp::new(0.0, 0.0, 0.0, 0.0),
            Gcp::new(1.0, 1.0, 2.0, 0.0),
            Gcp::new(2.0, 2.0, 0.0, 2.0),
            Gcp::new(3.0, 3.0, 2.0, 2.0),
        ];
        let tin = TinTransformer::new(&gcps, false)?;
        assert!(tin.global().forward.is_zeroed());
        assert!(tin.global().inverse.is_zeroed());

        let [p, l] = tin
            .transform_point(TransformDirection::Forward, -5.0, 7.0, 0.0)
            .ok_or("no ground point")?;
        assert_eq!([p, l], [0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_outside_uses_global_affine() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TinTransformer::new(&unit_square(), false)?;

        let mut x = [10.0];
        let mut y = [-4.0];
        let mut ok = [false];
        tin.transform(TransformDirection::Inverse, &mut x, &mut y, None, &mut ok)?;

        assert!(ok[0]);
        let [p, l] = tin.global().inverse.apply(10.0, -4.0);
        assert_eq!([x[0], y[0]], [p, l]);
        assert_relative_eq!(p, 5.0, epsilon = 1e-9);
        assert_relative_eq!(l, -2.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_heights_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TinTransformer::new(&unit_square(), false)?;
        let mut x = [0.2, 0.7];
        let mut y = [0.3, 0.9];
        let mut z = [12.0, -3.0];
        let mut ok = [false; 2];
        tin.transform(TransformDirection::Forward, &mut x, &mut y, Some(&mut z), &mut ok)?;
        assert_eq!(z, [12.0, -3.0]);
        assert_eq!(ok, [true, true]);
        Ok(())
    }

    #[test]
    fn test_reversed() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TinTransformer::new(&unit_square(), true)?;
        let image = tin
            .transform_point(TransformDirection::Forward, 1.0, 1.0, 0.0)
            .ok_or("no image point")?;
        assert_relative_eq!(image[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(image[1], 0.5, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_create_similar() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TinTransformer::new(&unit_square(), false)?;
        assert_eq!(tin.share_count(), 1);

        let shared = tin.create_similar(1.0, 1.0)?;
        assert_eq!(tin.share_count(), 2);
        assert_eq!(shared.share_count(), 2);

        let half = tin.create_similar(2.0, 2.0)?;
        assert_eq!(half.share_count(), 1);
        assert_eq!(half.gcps()[1].pixel, 0.5);
        let ground = half
            .transform_point(TransformDirection::Forward, 0.25, 0.25, 0.0)
            .ok_or("no ground point")?;
        assert_relative_eq!(ground[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ground[1], 1.0, epsilon = 1e-12);

        drop(shared);
        assert_eq!(tin.share_count(), 1);
        Ok(())
    }
}
