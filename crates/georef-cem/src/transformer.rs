use std::sync::{Arc, OnceLock};

use georef_core::{
    check_batch, Correspondence, GeoTransform, TransformDirection, TransformError, Transformer,
};
use georef_dem::{DemProvider, DemSampler};
use georef_linalg::{fit_affine, SolverError};

use crate::{CemError, CemOptions, CollinearityModel, CollinearityProjector};

/// Maximum number of iterations of the image to ground solution.
pub const MAX_ITERATIONS: usize = 10;

/// Default pixel error threshold of the image to ground solution.
pub const DEFAULT_PIX_ERR_THRESHOLD: f64 = 0.25;

// ground offset used to estimate the local image to ground geotransform
const SEED_DELTA: f64 = 1e-4;

/// Result of the iterative image to ground solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseSolution {
    /// Ground X.
    pub x: f64,
    /// Ground Y.
    pub y: f64,
    /// The number of iterations performed.
    pub iterations: usize,
    /// Whether the residual fell below the threshold.
    pub converged: bool,
}

/// Outcome of one point of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointStatus {
    /// Whether the point was transformed.
    pub success: bool,
    /// Iterations of the image to ground solution, zero for ground to image.
    pub iterations: usize,
    /// Whether the image to ground solution converged. Always true for ground to image.
    pub converged: bool,
}

impl PointStatus {
    fn failed() -> Self {
        Self::default()
    }

    fn exact() -> Self {
        Self {
            success: true,
            iterations: 0,
            converged: true,
        }
    }
}

impl From<&InverseSolution> for PointStatus {
    fn from(solution: &InverseSolution) -> Self {
        Self {
            success: true,
            iterations: solution.iterations,
            converged: solution.converged,
        }
    }
}

/// A transformer between image pixel/line and ground coordinates based on
/// the collinearity equations.
///
/// Ground to image is evaluated directly. Image to ground is solved by
/// iterating from a local affine approximation until the reprojection error
/// falls below the pixel error threshold, or for at most
/// [`MAX_ITERATIONS`] iterations.
///
/// The forward direction maps pixel/line to ground unless the transformer
/// is reversed.
pub struct CemTransformer {
    model: CollinearityModel,
    projector: CollinearityProjector,
    pixel_to_ground: GeoTransform,
    reversed: bool,
    pix_err_threshold: f64,
    options: CemOptions,
    dem_provider: Option<Arc<dyn DemProvider>>,
    dem: OnceLock<Option<DemSampler>>,
}

impl std::fmt::Debug for CemTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CemTransformer")
            .field("model", &self.model)
            .field("pixel_to_ground", &self.pixel_to_ground)
            .field("reversed", &self.reversed)
            .field("pix_err_threshold", &self.pix_err_threshold)
            .field("options", &self.options)
            .field("dem", &self.dem.get())
            .finish()
    }
}

impl CemTransformer {
    /// Creates a transformer.
    ///
    /// # Arguments
    ///
    /// * `model` - The sensor model.
    /// * `reversed` - Swap the forward and inverse directions.
    /// * `pix_err_threshold` - Error in pixels accepted by the image to ground
    ///   solution. Zero runs every iteration.
    /// * `options` - Height and elevation model options.
    ///
    /// # Errors
    ///
    /// Returns [`CemError::SeedNotInvertible`] if the local affine
    /// approximation around the perspective center is degenerate.
    pub fn new(
        model: CollinearityModel,
        reversed: bool,
        pix_err_threshold: f64,
        options: CemOptions,
    ) -> Result<Self, CemError> {
        let projector = CollinearityProjector::new(&model);

        // project the nadir reference and two nearby ground points
        let e = &model.exterior;
        let seeds = [
            [e.xs, e.ys],
            [e.xs + SEED_DELTA, e.ys],
            [e.xs, e.ys + SEED_DELTA],
        ]
        .map(|[x, y]| Correspondence::new([x, y], projector.project(x, y, 0.0)));

        // ground to image, inverted to image to ground
        let fit = match fit_affine(&seeds) {
            Ok(fit) => fit,
            Err(SolverError::Unsolvable) => return Err(CemError::SeedNotInvertible),
            Err(err) => return Err(err.into()),
        };

        log::debug!(
            "CEM transformer: pixel to ground seed {:?}",
            fit.inverse.coeffs()
        );

        Ok(Self {
            model,
            projector,
            pixel_to_ground: fit.inverse,
            reversed,
            pix_err_threshold,
            options,
            dem_provider: None,
            dem: OnceLock::new(),
        })
    }

    /// Sets the provider used to open the elevation model on first use.
    pub fn with_dem_provider(mut self, provider: Arc<dyn DemProvider>) -> Self {
        self.dem_provider = Some(provider);
        self
    }

    /// Returns the sensor model.
    pub fn model(&self) -> &CollinearityModel {
        &self.model
    }

    /// Returns the options.
    pub fn options(&self) -> &CemOptions {
        &self.options
    }

    /// Returns true if the forward and inverse directions are swapped.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns the pixel error threshold.
    pub fn pix_err_threshold(&self) -> f64 {
        self.pix_err_threshold
    }

    /// Returns the affine approximation from pixel/line to ground.
    pub fn pixel_to_ground(&self) -> &GeoTransform {
        &self.pixel_to_ground
    }

    /// Returns the elevation model, opening it on the first call.
    ///
    /// A failure to open is logged once and the transformer then works
    /// without elevation model.
    pub fn dem(&self) -> Option<&DemSampler> {
        self.dem
            .get_or_init(|| {
                let path = self.options.dem_path.as_deref()?;
                let Some(provider) = &self.dem_provider else {
                    log::warn!("no elevation model provider to open {path}");
                    return None;
                };
                match DemSampler::bind(provider.as_ref(), path, self.options.dem_interpolation) {
                    Ok(sampler) => Some(sampler),
                    Err(err) => {
                        log::warn!("cannot use elevation model {path}: {err}");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Projects a ground point to pixel/line.
    pub fn project(&self, x: f64, y: f64, height: f64) -> [f64; 2] {
        self.projector.project(x, y, height)
    }

    /// Solves the ground location of a pixel/line at a given height.
    ///
    /// The elevation model is not consulted.
    pub fn inverse_point(&self, pixel: f64, line: f64, height: f64) -> InverseSolution {
        let gt = &self.pixel_to_ground;
        let [mut x, mut y] = gt.apply(pixel, line);

        for i in 0..MAX_ITERATIONS {
            let [back_pixel, back_line] = self.projector.project(x, y, height);
            let dp = back_pixel - pixel;
            let dl = back_line - line;

            let [cx, cy] = gt.apply_linear(dp, dl);
            x -= cx;
            y -= cy;

            if dp.abs() < self.pix_err_threshold && dl.abs() < self.pix_err_threshold {
                log::debug!("CEM inverse converged in {} iterations", i + 1);
                return InverseSolution {
                    x,
                    y,
                    iterations: i + 1,
                    converged: true,
                };
            }
        }

        log::debug!(
            "CEM inverse did not converge in {MAX_ITERATIONS} iterations for ({pixel}, {line})"
        );
        InverseSolution {
            x,
            y,
            iterations: MAX_ITERATIONS,
            converged: false,
        }
    }

    fn solve_image(&self, x: f64, y: f64, z: f64) -> Option<[f64; 2]> {
        let terrain = match self.dem() {
            Some(dem) => match dem.height_at_within_block(x, y) {
                Ok(h) => h,
                Err(err) => {
                    log::debug!("no elevation at ({x}, {y}): {err}");
                    return None;
                }
            },
            None => 0.0,
        };
        Some(self.project(x, y, self.options.height(z, terrain)))
    }

    fn solve_ground(&self, pixel: f64, line: f64, z: f64) -> Option<InverseSolution> {
        let flat = self.inverse_point(pixel, line, self.options.height(z, 0.0));
        let Some(dem) = self.dem() else {
            return Some(flat);
        };

        // sample the terrain under the first estimate and solve again
        let terrain = match dem.height_at(flat.x, flat.y) {
            Ok(h) => h,
            Err(err) => {
                log::debug!("no elevation at ({}, {}): {err}", flat.x, flat.y);
                return None;
            }
        };
        Some(self.inverse_point(pixel, line, self.options.height(z, terrain)))
    }

    /// Transforms a batch of points in place and reports the outcome of each.
    ///
    /// Failed points keep their input coordinates. Heights are read but not
    /// modified.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::MismatchedLengths`] if the slices disagree.
    pub fn transform_with_status(
        &self,
        direction: TransformDirection,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&[f64]>,
        status: &mut [PointStatus],
    ) -> Result<(), TransformError> {
        let n = x.len();
        let check = |name, actual| {
            if actual != n {
                Err(TransformError::MismatchedLengths {
                    name,
                    expected: n,
                    actual,
                })
            } else {
                Ok(())
            }
        };
        check("y", y.len())?;
        if let Some(z) = z {
            check("z", z.len())?;
        }
        check("status", status.len())?;

        let direction = direction.resolve(self.reversed);

        for i in 0..n {
            let zi = z.map_or(0.0, |z| z[i]);
            status[i] = match direction {
                TransformDirection::Inverse => match self.solve_image(x[i], y[i], zi) {
                    Some([p, l]) => {
                        x[i] = p;
                        y[i] = l;
                        PointStatus::exact()
                    }
                    None => PointStatus::failed(),
                },
                TransformDirection::Forward => match self.solve_ground(x[i], y[i], zi) {
                    Some(solution) => {
                        x[i] = solution.x;
                        y[i] = solution.y;
                        PointStatus::from(&solution)
                    }
                    None => PointStatus::failed(),
                },
            };
        }

        Ok(())
    }
}

impl Transformer for CemTransformer {
    fn transform(
        &self,
        direction: TransformDirection,
        x: &mut [f64],
        y: &mut [f64],
        z: Option<&mut [f64]>,
        success: &mut [bool],
    ) -> Result<(), TransformError> {
        let z = z.as_deref();
        check_batch(x, y, z, success)?;

        let mut status = vec![PointStatus::default(); x.len()];
        self.transform_with_status(direction, x, y, z, &mut status)?;

        for (ok, s) in success.iter_mut().zip(&status) {
            *ok = s.success;
        }
        Ok(())
    }
}
