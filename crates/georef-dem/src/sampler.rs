use std::sync::Arc;

use georef_core::GeoTransform;

use crate::interpolation::{interpolate_elevation, CellLocation};
use crate::{CoordinateTransform, DemError, DemProvider, ElevationSource, GridSize, ResampleMethod};

/// Looks up terrain heights at ground coordinates.
///
/// Ground coordinates are WGS84 longitude/latitude. When the elevation model
/// declares a different reference system the points are reprojected first,
/// then mapped to fractional cells through the inverse geotransform.
#[derive(Clone)]
pub struct DemSampler {
    source: Arc<dyn ElevationSource>,
    inverse_geo_transform: GeoTransform,
    reprojection: Option<Arc<dyn CoordinateTransform>>,
    method: ResampleMethod,
}

impl std::fmt::Debug for DemSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DemSampler")
            .field("size", &self.source.size())
            .field("inverse_geo_transform", &self.inverse_geo_transform)
            .field("reprojected", &self.reprojection.is_some())
            .field("method", &self.method)
            .finish()
    }
}

impl DemSampler {
    /// Opens an elevation model and prepares it for sampling.
    ///
    /// # Arguments
    ///
    /// * `provider` - Opens the model and builds the reprojection.
    /// * `path` - Location of the model.
    /// * `method` - Interpolation method used by [`DemSampler::height_at`].
    ///
    /// # Errors
    ///
    /// * The open error of the provider.
    /// * [`DemError::NoBands`] if the model has no band.
    /// * [`DemError::NoGeoTransform`] if the model has no invertible geotransform.
    pub fn bind(
        provider: &dyn DemProvider,
        path: &str,
        method: ResampleMethod,
    ) -> Result<Self, DemError> {
        let source = provider.open(path)?;
        if source.band_count() < 1 {
            return Err(DemError::NoBands);
        }

        let inverse_geo_transform = source
            .geo_transform()
            .ok_or(DemError::NoGeoTransform)?
            .invert()
            .map_err(|_| DemError::NoGeoTransform)?;

        let reprojection = source
            .srs()
            .filter(|srs| !srs.is_empty())
            .and_then(|srs| provider.reprojection_from_wgs84(srs));

        log::debug!(
            "bound elevation model {path}: {}, {} interpolation, reprojected: {}",
            source.size(),
            method,
            reprojection.is_some()
        );

        Ok(Self {
            source,
            inverse_geo_transform,
            reprojection,
            method,
        })
    }

    /// Returns the interpolation method.
    pub fn method(&self) -> ResampleMethod {
        self.method
    }

    /// Returns the raster size of the elevation model.
    pub fn size(&self) -> GridSize {
        self.source.size()
    }

    /// Maps a ground coordinate to a fractional cell of the elevation model.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::Reprojection`] if the point cannot be reprojected.
    pub fn to_cell(&self, x: f64, y: f64) -> Result<[f64; 2], DemError> {
        let [gx, gy] = match &self.reprojection {
            Some(ct) => {
                let [rx, ry, _] = ct.transform(x, y, 0.0).ok_or(DemError::Reprojection(x, y))?;
                [rx, ry]
            }
            None => [x, y],
        };
        Ok(self.inverse_geo_transform.apply(gx, gy))
    }

    /// Returns the interpolated terrain height at a ground coordinate.
    ///
    /// # Errors
    ///
    /// * [`DemError::Reprojection`] if the point cannot be reprojected.
    /// * [`DemError::WindowOutOfBounds`] if the interpolation window leaves
    ///   the raster.
    pub fn height_at(&self, x: f64, y: f64) -> Result<f64, DemError> {
        let [col, row] = self.to_cell(x, y)?;
        interpolate_elevation(self.source.as_ref(), col, row, self.method)
    }

    /// Like [`DemSampler::height_at`], but also rejects locations whose
    /// enclosing 2x2 cell block leaves the raster, whatever the method.
    ///
    /// # Errors
    ///
    /// Same as [`DemSampler::height_at`].
    pub fn height_at_within_block(&self, x: f64, y: f64) -> Result<f64, DemError> {
        let [col, row] = self.to_cell(x, y)?;
        let cell = CellLocation::new(col, row, self.source.as_ref())?;
        let size = self.source.size();
        if !size.contains_window(cell.col, cell.row, 2, 2) {
            return Err(DemError::WindowOutOfBounds {
                x: cell.col,
                y: cell.row,
                width: 2,
                height: 2,
                cols: size.width,
                rows: size.height,
            });
        }
        interpolate_elevation(self.source.as_ref(), col, row, self.method)
    }
}
