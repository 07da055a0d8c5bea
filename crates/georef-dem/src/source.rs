use std::collections::HashMap;
use std::sync::Arc;

use georef_core::GeoTransform;

use crate::{DemError, ElevationGrid, GridSize};

/// A raster that elevations can be read from.
pub trait ElevationSource: Send + Sync {
    /// Returns the raster size in cells.
    fn size(&self) -> GridSize;

    /// Returns the number of bands. Only the first band is read.
    fn band_count(&self) -> usize {
        1
    }

    /// Returns the geotransform from cell to ground coordinates.
    fn geo_transform(&self) -> Option<GeoTransform>;

    /// Returns the spatial reference system description, if any.
    fn srs(&self) -> Option<&str>;

    /// Reads a `width x height` window with origin `(x, y)` into `out`, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::WindowOutOfBounds`] if the window is not fully
    /// inside the raster, or [`DemError::Read`] on any other read failure.
    fn read_window(
        &self,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        out: &mut [f64],
    ) -> Result<(), DemError>;
}

impl ElevationSource for ElevationGrid {
    fn size(&self) -> GridSize {
        ElevationGrid::size(self)
    }

    fn geo_transform(&self) -> Option<GeoTransform> {
        ElevationGrid::geo_transform(self)
    }

    fn srs(&self) -> Option<&str> {
        ElevationGrid::srs(self)
    }

    fn read_window(
        &self,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        out: &mut [f64],
    ) -> Result<(), DemError> {
        ElevationGrid::read_window(self, x, y, width, height, out)
    }
}

/// Converts a ground coordinate between reference systems.
///
/// Any `Fn(f64, f64, f64) -> Option<[f64; 3]>` closure is a coordinate transform.
pub trait CoordinateTransform: Send + Sync {
    /// Transforms a point, returning `None` if it cannot be converted.
    fn transform(&self, x: f64, y: f64, z: f64) -> Option<[f64; 3]>;
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64, f64) -> Option<[f64; 3]> + Send + Sync,
{
    fn transform(&self, x: f64, y: f64, z: f64) -> Option<[f64; 3]> {
        self(x, y, z)
    }
}

/// Opens elevation models and builds reprojections on behalf of a transformer.
pub trait DemProvider: Send + Sync {
    /// Opens the elevation model stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::NotFound`] or [`DemError::Read`] when the model
    /// cannot be opened.
    fn open(&self, path: &str) -> Result<Arc<dyn ElevationSource>, DemError>;

    /// Returns the conversion from WGS84 longitude/latitude into `srs`.
    ///
    /// Returns `None` when `srs` already is WGS84 or no conversion is
    /// available, in which case ground coordinates are used unchanged.
    fn reprojection_from_wgs84(&self, srs: &str) -> Option<Arc<dyn CoordinateTransform>>;
}

/// A [`DemProvider`] serving in-memory grids registered by path.
///
/// # Examples
///
/// ```
/// use georef_core::GeoTransform;
/// use georef_dem::{DemProvider, ElevationGrid, GridSize, InMemoryDemProvider};
///
/// let grid = ElevationGrid::from_fn(GridSize::from([8, 8]), |_, _| 100.0)
///     .with_geo_transform(GeoTransform([0.0, 1.0, 0.0, 8.0, 0.0, -1.0]));
///
/// let mut provider = InMemoryDemProvider::new();
/// provider.insert("dem.tif", grid);
///
/// assert!(provider.open("dem.tif").is_ok());
/// assert!(provider.open("missing.tif").is_err());
/// ```
#[derive(Default, Clone)]
pub struct InMemoryDemProvider {
    grids: HashMap<String, Arc<ElevationGrid>>,
    reprojections: HashMap<String, Arc<dyn CoordinateTransform>>,
}

impl InMemoryDemProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a grid under `path`, replacing any previous one.
    pub fn insert(&mut self, path: impl Into<String>, grid: ElevationGrid) {
        self.grids.insert(path.into(), Arc::new(grid));
    }

    /// Registers the conversion from WGS84 into the reference system `srs`.
    pub fn insert_reprojection(
        &mut self,
        srs: impl Into<String>,
        transform: impl CoordinateTransform + 'static,
    ) {
        self.reprojections.insert(srs.into(), Arc::new(transform));
    }
}

impl DemProvider for InMemoryDemProvider {
    fn open(&self, path: &str) -> Result<Arc<dyn ElevationSource>, DemError> {
        let grid: Arc<dyn ElevationSource> = self
            .grids
            .get(path)
            .cloned()
            .ok_or_else(|| DemError::NotFound(path.to_string()))?;
        Ok(grid)
    }

    fn reprojection_from_wgs84(&self, srs: &str) -> Option<Arc<dyn CoordinateTransform>> {
        self.reprojections.get(srs).cloned()
    }
}
