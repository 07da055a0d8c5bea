/// An error type for elevation model access.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DemError {
    /// No elevation model is registered under the given path.
    #[error("Elevation model not found: {0}")]
    NotFound(String),

    /// The elevation model has no usable geotransform.
    #[error("Elevation model has no invertible geotransform")]
    NoGeoTransform,

    /// The elevation model has no raster band.
    #[error("Elevation model has no raster band")]
    NoBands,

    /// The requested window is not fully inside the raster.
    #[error("Window ({x}, {y}, {width}x{height}) is outside the {cols}x{rows} raster")]
    WindowOutOfBounds {
        /// Column of the window origin.
        x: i64,
        /// Row of the window origin.
        y: i64,
        /// Window width.
        width: usize,
        /// Window height.
        height: usize,
        /// Raster width.
        cols: usize,
        /// Raster height.
        rows: usize,
    },

    /// The point could not be reprojected into the elevation model reference system.
    #[error("Failed to reproject ({0}, {1}) into the elevation model reference system")]
    Reprojection(f64, f64),

    /// The interpolation method name is not recognised.
    #[error("Unknown elevation interpolation method: {0}")]
    UnknownResampleMethod(String),

    /// Error reading the raster data.
    #[error("Failed to read elevation data: {0}")]
    Read(String),
}
