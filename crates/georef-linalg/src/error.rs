use georef_core::GeoTransformError;

/// Error types for the linear system solver and the polynomial fits.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SolverError {
    /// Not enough active points for the requested polynomial order.
    #[error("fit requires at least {required} active points, got {actual}")]
    NotEnoughPoints {
        /// Minimum number of active points.
        required: usize,
        /// Number of active points supplied.
        actual: usize,
    },

    /// The system is singular: a zero pivot was found, usually because the
    /// points are collinear.
    #[error("linear system is not solvable (points may be collinear)")]
    Unsolvable,

    /// A working buffer could not be allocated.
    #[error("not enough memory to allocate a {0}x{0} working matrix")]
    OutOfMemory(usize),

    /// Row and column bookkeeping disagree.
    #[error("internal solver error: {0}")]
    Internal(String),
}

impl From<GeoTransformError> for SolverError {
    fn from(_: GeoTransformError) -> Self {
        SolverError::Unsolvable
    }
}
