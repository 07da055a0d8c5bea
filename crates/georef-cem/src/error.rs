use georef_linalg::SolverError;

/// Error types for the collinearity equation model.
#[derive(Debug, thiserror::Error)]
pub enum CemError {
    /// A required metadata key is absent.
    #[error("Required CEM metadata {0} is missing")]
    MissingMetadata(&'static str),

    /// A metadata value could not be parsed.
    #[error("Invalid value {value:?} for CEM metadata {key}")]
    InvalidMetadata {
        /// The metadata key.
        key: &'static str,
        /// The offending value.
        value: String,
    },

    /// A transformer option could not be parsed.
    #[error("Invalid value {value:?} for option {key}")]
    InvalidOption {
        /// The option name.
        key: &'static str,
        /// The offending value.
        value: String,
    },

    /// Fitting the approximate geotransform failed.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The approximate ground to image geotransform cannot be inverted.
    #[error("Cannot invert the approximate ground to image geotransform")]
    SeedNotInvertible,

    /// Error (de)serializing a transformer description.
    #[error("Failed to (de)serialize CEM transformer: {0}")]
    Serde(#[from] serde_json::Error),
}
