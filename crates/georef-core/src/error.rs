/// An error type for the transformer batch interface.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransformError {
    /// Error when the coordinate and status slices disagree in length.
    #[error("Mismatched batch lengths: {name} ({actual}) != x ({expected})")]
    MismatchedLengths {
        /// Label of the offending slice.
        name: &'static str,
        /// Length of the x slice.
        expected: usize,
        /// Length of the offending slice.
        actual: usize,
    },
}

/// An error type for geotransform operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeoTransformError {
    /// Error when the linear part of the geotransform has a zero determinant.
    #[error("Geotransform is not invertible (determinant is zero)")]
    NotInvertible,
}
