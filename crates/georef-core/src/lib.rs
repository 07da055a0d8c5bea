#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::{GeoTransformError, TransformError};

/// Ground control points and fitting correspondences.
pub mod gcp;
pub use gcp::{Correspondence, Gcp};

/// Affine and quadratic geotransforms.
pub mod geotransform;
pub use geotransform::{GeoTransform, QuadraticGeoTransform};

/// The batch transformer interface.
pub mod transformer;
pub use transformer::{check_batch, TransformDirection, Transformer};
