#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::CemError;

/// Sensor parameters of the collinearity equations.
pub mod model;
pub use model::{CollinearityModel, ExteriorOrientation, InteriorOrientation, LensDistortion};

/// Ground to image projection.
pub mod projection;
pub use projection::{CollinearityProjector, RotationMatrix};

/// Height and elevation model options.
pub mod options;
pub use options::CemOptions;

/// The collinearity equation transformer.
pub mod transformer;
pub use transformer::{
    CemTransformer, InverseSolution, PointStatus, DEFAULT_PIX_ERR_THRESHOLD, MAX_ITERATIONS,
};

/// Persistence of transformer configurations.
pub mod serialize;
pub use serialize::{CemRecord, CemTransformerConfig};
