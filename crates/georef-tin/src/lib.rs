#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::TinError;

/// Delaunay triangulation of control points.
pub mod delaunay;

/// Facet topology, barycentric coefficients and point location.
pub mod triangulation;
pub use triangulation::{BarycentricCoefficients, Facet, Triangulation, Walk};

/// The piecewise affine transformer.
pub mod transformer;
pub use transformer::{FacetAffine, TinTransformer};

/// Persistence of transformer configurations.
pub mod serialize;
pub use serialize::TinTransformerConfig;
