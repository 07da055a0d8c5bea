#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::DemError;

/// In-memory elevation rasters.
pub mod grid;
pub use grid::{ElevationGrid, GridSize};

/// Elevation interpolation kernels.
pub mod interpolation;
pub use interpolation::ResampleMethod;

/// Collaborator traits for opening elevation models and reprojecting points.
pub mod source;
pub use source::{CoordinateTransform, DemProvider, ElevationSource, InMemoryDemProvider};

/// Ground coordinate to elevation lookups.
pub mod sampler;
pub use sampler::DemSampler;
