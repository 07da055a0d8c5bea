#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod error;
pub use error::SolverError;

/// Square working matrices.
pub mod matrix;
pub use matrix::SquareMatrix;

/// Gaussian elimination with partial pivoting.
pub mod solve;
pub use solve::solve_pair;

/// Polynomial georeferencing fits of order 1 to 3.
pub mod polynomial;
pub use polynomial::{fit_polynomial, PolynomialCoefficients, PolynomialOrder};

/// Best-fit affine approximation of a set of correspondences.
pub mod affine;
pub use affine::{fit_affine, AffineFit};

/// Inversion of quadratic geotransforms by resampling.
pub mod quadratic;
pub use quadratic::invert_quadratic_geotransform;
