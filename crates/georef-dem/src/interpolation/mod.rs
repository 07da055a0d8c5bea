//! Elevation interpolation kernels.
//!
//! Each kernel reads the smallest window of the raster it needs around a
//! fractional cell location and combines the values into one elevation.
//!
//! # Methods
//!
//! - **Nearest**: the single cell containing the location
//! - **Bilinear**: a 2x2 window, linear in both axes
//! - **Cubic**: a 4x4 window weighted by a cubic B-spline kernel

use std::str::FromStr;

use crate::{DemError, ElevationSource};

mod bicubic;
mod bilinear;
mod nearest;

pub use bicubic::{bicubic_interpolation, cubic_bspline_kernel};
pub use bilinear::bilinear_interpolation;
pub use nearest::nearest_interpolation;

/// Interpolation method used to sample an elevation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleMethod {
    /// Nearest cell.
    Nearest,
    /// Bilinear interpolation over 2x2 cells.
    #[default]
    Bilinear,
    /// Cubic B-spline interpolation over 4x4 cells.
    Cubic,
}

impl ResampleMethod {
    /// Returns the canonical option value of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "near",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
        }
    }
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResampleMethod {
    type Err = DemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "near" | "nearest" => Ok(ResampleMethod::Nearest),
            "bilinear" => Ok(ResampleMethod::Bilinear),
            "cubic" => Ok(ResampleMethod::Cubic),
            _ => Err(DemError::UnknownResampleMethod(s.to_string())),
        }
    }
}

/// Interpolates the elevation at a fractional cell location.
///
/// The location is split into its integer cell `(trunc(x), trunc(y))` and
/// the offset inside that cell.
///
/// # Arguments
///
/// * `source` - The elevation raster.
/// * `x` - The fractional column.
/// * `y` - The fractional row.
/// * `method` - The interpolation method.
///
/// # Errors
///
/// Returns [`DemError::WindowOutOfBounds`] if the kernel window leaves the
/// raster, or the read error of the source.
pub fn interpolate_elevation(
    source: &dyn ElevationSource,
    x: f64,
    y: f64,
    method: ResampleMethod,
) -> Result<f64, DemError> {
    let cell = CellLocation::new(x, y, source)?;
    match method {
        ResampleMethod::Nearest => nearest_interpolation(source, &cell),
        ResampleMethod::Bilinear => bilinear_interpolation(source, &cell),
        ResampleMethod::Cubic => bicubic_interpolation(source, &cell),
    }
}

/// A fractional cell location split into integer cell and offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLocation {
    /// Column of the cell, truncated toward zero.
    pub col: i64,
    /// Row of the cell, truncated toward zero.
    pub row: i64,
    /// Offset of the location from the cell column.
    pub dx: f64,
    /// Offset of the location from the cell row.
    pub dy: f64,
}

impl CellLocation {
    /// Splits a fractional location.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::WindowOutOfBounds`] if the location is not finite.
    pub fn new(x: f64, y: f64, source: &dyn ElevationSource) -> Result<Self, DemError> {
        if !x.is_finite() || !y.is_finite() {
            let size = source.size();
            return Err(DemError::WindowOutOfBounds {
                x: i64::MIN,
                y: i64::MIN,
                width: 1,
                height: 1,
                cols: size.width,
                rows: size.height,
            });
        }
        let (col, row) = (x.trunc(), y.trunc());
        Ok(Self {
            col: col as i64,
            row: row as i64,
            dx: x - col,
            dy: y - row,
        })
    }
}
