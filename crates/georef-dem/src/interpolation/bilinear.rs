use super::CellLocation;
use crate::{DemError, ElevationSource};

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `source` - The elevation raster.
/// * `cell` - The location; the 2x2 window starts at its cell.
///
/// # Returns
///
/// The interpolated elevation.
pub fn bilinear_interpolation(
    source: &dyn ElevationSource,
    cell: &CellLocation,
) -> Result<f64, DemError> {
    let mut window = [0.0; 4];
    source.read_window(cell.col, cell.row, 2, 2, &mut window)?;

    let (dx, dy) = (cell.dx, cell.dy);
    let (dx1, dy1) = (1.0 - dx, 1.0 - dy);

    let top = window[0] * dx1 + window[1] * dx;
    let bottom = window[2] * dx1 + window[3] * dx;

    Ok(top * dy1 + bottom * dy)
}
