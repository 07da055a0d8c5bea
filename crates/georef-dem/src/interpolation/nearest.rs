use super::CellLocation;
use crate::{DemError, ElevationSource};

/// Kernel for nearest cell interpolation.
///
/// Returns the value of the cell the location falls in.
pub fn nearest_interpolation(
    source: &dyn ElevationSource,
    cell: &CellLocation,
) -> Result<f64, DemError> {
    let mut value = [0.0];
    source.read_window(cell.col, cell.row, 1, 1, &mut value)?;
    Ok(value[0])
}
