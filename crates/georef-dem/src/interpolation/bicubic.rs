use super::CellLocation;
use crate::{DemError, ElevationSource};

/// Cubic B-spline kernel.
///
/// Zero beyond `v > 2`; each cubed term is dropped while its base is not positive.
pub fn cubic_bspline_kernel(v: f64) -> f64 {
    if v > 2.0 {
        return 0.0;
    }

    let cube = |t: f64| if t <= 0.0 { 0.0 } else { t * t * t };
    let a = cube(v + 2.0);
    let b = cube(v + 1.0);
    let c = cube(v);
    let d = cube(v - 1.0);

    (a - 4.0 * b + 6.0 * c - 4.0 * d) / 6.0
}

/// Kernel for cubic B-spline interpolation.
///
/// Reads the 4x4 window whose second row and column hold the cell of the
/// location, and weights each value by the kernel of its distance to the
/// location along both axes.
pub fn bicubic_interpolation(
    source: &dyn ElevationSource,
    cell: &CellLocation,
) -> Result<f64, DemError> {
    let mut window = [0.0; 16];
    source.read_window(cell.col - 1, cell.row - 1, 4, 4, &mut window)?;

    let mut sum = 0.0;
    for r in 0..4 {
        let wy = cubic_bspline_kernel((r as f64 - 1.0) - cell.dy);
        for c in 0..4 {
            let wx = cubic_bspline_kernel((c as f64 - 1.0) - cell.dx);
            sum += window[r * 4 + c] * wx * wy;
        }
    }

    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElevationGrid, GridSize};
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_values() {
        assert_relative_eq!(cubic_bspline_kernel(0.0), 4.0 / 6.0);
        assert_relative_eq!(cubic_bspline_kernel(1.0), 1.0 / 6.0);
        assert_relative_eq!(cubic_bspline_kernel(-1.0), 1.0 / 6.0);
        assert_eq!(cubic_bspline_kernel(2.5), 0.0);
        assert_eq!(cubic_bspline_kernel(-2.0), 0.0);
    }

    #[test]
    fn test_kernel_partition_of_unity() {
        for &d in &[0.0, 0.1, 0.5, 0.9] {
            let total: f64 = (0..4)
                .map(|k| cubic_bspline_kernel((k as f64 - 1.0) - d))
                .sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bicubic_constant_surface() -> Result<(), DemError> {
        let grid = ElevationGrid::from_fn(GridSize::from([6, 6]), |_, _| 250.0);
        let cell = CellLocation::new(2.3, 2.8, &grid)?;
        assert_relative_eq!(bicubic_interpolation(&grid, &cell)?, 250.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_bicubic_border_rejected() -> Result<(), DemError> {
        let grid = ElevationGrid::from_fn(GridSize::from([6, 6]), |_, _| 250.0);
        // window would start at column -1
        let cell = CellLocation::new(0.5, 2.0, &grid)?;
        assert!(bicubic_interpolation(&grid, &cell).is_err());
        // window would end at column 7
        let cell = CellLocation::new(4.5, 2.0, &grid)?;
        assert!(bicubic_interpolation(&grid, &cell).is_err());
        Ok(())
    }
}
