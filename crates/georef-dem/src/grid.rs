use georef_core::GeoTransform;

use crate::DemError;

/// Raster size in cells.
///
/// # Examples
///
/// ```
/// use georef_dem::GridSize;
///
/// let size = GridSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(size.width, 10);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "GridSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for GridSize {
    fn from(size: [usize; 2]) -> Self {
        GridSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl GridSize {
    /// Returns true if a `width x height` window at `(x, y)` lies fully inside.
    pub fn contains_window(&self, x: i64, y: i64, width: usize, height: usize) -> bool {
        x >= 0
            && y >= 0
            && x as u64 + width as u64 <= self.width as u64
            && y as u64 + height as u64 <= self.height as u64
    }
}

/// A single band elevation raster held in memory.
///
/// Cells are stored row-major, `data[row * width + col]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    size: GridSize,
    data: Vec<f64>,
    geo_transform: Option<GeoTransform>,
    srs: Option<String>,
}

impl ElevationGrid {
    /// Creates a new elevation grid without georeferencing.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the grid in cells.
    /// * `data` - The elevations, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::Read`] if the data length does not match the size.
    ///
    /// # Examples
    ///
    /// ```
    /// use georef_dem::{ElevationGrid, GridSize};
    ///
    /// let grid = ElevationGrid::new(
    ///     GridSize { width: 2, height: 3 },
    ///     vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
    /// ).unwrap();
    ///
    /// assert_eq!(grid.get(1, 2), Some(5.0));
    /// ```
    pub fn new(size: GridSize, data: Vec<f64>) -> Result<Self, DemError> {
        if data.len() != size.width * size.height {
            return Err(DemError::Read(format!(
                "data length {} does not match {size}",
                data.len()
            )));
        }
        Ok(Self {
            size,
            data,
            geo_transform: None,
            srs: None,
        })
    }

    /// Creates a grid by evaluating `f(col, row)` for every cell.
    pub fn from_fn(size: GridSize, f: impl Fn(usize, usize) -> f64) -> Self {
        let data = (0..size.height)
            .flat_map(|row| (0..size.width).map(move |col| (col, row)))
            .map(|(col, row)| f(col, row))
            .collect();
        Self {
            size,
            data,
            geo_transform: None,
            srs: None,
        }
    }

    /// Sets the geotransform mapping cell coordinates to ground coordinates.
    pub fn with_geo_transform(mut self, geo_transform: GeoTransform) -> Self {
        self.geo_transform = Some(geo_transform);
        self
    }

    /// Sets the spatial reference system description.
    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = Some(srs.into());
        self
    }

    /// Returns the size of the grid.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the geotransform, if any.
    pub fn geo_transform(&self) -> Option<GeoTransform> {
        self.geo_transform
    }

    /// Returns the spatial reference system description, if any.
    pub fn srs(&self) -> Option<&str> {
        self.srs.as_deref()
    }

    /// Returns the elevations as a row-major slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the elevation of a cell.
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.size.width || row >= self.size.height {
            return None;
        }
        self.data.get(row * self.size.width + col).copied()
    }

    /// Copies a window of cells into `out`, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`DemError::WindowOutOfBounds`] if the window leaves the grid
    /// and [`DemError::Read`] if `out` is too small.
    pub fn read_window(
        &self,
        x: i64,
        y: i64,
        width: usize,
        height: usize,
        out: &mut [f64],
    ) -> Result<(), DemError> {
        if !self.size.contains_window(x, y, width, height) {
            return Err(DemError::WindowOutOfBounds {
                x,
                y,
                width,
                height,
                cols: self.size.width,
                rows: self.size.height,
            });
        }
        if width == 0 || height == 0 {
            return Ok(());
        }
        if out.len() < width * height {
            return Err(DemError::Read(format!(
                "output buffer holds {} values, window needs {}",
                out.len(),
                width * height
            )));
        }

        let (x, y) = (x as usize, y as usize);
        for (r, dst) in out.chunks_exact_mut(width).take(height).enumerate() {
            let start = (y + r) * self.size.width + x;
            dst.copy_from_slice(&self.data[start..start + width]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_size_mismatch() {
        let res = ElevationGrid::new(GridSize::from([3, 3]), vec![0.0; 8]);
        assert!(matches!(res, Err(DemError::Read(_))));
    }

    #[test]
    fn test_read_window() -> Result<(), DemError> {
        let grid = ElevationGrid::from_fn(GridSize::from([4, 3]), |c, r| (r * 10 + c) as f64);
        let mut out = [0.0; 4];
        grid.read_window(2, 1, 2, 2, &mut out)?;
        assert_eq!(out, [12.0, 13.0, 22.0, 23.0]);
        Ok(())
    }

    #[test]
    fn test_read_empty_window() -> Result<(), DemError> {
        let grid = ElevationGrid::from_fn(GridSize::from([4, 3]), |c, r| (r * 10 + c) as f64);
        let mut out: [f64; 0] = [];
        grid.read_window(1, 1, 0, 2, &mut out)?;
        grid.read_window(1, 1, 2, 0, &mut out)?;
        Ok(())
    }

    #[test]
    fn test_read_window_out_of_bounds() {
        let grid = ElevationGrid::from_fn(GridSize::from([4, 3]), |_, _| 0.0);
        let mut out = [0.0; 4];
        assert!(matches!(
            grid.read_window(3, 0, 2, 2, &mut out),
            Err(DemError::WindowOutOfBounds { .. })
        ));
        assert!(matches!(
            grid.read_window(-1, 0, 2, 2, &mut out),
            Err(DemError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_contains_window() {
        let size = GridSize::from([4, 4]);
        assert!(size.contains_window(0, 0, 4, 4));
        assert!(size.contains_window(2, 2, 2, 2));
        assert!(!size.contains_window(3, 2, 2, 2));
        assert!(!size.contains_window(0, -1, 1, 1));
    }
}
