use std::collections::HashMap;

use georef_dem::ResampleMethod;

use crate::CemError;

/// Fixed height offset added to every point.
pub const CEM_HEIGHT: &str = "CEM_HEIGHT";
/// Factor applied to heights.
pub const CEM_HEIGHT_SCALE: &str = "CEM_HEIGHT_SCALE";
/// Path of the elevation model.
pub const CEM_DEM: &str = "CEM_DEM";
/// Interpolation of the elevation model.
pub const CEM_DEMINTERPOLATION: &str = "CEM_DEMINTERPOLATION";

/// Options of a [`crate::CemTransformer`].
///
/// Heights handed to the transformer are considered heights above ground;
/// the height used by the projection is
/// `z + (height_offset + dem) * height_scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct CemOptions {
    /// Average terrain height of the scene.
    pub height_offset: f64,
    /// Factor applied to heights, for elevation models not in meters.
    pub height_scale: f64,
    /// Elevation model opened on first use.
    pub dem_path: Option<String>,
    /// Interpolation of the elevation model.
    pub dem_interpolation: ResampleMethod,
}

impl Default for CemOptions {
    fn default() -> Self {
        Self {
            height_offset: 0.0,
            height_scale: 1.0,
            dem_path: None,
            dem_interpolation: ResampleMethod::Bilinear,
        }
    }
}

fn parse_f64(key: &'static str, value: &str) -> Result<f64, CemError> {
    value.trim().parse().map_err(|_| CemError::InvalidOption {
        key,
        value: value.to_string(),
    })
}

/// Parses an interpolation name, falling back to bilinear on unknown names.
pub fn parse_dem_interpolation(value: &str) -> ResampleMethod {
    value.parse().unwrap_or_else(|_| {
        log::warn!("unknown {CEM_DEMINTERPOLATION} value {value:?}, using bilinear");
        ResampleMethod::Bilinear
    })
}

impl CemOptions {
    /// Parses options from a string map.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CemError::InvalidOption`] if a numeric option does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use georef_cem::CemOptions;
    /// use georef_dem::ResampleMethod;
    ///
    /// let options = CemOptions::from_map(&HashMap::from([
    ///     ("CEM_HEIGHT".to_string(), "250".to_string()),
    ///     ("CEM_DEMINTERPOLATION".to_string(), "cubic".to_string()),
    /// ])).unwrap();
    ///
    /// assert_eq!(options.height_offset, 250.0);
    /// assert_eq!(options.height_scale, 1.0);
    /// assert_eq!(options.dem_interpolation, ResampleMethod::Cubic);
    /// ```
    pub fn from_map(options: &HashMap<String, String>) -> Result<Self, CemError> {
        let mut out = Self::default();
        if let Some(v) = options.get(CEM_HEIGHT) {
            out.height_offset = parse_f64(CEM_HEIGHT, v)?;
        }
        if let Some(v) = options.get(CEM_HEIGHT_SCALE) {
            out.height_scale = parse_f64(CEM_HEIGHT_SCALE, v)?;
        }
        out.dem_path = options.get(CEM_DEM).cloned();
        if let Some(v) = options.get(CEM_DEMINTERPOLATION) {
            out.dem_interpolation = parse_dem_interpolation(v);
        }
        Ok(out)
    }

    /// Writes the options as a string map.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut out = HashMap::from([
            (CEM_HEIGHT.to_string(), self.height_offset.to_string()),
            (CEM_HEIGHT_SCALE.to_string(), self.height_scale.to_string()),
            (
                CEM_DEMINTERPOLATION.to_string(),
                self.dem_interpolation.as_str().to_string(),
            ),
        ]);
        if let Some(path) = &self.dem_path {
            out.insert(CEM_DEM.to_string(), path.clone());
        }
        out
    }

    /// Returns the projection height of a point above the given terrain height.
    pub fn height(&self, z: f64, terrain: f64) -> f64 {
        z + (self.height_offset + terrain) * self.height_scale
    }
}
