use serde::{Deserialize, Serialize};

/// A pair of matching 2D coordinates used to fit a transform.
///
/// Only active correspondences take part in a fit. Inactive ones are kept so
/// that callers can toggle outliers without rebuilding their point lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correspondence {
    /// The source coordinate.
    pub src: [f64; 2],
    /// The destination coordinate.
    pub dst: [f64; 2],
    /// Whether the correspondence participates in fitting.
    pub active: bool,
}

impl Correspondence {
    /// Creates an active correspondence.
    pub fn new(src: [f64; 2], dst: [f64; 2]) -> Self {
        Self {
            src,
            dst,
            active: true,
        }
    }

    /// Returns the same correspondence with source and destination swapped.
    pub fn swapped(self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
            active: self.active,
        }
    }
}

/// A ground control point tying an image location to a georeferenced one.
///
/// # Examples
///
/// ```
/// use georef_core::Gcp;
///
/// let gcp = Gcp::new(10.0, 20.0, 500_000.0, 4_000_000.0);
/// let c = gcp.correspondence();
///
/// assert_eq!(c.src, [10.0, 20.0]);
/// assert_eq!(c.dst, [500_000.0, 4_000_000.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gcp {
    /// Unique identifier, often numeric.
    #[serde(default)]
    pub id: String,
    /// Informational message or empty.
    #[serde(default)]
    pub info: String,
    /// Pixel (column) location on the image.
    pub pixel: f64,
    /// Line (row) location on the image.
    pub line: f64,
    /// Georeferenced X.
    pub x: f64,
    /// Georeferenced Y.
    pub y: f64,
    /// Elevation, usually zero.
    #[serde(default)]
    pub z: f64,
}

impl Gcp {
    /// Creates a control point with empty id and info at zero elevation.
    pub fn new(pixel: f64, line: f64, x: f64, y: f64) -> Self {
        Self {
            pixel,
            line,
            x,
            y,
            ..Default::default()
        }
    }

    /// Returns the pixel/line to X/Y correspondence of this control point.
    pub fn correspondence(&self) -> Correspondence {
        Correspondence::new([self.pixel, self.line], [self.x, self.y])
    }
}
