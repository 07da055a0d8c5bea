use std::collections::HashMap;

use crate::CemError;

/// Interior orientation of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteriorOrientation {
    /// Focal length.
    pub focal_length: f64,
    /// Principal point x0.
    pub principal_x0: f64,
    /// Principal point y0.
    pub principal_y0: f64,
    /// Pixel size along x.
    pub pixel_size_x: f64,
    /// Pixel size along y.
    pub pixel_size_y: f64,
}

/// Lens distortion coefficients.
///
/// Carried with the model but not applied by the projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LensDistortion {
    /// Radial distortion k1.
    pub k1: f64,
    /// Radial distortion k2.
    pub k2: f64,
    /// Radial distortion k3.
    pub k3: f64,
    /// Tangential distortion p1.
    pub p1: f64,
    /// Tangential distortion p2.
    pub p2: f64,
    /// Non-square pixel scale factor.
    pub alpha: f64,
    /// Non-orthogonality of the sensor array.
    pub beta: f64,
}

/// Exterior orientation: perspective center and attitude angles in radians.
///
/// Each angle is a series of up to three coefficients; only the first one
/// is used by the projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExteriorOrientation {
    /// Perspective center X.
    pub xs: f64,
    /// Perspective center Y.
    pub ys: f64,
    /// Perspective center Z.
    pub zs: f64,
    /// Omega series.
    pub omega: [f64; 3],
    /// Phi series.
    pub phi: [f64; 3],
    /// Kappa series.
    pub kappa: [f64; 3],
}

/// A collinearity equation model of a frame sensor.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use georef_cem::CollinearityModel;
///
/// let mut md = HashMap::new();
/// for (k, v) in [
///     ("CEM_FOCAL_LENGTH", "50"),
///     ("CEM_PRINCIPAL_X0", "0"),
///     ("CEM_PRINCIPAL_Y0", "0"),
///     ("CEM_PIXEL_XSIZE", "0.01"),
///     ("CEM_PIXEL_YSIZE", "0.01"),
///     ("CEM_DISTORTION_K1", "0"),
///     ("CEM_DISTORTION_K2", "0"),
///     ("CEM_DISTORTION_K3", "0"),
///     ("CEM_DISTORTION_P1", "0"),
///     ("CEM_DISTORTION_P2", "0"),
///     ("CEM_DISTORTION_ALPHA", "0"),
///     ("CEM_DISTORTION_BETA", "0"),
///     ("CEM_EXTERIOR_XS", "100"),
///     ("CEM_EXTERIOR_YS", "200"),
///     ("CEM_EXTERIOR_ZS", "1000"),
///     ("CEM_EXTERIOR_OMEGA", "0.01 0 0"),
///     ("CEM_EXTERIOR_PHI", "0.02"),
///     ("CEM_EXTERIOR_KAPPA", "0.03,0,0"),
///     ("CEM_ANGLE_TYPE", "0"),
///     ("CEM_ANGLE_ORDER", "1"),
/// ] {
///     md.insert(k.to_string(), v.to_string());
/// }
///
/// let model = CollinearityModel::from_metadata(&md).unwrap();
/// assert_eq!(model.interior.focal_length, 50.0);
/// assert_eq!(model.exterior.kappa, [0.03, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollinearityModel {
    /// Interior orientation.
    pub interior: InteriorOrientation,
    /// Lens distortion.
    pub distortion: LensDistortion,
    /// Exterior orientation.
    pub exterior: ExteriorOrientation,
    /// Convention of the attitude angles.
    pub angle_type: i32,
    /// Number of coefficients of the attitude angle series.
    pub angle_order: i32,
}

const PIXEL_XSIZE: &str = "CEM_PIXEL_XSIZE";
const PIXEL_YSIZE: &str = "CEM_PIXEL_YSIZE";

// misspelled keys written by older producers
const LEGACY_PIXEL_XSIZE: &str = "CEM_PXIEL_XSIZE";
const LEGACY_PIXEL_YSIZE: &str = "CEM_PXIEL_YSIZE";

const REQUIRED_KEYS: [&str; 18] = [
    "CEM_FOCAL_LENGTH",
    "CEM_PRINCIPAL_X0",
    "CEM_PRINCIPAL_Y0",
    "CEM_DISTORTION_K1",
    "CEM_DISTORTION_K2",
    "CEM_DISTORTION_K3",
    "CEM_DISTORTION_P1",
    "CEM_DISTORTION_P2",
    "CEM_DISTORTION_ALPHA",
    "CEM_DISTORTION_BETA",
    "CEM_EXTERIOR_XS",
    "CEM_EXTERIOR_YS",
    "CEM_EXTERIOR_ZS",
    "CEM_EXTERIOR_OMEGA",
    "CEM_EXTERIOR_PHI",
    "CEM_EXTERIOR_KAPPA",
    "CEM_ANGLE_TYPE",
    "CEM_ANGLE_ORDER",
];

struct Metadata<'a>(&'a HashMap<String, String>);

impl Metadata<'_> {
    fn raw(&self, key: &'static str) -> Result<&str, CemError> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .ok_or(CemError::MissingMetadata(key))
    }

    fn raw_with_legacy(&self, key: &'static str, legacy: &'static str) -> Result<&str, CemError> {
        self.raw(key).or_else(|_| {
            self.raw(legacy)
                .map_err(|_| CemError::MissingMetadata(key))
        })
    }

    fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, CemError> {
        value.parse().map_err(|_| CemError::InvalidMetadata {
            key,
            value: value.to_string(),
        })
    }

    fn f64(&self, key: &'static str) -> Result<f64, CemError> {
        Self::parse(key, self.raw(key)?)
    }

    fn i32(&self, key: &'static str) -> Result<i32, CemError> {
        Self::parse(key, self.raw(key)?)
    }

    // one value or three values separated by spaces or commas
    fn series(&self, key: &'static str) -> Result<[f64; 3], CemError> {
        let value = self.raw(key)?;
        let tokens = value
            .split([' ', ','])
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>();

        let mut out = [0.0; 3];
        match tokens.len() {
            1 | 3 => {
                for (o, t) in out.iter_mut().zip(&tokens) {
                    *o = Self::parse(key, t)?;
                }
                Ok(out)
            }
            _ => Err(CemError::InvalidMetadata {
                key,
                value: value.to_string(),
            }),
        }
    }
}

impl CollinearityModel {
    /// Reads a model from `CEM_*` metadata entries.
    ///
    /// Angle series accept either one value or three values separated by
    /// spaces or commas. Pixel sizes are also accepted under their legacy
    /// `CEM_PXIEL_*` spelling.
    ///
    /// # Errors
    ///
    /// * [`CemError::MissingMetadata`] naming the first absent key.
    /// * [`CemError::InvalidMetadata`] if a value does not parse.
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Result<Self, CemError> {
        let md = Metadata(metadata);

        // report missing keys before any parse error
        for key in REQUIRED_KEYS {
            md.raw(key)?;
        }
        md.raw_with_legacy(PIXEL_XSIZE, LEGACY_PIXEL_XSIZE)?;
        md.raw_with_legacy(PIXEL_YSIZE, LEGACY_PIXEL_YSIZE)?;

        Ok(Self {
            interior: InteriorOrientation {
                focal_length: md.f64("CEM_FOCAL_LENGTH")?,
                principal_x0: md.f64("CEM_PRINCIPAL_X0")?,
                principal_y0: md.f64("CEM_PRINCIPAL_Y0")?,
                pixel_size_x: Metadata::parse(
                    PIXEL_XSIZE,
                    md.raw_with_legacy(PIXEL_XSIZE, LEGACY_PIXEL_XSIZE)?,
                )?,
                pixel_size_y: Metadata::parse(
                    PIXEL_YSIZE,
                    md.raw_with_legacy(PIXEL_YSIZE, LEGACY_PIXEL_YSIZE)?,
                )?,
            },
            distortion: LensDistortion {
                k1: md.f64("CEM_DISTORTION_K1")?,
                k2: md.f64("CEM_DISTORTION_K2")?,
                k3: md.f64("CEM_DISTORTION_K3")?,
                p1: md.f64("CEM_DISTORTION_P1")?,
                p2: md.f64("CEM_DISTORTION_P2")?,
                alpha: md.f64("CEM_DISTORTION_ALPHA")?,
                beta: md.f64("CEM_DISTORTION_BETA")?,
            },
            exterior: ExteriorOrientation {
                xs: md.f64("CEM_EXTERIOR_XS")?,
                ys: md.f64("CEM_EXTERIOR_YS")?,
                zs: md.f64("CEM_EXTERIOR_ZS")?,
                omega: md.series("CEM_EXTERIOR_OMEGA")?,
                phi: md.series("CEM_EXTERIOR_PHI")?,
                kappa: md.series("CEM_EXTERIOR_KAPPA")?,
            },
            angle_type: md.i32("CEM_ANGLE_TYPE")?,
            angle_order: md.i32("CEM_ANGLE_ORDER")?,
        })
    }

    /// Writes the model as `CEM_*` metadata entries.
    pub fn to_metadata(&self) -> HashMap<String, String> {
        let series = |s: &[f64; 3]| format!("{} {} {}", s[0], s[1], s[2]);
        let (i, d, e) = (&self.interior, &self.distortion, &self.exterior);

        [
            ("CEM_FOCAL_LENGTH", i.focal_length.to_string()),
            ("CEM_PRINCIPAL_X0", i.principal_x0.to_string()),
            ("CEM_PRINCIPAL_Y0", i.principal_y0.to_string()),
            (PIXEL_XSIZE, i.pixel_size_x.to_string()),
            (PIXEL_YSIZE, i.pixel_size_y.to_string()),
            ("CEM_DISTORTION_K1", d.k1.to_string()),
            ("CEM_DISTORTION_K2", d.k2.to_string()),
            ("CEM_DISTORTION_K3", d.k3.to_string()),
            ("CEM_DISTORTION_P1", d.p1.to_string()),
            ("CEM_DISTORTION_P2", d.p2.to_string()),
            ("CEM_DISTORTION_ALPHA", d.alpha.to_string()),
            ("CEM_DISTORTION_BETA", d.beta.to_string()),
            ("CEM_EXTERIOR_XS", e.xs.to_string()),
            ("CEM_EXTERIOR_YS", e.ys.to_string()),
            ("CEM_EXTERIOR_ZS", e.zs.to_string()),
            ("CEM_EXTERIOR_OMEGA", series(&e.omega)),
            ("CEM_EXTERIOR_PHI", series(&e.phi)),
            ("CEM_EXTERIOR_KAPPA", series(&e.kappa)),
            ("CEM_ANGLE_TYPE", self.angle_type.to_string()),
            ("CEM_ANGLE_ORDER", self.angle_order.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}
