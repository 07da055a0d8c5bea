use serde::{Deserialize, Serialize};

use crate::model::{ExteriorOrientation, InteriorOrientation, LensDistortion};
use crate::options::parse_dem_interpolation;
use crate::transformer::DEFAULT_PIX_ERR_THRESHOLD;
use crate::{CemError, CemOptions, CemTransformer, CollinearityModel};

fn default_height_scale() -> f64 {
    1.0
}

fn is_default_height_scale(v: &f64) -> bool {
    *v == 1.0
}

fn is_zero(v: &f64) -> bool {
    *v == 0.0
}

fn is_zero_i32(v: &i32) -> bool {
    *v == 0
}

fn default_pix_err_threshold() -> f64 {
    DEFAULT_PIX_ERR_THRESHOLD
}

fn default_dem_interpolation() -> String {
    "bilinear".to_string()
}

/// Persisted sensor parameters.
///
/// `Omega`, `Phi` and `Kappa` hold the constant term of each attitude
/// series; the higher terms and the lens distortion are written only when
/// they are not zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CemRecord {
    /// Focal length.
    #[serde(default)]
    pub focal_length: f64,
    /// Principal point x0.
    #[serde(default)]
    pub principal_point_x0: f64,
    /// Principal point y0.
    #[serde(default)]
    pub principal_point_y0: f64,
    /// Pixel size along x.
    #[serde(default)]
    pub x_pixel_size: f64,
    /// Pixel size along y.
    #[serde(default)]
    pub y_pixel_size: f64,
    /// Perspective center X.
    #[serde(rename = "XS", default)]
    pub xs: f64,
    /// Perspective center Y.
    #[serde(rename = "YS", default)]
    pub ys: f64,
    /// Perspective center Z.
    #[serde(rename = "ZS", default)]
    pub zs: f64,
    /// Omega.
    #[serde(default)]
    pub omega: f64,
    /// Omega, first order term.
    #[serde(rename = "Omega1", default, skip_serializing_if = "is_zero")]
    pub omega1: f64,
    /// Omega, second order term.
    #[serde(rename = "Omega2", default, skip_serializing_if = "is_zero")]
    pub omega2: f64,
    /// Phi.
    #[serde(default)]
    pub phi: f64,
    /// Phi, first order term.
    #[serde(rename = "Phi1", default, skip_serializing_if = "is_zero")]
    pub phi1: f64,
    /// Phi, second order term.
    #[serde(rename = "Phi2", default, skip_serializing_if = "is_zero")]
    pub phi2: f64,
    /// Kappa.
    #[serde(default)]
    pub kappa: f64,
    /// Kappa, first order term.
    #[serde(rename = "Kappa1", default, skip_serializing_if = "is_zero")]
    pub kappa1: f64,
    /// Kappa, second order term.
    #[serde(rename = "Kappa2", default, skip_serializing_if = "is_zero")]
    pub kappa2: f64,
    /// Convention of the attitude angles.
    #[serde(default)]
    pub angle_type: i32,
    /// Number of coefficients of the attitude series.
    #[serde(default, skip_serializing_if = "is_zero_i32")]
    pub angle_order: i32,
    /// Radial distortion k1.
    #[serde(rename = "K1", default, skip_serializing_if = "is_zero")]
    pub k1: f64,
    /// Radial distortion k2.
    #[serde(rename = "K2", default, skip_serializing_if = "is_zero")]
    pub k2: f64,
    /// Radial distortion k3.
    #[serde(rename = "K3", default, skip_serializing_if = "is_zero")]
    pub k3: f64,
    /// Tangential distortion p1.
    #[serde(rename = "P1", default, skip_serializing_if = "is_zero")]
    pub p1: f64,
    /// Tangential distortion p2.
    #[serde(rename = "P2", default, skip_serializing_if = "is_zero")]
    pub p2: f64,
    /// Non-square pixel scale factor.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub alpha: f64,
    /// Non-orthogonality of the sensor array.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub beta: f64,
}

impl From<&CollinearityModel> for CemRecord {
    fn from(model: &CollinearityModel) -> Self {
        let (i, e, d) = (&model.interior, &model.exterior, &model.distortion);
        Self {
            focal_length: i.focal_length,
            principal_point_x0: i.principal_x0,
            principal_point_y0: i.principal_y0,
            x_pixel_size: i.pixel_size_x,
            y_pixel_size: i.pixel_size_y,
            xs: e.xs,
            ys: e.ys,
            zs: e.zs,
            omega: e.omega[0],
            omega1: e.omega[1],
            omega2: e.omega[2],
            phi: e.phi[0],
            phi1: e.phi[1],
            phi2: e.phi[2],
            kappa: e.kappa[0],
            kappa1: e.kappa[1],
            kappa2: e.kappa[2],
            angle_type: model.angle_type,
            angle_order: model.angle_order,
            k1: d.k1,
            k2: d.k2,
            k3: d.k3,
            p1: d.p1,
            p2: d.p2,
            alpha: d.alpha,
            beta: d.beta,
        }
    }
}

impl From<&CemRecord> for CollinearityModel {
    fn from(r: &CemRecord) -> Self {
        CollinearityModel {
            interior: InteriorOrientation {
                focal_length: r.focal_length,
                principal_x0: r.principal_point_x0,
                principal_y0: r.principal_point_y0,
                pixel_size_x: r.x_pixel_size,
                pixel_size_y: r.y_pixel_size,
            },
            exterior: ExteriorOrientation {
                xs: r.xs,
                ys: r.ys,
                zs: r.zs,
                omega: [r.omega, r.omega1, r.omega2],
                phi: [r.phi, r.phi1, r.phi2],
                kappa: [r.kappa, r.kappa1, r.kappa2],
            },
            distortion: LensDistortion {
                k1: r.k1,
                k2: r.k2,
                k3: r.k3,
                p1: r.p1,
                p2: r.p2,
                alpha: r.alpha,
                beta: r.beta,
            },
            angle_type: r.angle_type,
            angle_order: r.angle_order,
        }
    }
}

/// Persisted description of a [`CemTransformer`].
///
/// # Examples
///
/// ```
/// use georef_cem::CemTransformerConfig;
///
/// let config = CemTransformerConfig::from_json(
///     r#"{"Reversed": false, "HeightOffset": 0, "CEM": {"FocalLength": 50, "ZS": 1000}}"#,
/// ).unwrap();
///
/// assert_eq!(config.pix_err_threshold, 0.25);
/// assert_eq!(config.dem_interpolation, "bilinear");
/// assert_eq!(config.cem.zs, 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CemTransformerConfig {
    /// Swap the forward and inverse directions.
    #[serde(default)]
    pub reversed: bool,
    /// Average terrain height.
    #[serde(default)]
    pub height_offset: f64,
    /// Factor applied to heights.
    #[serde(
        default = "default_height_scale",
        skip_serializing_if = "is_default_height_scale"
    )]
    pub height_scale: f64,
    /// Elevation model path.
    #[serde(rename = "DEMPath", default, skip_serializing_if = "Option::is_none")]
    pub dem_path: Option<String>,
    /// Elevation model interpolation.
    #[serde(rename = "DEMInterpolation", default = "default_dem_interpolation")]
    pub dem_interpolation: String,
    /// Error in pixels accepted by the image to ground solution.
    #[serde(default = "default_pix_err_threshold")]
    pub pix_err_threshold: f64,
    /// Sensor parameters.
    #[serde(rename = "CEM")]
    pub cem: CemRecord,
}

impl CemTransformerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CemError::Serde`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, CemError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CemError::Serde`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CemError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the transformer options described by this configuration.
    pub fn options(&self) -> CemOptions {
        CemOptions {
            height_offset: self.height_offset,
            height_scale: self.height_scale,
            dem_path: self.dem_path.clone(),
            dem_interpolation: parse_dem_interpolation(&self.dem_interpolation),
        }
    }

    /// Builds the transformer described by this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`CemTransformer::new`].
    pub fn build(&self) -> Result<CemTransformer, CemError> {
        CemTransformer::new(
            CollinearityModel::from(&self.cem),
            self.reversed,
            self.pix_err_threshold,
            self.options(),
        )
    }
}

impl CemTransformer {
    /// Describes the transformer for persistence.
    pub fn to_config(&self) -> CemTransformerConfig {
        let options = self.options();
        CemTransformerConfig {
            reversed: self.is_reversed(),
            height_offset: options.height_offset,
            height_scale: options.height_scale,
            dem_path: options.dem_path.clone(),
            dem_interpolation: options.dem_interpolation.as_str().to_string(),
            pix_err_threshold: self.pix_err_threshold(),
            cem: CemRecord::from(self.model()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georef_core::{TransformDirection, Transformer};
    use georef_dem::ResampleMethod;

    fn transformer() -> Result<CemTransformer, CemError> {
        let mut model = CollinearityModel::default();
        model.interior.focal_length = 50.0;
        model.interior.pixel_size_x = 0.01;
        model.interior.pixel_size_y = 0.01;
        model.exterior = ExteriorOrientation {
            xs: 100.0,
            ys: 200.0,
            zs: 1000.0,
            omega: [0.01, 0.0, 0.0],
            phi: [0.02, 0.0, 0.0],
            kappa: [0.03, 0.0, 0.0],
        };
        let options = CemOptions {
            height_offset: 12.5,
            height_scale: 2.0,
            dem_path: Some("dem.tif".to_string()),
            dem_interpolation: ResampleMethod::Cubic,
        };
        CemTransformer::new(model, true, 0.1, options)
    }

    #[test]
    fn test_field_names() -> Result<(), Box<dyn std::error::Error>> {
        let value = serde_json::to_value(transformer()?.to_config())?;
        assert_eq!(value["Reversed"], true);
        assert_eq!(value["HeightOffset"], 12.5);
        assert_eq!(value["HeightScale"], 2.0);
        assert_eq!(value["DEMPath"], "dem.tif");
        assert_eq!(value["DEMInterpolation"], "cubic");
        assert_eq!(value["PixErrThreshold"], 0.1);
        assert_eq!(value["CEM"]["FocalLength"], 50.0);
        assert_eq!(value["CEM"]["PrincipalPointX0"], 0.0);
        assert_eq!(value["CEM"]["XPixelSize"], 0.01);
        assert_eq!(value["CEM"]["XS"], 100.0);
        assert_eq!(value["CEM"]["Kappa"], 0.03);
        assert_eq!(value["CEM"]["AngleType"], 0);
        Ok(())
    }

    #[test]
    fn test_default_height_scale_omitted() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = transformer()?.to_config();
        config.height_scale = 1.0;
        config.dem_path = None;
        let value = serde_json::to_value(&config)?;
        assert!(value.get("HeightScale").is_none());
        assert!(value.get("DEMPath").is_none());
        Ok(())
    }

    #[test]
    fn test_roundtrip_rebuilds_same_transformer() -> Result<(), Box<dyn std::error::Error>> {
        let t = transformer()?;
        let json = t.to_config().to_json()?;
        let back = CemTransformerConfig::from_json(&json)?.build()?;

        assert_eq!(back.to_config(), t.to_config());
        assert_eq!(back.pixel_to_ground(), t.pixel_to_ground());

        // reversed: forward maps ground to image
        let a = t.transform_point(TransformDirection::Forward, 130.0, 170.0, 0.0);
        let b = back.transform_point(TransformDirection::Forward, 130.0, 170.0, 0.0);
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_roundtrip_keeps_every_coefficient() -> Result<(), Box<dyn std::error::Error>> {
        let t = transformer()?;
        let mut model = *t.model();
        model.distortion = LensDistortion {
            k1: 1e-5,
            k2: -2e-8,
            k3: 3e-11,
            p1: 4e-6,
            p2: -5e-6,
            alpha: 1e-4,
            beta: -2e-4,
        };
        model.exterior.omega = [0.01, 1e-3, -1e-4];
        model.exterior.phi = [0.02, -2e-3, 2e-4];
        model.exterior.kappa = [0.03, 3e-3, -3e-4];
        model.angle_order = 3;
        let options = t.options().clone();
        let t = CemTransformer::new(model, t.is_reversed(), t.pix_err_threshold(), options)?;

        let value = serde_json::to_value(t.to_config())?;
        assert_eq!(value["CEM"]["K1"], 1e-5);
        assert_eq!(value["CEM"]["Beta"], -2e-4);
        assert_eq!(value["CEM"]["Kappa2"], -3e-4);
        assert_eq!(value["CEM"]["AngleOrder"], 3);

        let json = t.to_config().to_json()?;
        let back = CemTransformerConfig::from_json(&json)?.build()?;
        assert_eq!(*back.model(), model);
        Ok(())
    }

    #[test]
    fn test_zero_terms_omitted() -> Result<(), Box<dyn std::error::Error>> {
        let value = serde_json::to_value(transformer()?.to_config())?;
        for key in ["K1", "P2", "Alpha", "Omega1", "Kappa2", "AngleOrder"] {
            assert!(value["CEM"].get(key).is_none(), "{key}");
        }
        Ok(())
    }

    #[test]
    fn test_deserialize_defaults() -> Result<(), CemError> {
        let config = CemTransformerConfig::from_json(r#"{"CEM": {"FocalLength": 50}}"#)?;
        assert!(!config.reversed);
        assert_eq!(config.height_scale, 1.0);
        assert_eq!(config.pix_err_threshold, 0.25);
        assert_eq!(config.options().dem_interpolation, ResampleMethod::Bilinear);
        Ok(())
    }

    #[test]
    fn test_missing_model() {
        assert!(matches!(
            CemTransformerConfig::from_json(r#"{"Reversed": true}"#),
            Err(CemError::Serde(_))
        ));
    }
}
