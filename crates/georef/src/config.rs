use std::sync::Arc;

use georef_cem::{CemTransformer, CemTransformerConfig};
use georef_core::Transformer;
use georef_dem::DemProvider;
use georef_tin::{TinTransformer, TinTransformerConfig};
use serde::{Deserialize, Serialize};

use crate::GeorefError;

/// A persisted transformer, tagged with its kind.
///
/// The JSON form is an object with a single `CEMTransformer` or
/// `TINTransformer` key holding the transformer description.
///
/// # Examples
///
/// ```
/// use georef::TransformerConfig;
/// use georef::core::{TransformDirection, Transformer};
///
/// let config = TransformerConfig::from_json(r#"{
///     "TINTransformer": {
///         "Reversed": false,
///         "GCPList": [
///             {"Pixel": 0, "Line": 0, "X": 0, "Y": 0},
///             {"Pixel": 1, "Line": 0, "X": 2, "Y": 0},
///             {"Pixel": 0, "Line": 1, "X": 0, "Y": 2}
///         ]
///     }
/// }"#).unwrap();
///
/// let transformer = config.build(None).unwrap();
/// let [x, y] = transformer
///     .transform_point(TransformDirection::Forward, 0.5, 0.25, 0.0)
///     .unwrap();
/// assert!((x - 1.0).abs() < 1e-12 && (y - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransformerConfig {
    /// A collinearity equation transformer.
    #[serde(rename = "CEMTransformer")]
    Cem(CemTransformerConfig),
    /// A triangulated irregular network transformer.
    #[serde(rename = "TINTransformer")]
    Tin(TinTransformerConfig),
}

impl TransformerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeorefError::Serde`] if the JSON is malformed or the tag is
    /// unknown.
    pub fn from_json(json: &str) -> Result<Self, GeorefError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeorefError::Serde`] if serialization fails.
    pub fn to_json(&self) -> Result<String, GeorefError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the described transformer.
    ///
    /// # Arguments
    ///
    /// * `dem_provider` - Opens the elevation model of a collinearity
    ///   transformer. Ignored by the other kinds.
    ///
    /// # Errors
    ///
    /// The construction error of the transformer.
    pub fn build(
        &self,
        dem_provider: Option<Arc<dyn DemProvider>>,
    ) -> Result<Box<dyn Transformer>, GeorefError> {
        Ok(match self {
            Self::Cem(config) => {
                let mut transformer = config.build()?;
                if let Some(provider) = dem_provider {
                    transformer = transformer.with_dem_provider(provider);
                }
                Box::new(transformer)
            }
            Self::Tin(config) => Box::new(config.build()?),
        })
    }
}

impl From<&CemTransformer> for TransformerConfig {
    fn from(transformer: &CemTransformer) -> Self {
        Self::Cem(transformer.to_config())
    }
}

impl From<&TinTransformer> for TransformerConfig {
    fn from(transformer: &TinTransformer) -> Self {
        Self::Tin(transformer.to_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag() {
        let res = TransformerConfig::from_json(r#"{"GCPTransformer": {}}"#);
        assert!(matches!(res, Err(GeorefError::Serde(_))));
    }

    #[test]
    fn test_tag_names() -> Result<(), Box<dyn std::error::Error>> {
        let tin = TransformerConfig::Tin(TinTransformerConfig::default());
        let value = serde_json::to_value(&tin)?;
        assert!(value.get("TINTransformer").is_some());

        let json = tin.to_json()?;
        assert_eq!(TransformerConfig::from_json(&json)?, tin);
        Ok(())
    }

    #[test]
    fn test_build_error_propagates() -> Result<(), GeorefError> {
        let tin = TransformerConfig::Tin(TinTransformerConfig::default());
        assert!(matches!(
            tin.build(None),
            Err(GeorefError::Tin(georef_tin::TinError::NotEnoughPoints(0)))
        ));
        Ok(())
    }
}
