use georef_core::Gcp;
use serde::{Deserialize, Serialize};

use crate::{TinError, TinTransformer};

/// Persisted description of a [`TinTransformer`].
///
/// # Examples
///
/// ```
/// use georef_tin::TinTransformerConfig;
///
/// let config = TinTransformerConfig::from_json(
///     r#"{
///         "Reversed": false,
///         "GCPList": [
///             {"Pixel": 0, "Line": 0, "X": 100, "Y": 200},
///             {"Pixel": 10, "Line": 0, "X": 110, "Y": 200},
///             {"Pixel": 0, "Line": 10, "X": 100, "Y": 190}
///         ]
///     }"#,
/// ).unwrap();
///
/// let tin = config.build().unwrap();
/// assert_eq!(tin.gcps().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TinTransformerConfig {
    /// Swap the forward and inverse directions.
    #[serde(default)]
    pub reversed: bool,
    /// The control points.
    #[serde(rename = "GCPList", default, skip_serializing_if = "Vec::is_empty")]
    pub gcp_list: Vec<Gcp>,
}

impl TinTransformerConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TinError::Serde`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, TinError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the configuration as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TinError::Serde`] if serialization fails.
    pub fn to_json(&self) -> Result<String, TinError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the transformer described by this configuration.
    ///
    /// # Errors
    ///
    /// Same as [`TinTransformer::new`].
    pub fn build(&self) -> Result<TinTransformer, TinError> {
        TinTransformer::new(&self.gcp_list, self.reversed)
    }
}

impl TinTransformer {
    /// Describes the transformer for persistence.
    pub fn to_config(&self) -> TinTransformerConfig {
        TinTransformerConfig {
            reversed: self.is_reversed(),
            gcp_list: self.gcps().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use georef_core::{TransformDirection, Transformer};

    #[test]
    fn test_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let gcps = vec![
            Gcp::new(0.0, 0.0, 500.0, 900.0),
            Gcp::new(100.0, 0.0, 800.0, 880.0),
            Gcp::new(0.0, 100.0, 520.0, 600.0),
            Gcp::new(100.0, 100.0, 830.0, 590.0),
            Gcp::new(40.0, 60.0, 640.0, 720.0),
        ];
        let tin = TinTransformer::new(&gcps, true)?;

        let json = tin.to_config().to_json()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value["Reversed"], true);
        assert_eq!(value["GCPList"][4]["Pixel"], 40.0);

        let back = TinTransformerConfig::from_json(&json)?.build()?;
        assert_eq!(back.to_config(), tin.to_config());
        for (x, y) in [(600.0, 700.0), (0.0, 0.0), (810.0, 620.0)] {
            assert_eq!(
                back.transform_point(TransformDirection::Forward, x, y, 0.0),
                tin.transform_point(TransformDirection::Forward, x, y, 0.0)
            );
        }
        Ok(())
    }

    #[test]
    fn test_missing_gcps() -> Result<(), TinError> {
        let config = TinTransformerConfig::from_json(r#"{"Reversed": true}"#)?;
        assert!(config.gcp_list.is_empty());
        assert!(matches!(config.build(), Err(TinError::NotEnoughPoints(0))));
        Ok(())
    }
}
