/// An error building a transformer from its configuration.
#[derive(thiserror::Error, Debug)]
pub enum GeorefError {
    /// The collinearity equation transformer could not be built.
    #[error(transparent)]
    Cem(#[from] georef_cem::CemError),

    /// The triangulated transformer could not be built.
    #[error(transparent)]
    Tin(#[from] georef_tin::TinError),

    /// The configuration could not be (de)serialized.
    #[error("Failed to (de)serialize transformer configuration: {0}")]
    Serde(#[from] serde_json::Error),
}
