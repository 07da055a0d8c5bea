#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use georef_core as core;

#[doc(inline)]
pub use georef_linalg as linalg;

#[doc(inline)]
pub use georef_dem as dem;

#[doc(inline)]
pub use georef_cem as cem;

#[doc(inline)]
pub use georef_tin as tin;

mod error;
pub use error::GeorefError;

/// Tagged transformer configurations.
pub mod config;
pub use config::TransformerConfig;
