//! AirHub API wire types.
//!
//! This crate holds the request and response payloads exchanged with the
//! AirHub REST API, along with the two non-trivial JSON codecs the API
//! relies on:
//!
//! - [`Advisory`] round-trips through a GeoJSON `Feature` envelope, with the
//!   geometry split out from the flat advisory properties.
//! - [`HexFeature`] carries a set of H3 cell indices, encoded as an array of
//!   hex strings, next to an open properties bag.
//!
//! Everything here is pure data transformation; the HTTP plumbing lives in
//! the `airhub-client` crate.
//!
//! # Example
//!
//! ```rust
//! use airhub_protocol::{Advisory, AdvisoryCategory, Geometry};
//!
//! let advisory = Advisory {
//!     name: "Stadium TFR".to_string(),
//!     advisory_category: Some(AdvisoryCategory::Emergency),
//!     geometry: Geometry::point(-85.75, 38.25),
//!     ..Default::default()
//! };
//!
//! let json = advisory.to_json().unwrap();
//! let decoded = Advisory::from_json(&json).unwrap();
//! assert_eq!(advisory, decoded);
//! ```

pub mod advisory;
pub mod auth;
pub mod errors;
pub mod geometry;
pub mod hex;
pub mod requests;
pub mod responses;
pub mod time;

mod number;

pub use advisory::{Advisory, AdvisoryCategory};
pub use auth::{Scope, Token};
pub use errors::{CodecError, CodecResult};
pub use geometry::{Feature, Geometry, GeometryError, Position};
pub use hex::{HexFeature, HexIndex, HexIndexParseError};
pub use requests::{
    AviationOptions, CheckAirspaceOptions, CreateAdvisoryOptions, FaaType, Layer,
    QueryAdvisoryOptions, SurfaceHexbinOptions, UpdateAdvisoryOptions,
};
pub use responses::{AirspaceDetails, ServerMessage, ServerResponse};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Base URLs of the hosted AirHub API.
pub mod base_urls {
    /// Production (live mode) endpoint.
    pub const PRODUCTION: &str = "https://airhub-api.airspacelink.com";
    /// Sandbox endpoint; does not touch live data.
    pub const SANDBOX: &str = "https://airhub-api-sandbox.airspacelink.com";
}

/// Media types used in AirHub requests.
pub mod media_types {
    /// JSON request and response bodies.
    pub const JSON: &str = "application/json";
    /// OAuth token request body.
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
}

/// Decode any wire type from raw JSON bytes.
pub fn decode<T: DeserializeOwned>(buf: &[u8]) -> CodecResult<T> {
    serde_json::from_slice(buf).map_err(CodecError::Decode)
}

/// Encode any wire type to JSON bytes.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(CodecError::Encode)
}
