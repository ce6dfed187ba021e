//! Response envelopes.

use serde::{Deserialize, Serialize};

/// Envelope used by the token and aviation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerResponse<T> {
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,

    #[serde(default)]
    pub message: String,

    pub data: T,
}

/// Error body returned alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: String,
}

/// Result of an airspace authorization check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AirspaceDetails {
    /// The area intersects controlled airspace.
    #[serde(default)]
    pub controlled: bool,

    /// LAANC authorization is available for the area.
    #[serde(default)]
    pub enabled: bool,

    /// The area is restricted from flight.
    #[serde(default)]
    pub restricted: bool,
}
