//! Common test fixtures for AirHub tests.
//!
//! Pre-defined coordinates, instants, credentials and canned API bodies
//! shared by the protocol and client test suites.

/// Coordinates used across tests, as `[longitude, latitude]`.
pub mod coords {
    /// Louisville, KY (the API's home turf).
    pub const LOUISVILLE: [f64; 2] = [-85.7585, 38.2527];

    /// A closed triangle ring spanning Kentucky, the Levant and DC.
    pub const TRIANGLE_RING: [[f64; 2]; 4] = [
        [-85.38391174432391, 38.782187748582714],
        [34.782107793927395, 32.085243181703234],
        [-77.03652118394466, 38.897601427166194],
        [-85.38391174432391, 38.782187748582714],
    ];
}

/// Common time values for testing.
pub mod time {
    /// Far-future expiry for tokens that should never need refreshing.
    pub const FAR_FUTURE: &str = "2999-01-01T00:00:00Z";

    /// Long-expired instant.
    pub const LONG_AGO: &str = "1000-02-03T07:43:22.987Z";
}

/// Credentials accepted by the mock server.
pub mod credentials {
    pub const API_KEY: &str = "test-api-key";
    pub const CLIENT_ID: &str = "test-client-id";
    pub const CLIENT_SECRET: &str = "test-client-secret";
    pub const ACCESS_TOKEN: &str = "xyz123";
}

/// Canned response bodies.
pub mod bodies {
    use serde_json::{json, Value};

    /// Enveloped token response granting `scope` until `expires`.
    pub fn token_response(access_token: &str, expires: &str, scope: &str) -> Value {
        json!({
            "statusCode": 200,
            "message": "success",
            "data": {
                "accessToken": access_token,
                "expires": expires,
                "scope": scope,
            }
        })
    }

    /// Error body in the API's `{"message": ...}` shape.
    pub fn error_message(message: &str) -> Value {
        json!({ "statusCode": 400, "message": message })
    }

    /// A minimal advisory Feature around a point.
    pub fn advisory_feature(id: &str, name: &str, lon: f64, lat: f64) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": {
                "id": id,
                "name": name,
                "advisoryCategory": "emergency",
                "altitudeLower": 0,
                "altitudeUpper": 400,
                "startTime": "0001-01-01T00:00:00Z",
                "endTime": "0001-01-01T00:00:00Z",
                "published": true,
                "version": 1,
            }
        })
    }
}
