//! Tests for the Advisory GeoJSON Feature codec.

use airhub_protocol::{Advisory, AdvisoryCategory, CodecError, Geometry, Position};
use chrono::{DateTime, TimeZone, Timelike, Utc};
use test_utils::{assert_json_bytes_eq, coords, load_fixture, load_fixture_str};

const CRATE: &str = "airhub-protocol";

fn triangle() -> Geometry {
    Geometry::polygon(vec![coords::TRIANGLE_RING.to_vec()])
}

fn at_nanos(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, nano: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
        .with_nanosecond(nano)
        .unwrap()
}

fn populated(geometry: Geometry, url: &str) -> Advisory {
    Advisory {
        id: "heo2".to_string(),
        geo_id: "uqhroh3o".to_string(),
        advisory_category: Some(AdvisoryCategory::Admin),
        name: "oj2oiejqwo".to_string(),
        tags: vec!["asdh8".to_string(), "a9ud9".to_string()],
        altitude_lower: 100.0,
        altitude_upper: 200.0,
        geometry,
        start_time: Some(at_nanos(1902, 10, 2, 3, 5, 6, 11)),
        end_time: Some(at_nanos(2011, 11, 8, 1, 7, 3, 22)),
        timezone_name: "ajisodjaosd".to_string(),
        contact_email: Some("sh08dajsid".to_string()),
        contact_phone: Some("asjfasf".to_string()),
        country_geo_id: "kasojdiad".to_string(),
        url: Some(url.to_string()),
        reference_number: Some("sh08dajsid".to_string()),
        created_by: "asjidh8ajd0ip".to_string(),
        last_edited_by: "h89123h1".to_string(),
        published: true,
        ovn: "128h3910jidoqwnoq".to_string(),
        version: 2,
    }
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_encode_default_uses_empty_collection() {
    let encoded = Advisory::default().to_json().unwrap();
    assert_json_bytes_eq!(encoded, &load_fixture_str(CRATE, "advisory_base.json"));
}

#[test]
fn test_encode_geometry_only() {
    let advisory = Advisory {
        geometry: triangle(),
        ..Default::default()
    };
    let encoded = advisory.to_json().unwrap();
    assert_json_bytes_eq!(encoded, &load_fixture_str(CRATE, "advisory_geometry.json"));
}

#[test]
fn test_encode_fields_only() {
    let encoded = populated(Geometry::empty(), "sh08dajsid").to_json().unwrap();
    assert_json_bytes_eq!(encoded, &load_fixture_str(CRATE, "advisory_fields.json"));
}

#[test]
fn test_encode_geometry_and_fields() {
    let encoded = populated(triangle(), "asjfasf").to_json().unwrap();
    assert_json_bytes_eq!(encoded, &load_fixture_str(CRATE, "advisory_full.json"));
}

#[test]
fn test_encode_never_emits_null_geometry() {
    let encoded = Advisory::default().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
    assert_eq!(value["geometry"]["type"], "GeometryCollection");
    assert!(value["properties"].get("geometry").is_none());
}

#[test]
fn test_encode_fractional_altitude() {
    let advisory = Advisory {
        altitude_upper: 399.5,
        ..Default::default()
    };
    let encoded = String::from_utf8(advisory.to_json().unwrap()).unwrap();
    assert!(encoded.contains(r#""altitudeUpper":399.5"#));
    assert!(encoded.contains(r#""altitudeLower":0,"#));
}

#[test]
fn test_encode_rejects_malformed_geometry() {
    let advisory = Advisory {
        geometry: Geometry::line_string(vec![[0.5, 0.5]]),
        ..Default::default()
    };
    let err = advisory.to_json().unwrap_err();
    assert!(err.is_encode());
    assert!(err.to_string().contains("LineString"));
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_fixtures() {
    let cases = [
        ("advisory_base.json", Advisory::default()),
        (
            "advisory_geometry.json",
            Advisory {
                geometry: triangle(),
                ..Default::default()
            },
        ),
        ("advisory_fields.json", populated(Geometry::empty(), "sh08dajsid")),
        ("advisory_full.json", populated(triangle(), "asjfasf")),
    ];

    for (fixture, expected) in cases {
        let decoded = Advisory::from_json(&load_fixture(CRATE, fixture)).unwrap();
        assert_eq!(decoded, expected, "{}", fixture);
    }
}

#[test]
fn test_decode_server_response() {
    let advisory = Advisory::from_json(&load_fixture(CRATE, "advisory_server_response.json")).unwrap();

    assert_eq!(advisory.id, "5f8c2b7e-8d3a-4c1e-9a4b-2f6d7e1c0a93");
    assert_eq!(advisory.advisory_category, Some(AdvisoryCategory::Emergency));
    assert_eq!(advisory.tags, vec!["stadium", "tfr"]);
    assert_eq!(advisory.altitude_upper, 3000.5);
    assert_eq!(advisory.contact_email.as_deref(), Some("ops@example.com"));
    assert!(advisory.contact_phone.is_none());
    assert!(advisory.url.is_none());
    assert_eq!(advisory.version, 3);

    // Offsets normalize to UTC.
    assert_eq!(
        advisory.end_time,
        Some(at_nanos(2024, 7, 5, 3, 30, 0, 250_000_000))
    );

    // The top-level geometry wins over the stray one inside properties.
    assert_eq!(advisory.geometry.type_name(), "Polygon");
}

#[test]
fn test_decode_ignores_type_member() {
    let json = r#"{"type":"NotAFeature","geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{}}"#;
    let advisory = Advisory::from_json(json.as_bytes()).unwrap();
    assert_eq!(advisory.geometry, Geometry::point(1.5, 2.5));
}

#[test]
fn test_decode_missing_fields_are_zero() {
    let json = r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{"name":"only"}}"#;
    let advisory = Advisory::from_json(json.as_bytes()).unwrap();
    assert_eq!(
        advisory,
        Advisory {
            name: "only".to_string(),
            geometry: Geometry::point(1.5, 2.5),
            ..Default::default()
        }
    );
}

#[test]
fn test_decode_zero_time_is_unset() {
    let json = r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{"startTime":"0001-01-01T00:00:00Z","endTime":null}}"#;
    let advisory = Advisory::from_json(json.as_bytes()).unwrap();
    assert!(advisory.start_time.is_none());
    assert!(advisory.end_time.is_none());
}

#[test]
fn test_zero_instant_collapses_to_unset() {
    let zero = airhub_protocol::time::parse_rfc3339(airhub_protocol::time::ZERO_TIME).unwrap();
    let advisory = Advisory {
        start_time: Some(zero),
        ..Default::default()
    };

    let json = advisory.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["properties"]["startTime"], "0001-01-01T00:00:00Z");

    let decoded = Advisory::from_json(&json).unwrap();
    assert!(decoded.start_time.is_none());
}

#[test]
fn test_decode_geometry_with_altitude() {
    let json = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[-85.75,38.25,120.0]},"properties":{"name":"tower"}}"#;
    let advisory = Advisory::from_json(json.as_bytes()).unwrap();
    assert_eq!(
        advisory.geometry,
        Geometry::Point {
            coordinates: Position::with_alt(-85.75, 38.25, 120.0)
        }
    );

    let value: serde_json::Value = serde_json::from_slice(&advisory.to_json().unwrap()).unwrap();
    assert_eq!(
        value["geometry"]["coordinates"],
        serde_json::json!([-85.75, 38.25, 120])
    );
}

// ============================================================================
// Decode errors
// ============================================================================

fn assert_decode_error(json: &str) {
    match Advisory::from_json(json.as_bytes()) {
        Err(CodecError::Decode(_)) => {}
        other => panic!("Expected decode error for {}, got {:?}", json, other),
    }
}

#[test]
fn test_decode_rejects_non_object() {
    assert_decode_error("[]");
    assert_decode_error("\"Feature\"");
    assert_decode_error("null");
    assert_decode_error("{not json");
}

#[test]
fn test_decode_requires_geometry_and_properties() {
    assert_decode_error(r#"{"type":"Feature","properties":{}}"#);
    assert_decode_error(r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1.5,2.5]}}"#);
}

#[test]
fn test_decode_rejects_invalid_geometry() {
    assert_decode_error(r#"{"geometry":null,"properties":{}}"#);
    assert_decode_error(r#"{"geometry":{"type":"Point"},"properties":{}}"#);
    assert_decode_error(r#"{"geometry":{"type":"Hexagon","coordinates":[]},"properties":{}}"#);
    assert_decode_error(
        r#"{"geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1]]]},"properties":{}}"#,
    );
}

#[test]
fn test_decode_rejects_bad_property_types() {
    assert_decode_error(r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":[]}"#);
    assert_decode_error(
        r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{"advisoryCategory":"urgent"}}"#,
    );
    assert_decode_error(
        r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{"startTime":"soon"}}"#,
    );
    assert_decode_error(
        r#"{"geometry":{"type":"Point","coordinates":[1.5,2.5]},"properties":{"version":"two"}}"#,
    );
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_roundtrip_preserves_every_field() {
    let original = populated(triangle(), "https://airspacelink.com/asdasd");
    let decoded = Advisory::from_json(&original.to_json().unwrap()).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_roundtrip_point_with_nanosecond_times() {
    let original = Advisory {
        geometry: Geometry::point(coords::LOUISVILLE[0], coords::LOUISVILLE[1]),
        start_time: Some(at_nanos(2024, 7, 4, 18, 0, 0, 123_456_789)),
        end_time: Some(at_nanos(2024, 7, 4, 23, 59, 59, 999_999_999)),
        altitude_lower: -12.25,
        version: i64::MAX,
        ..Default::default()
    };
    let decoded = Advisory::from_json(&original.to_json().unwrap()).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_roundtrip_line_string() {
    let original = Advisory {
        name: "Pipeline inspection".to_string(),
        geometry: Geometry::line_string(vec![
            [-85.75, 38.25],
            [-85.5, 38.5],
            [-85.25, 38.375],
        ]),
        advisory_category: Some(AdvisoryCategory::Recreational),
        ..Default::default()
    };
    let decoded = Advisory::from_json(&original.to_json().unwrap()).unwrap();
    assert_eq!(decoded, original);
}
