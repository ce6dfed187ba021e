//! Request payloads for the AirHub endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::advisory::AdvisoryCategory;
use crate::geometry::Geometry;
use crate::time;

/// Most geo IDs an advisory query may filter on.
pub const MAX_QUERY_GEO_IDS: usize = 5;

/// Filters for finding advisories that intersect a geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryAdvisoryOptions {
    /// Point, line or polygon. Its bounding box may not exceed 100 miles a side.
    pub geometry: Geometry,

    /// Only advisories active at or after this instant.
    #[serde(
        rename = "startTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,

    /// Only advisories active at or before this instant.
    #[serde(
        rename = "endTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,

    /// Only advisories at or above this altitude.
    #[serde(rename = "altitudeLower", default, skip_serializing_if = "Option::is_none")]
    pub altitude_lower: Option<i32>,

    /// Only advisories at or below this altitude.
    #[serde(rename = "altitudeUpper", default, skip_serializing_if = "Option::is_none")]
    pub altitude_upper: Option<i32>,

    /// Only advisories in these geo IDs (at most [`MAX_QUERY_GEO_IDS`]).
    #[serde(rename = "geoIDs", default, skip_serializing_if = "Vec::is_empty")]
    pub geo_ids: Vec<String>,
}

impl QueryAdvisoryOptions {
    /// Query everything intersecting `geometry`.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Default::default()
        }
    }

    /// Restrict to a time window.
    pub fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Restrict to an altitude band.
    pub fn with_altitude_range(mut self, lower: i32, upper: i32) -> Self {
        self.altitude_lower = Some(lower);
        self.altitude_upper = Some(upper);
        self
    }

    /// Add a geo ID filter.
    pub fn with_geo_id(mut self, geo_id: impl Into<String>) -> Self {
        self.geo_ids.push(geo_id.into());
        self
    }
}

/// Payload for creating an advisory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateAdvisoryOptions {
    pub name: String,

    #[serde(rename = "geoId")]
    pub geo_id: String,

    #[serde(rename = "countryGeoID", default, skip_serializing_if = "String::is_empty")]
    pub country_geo_id: String,

    /// Point, line or polygon.
    #[serde(rename = "geom")]
    pub geometry: Geometry,

    #[serde(rename = "altitudeUpper")]
    pub altitude_upper: i32,

    #[serde(rename = "altitudeLower")]
    pub altitude_lower: i32,

    #[serde(rename = "advisoryCategory")]
    pub advisory_category: Option<AdvisoryCategory>,

    #[serde(rename = "timezoneName")]
    pub timezone_name: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub published: bool,

    #[serde(
        rename = "startTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(
        rename = "endTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "contactEmail", default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    #[serde(rename = "referenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,

    #[serde(rename = "contactPhone", default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// Partial update of an advisory. Only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateAdvisoryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "geoID", default, skip_serializing_if = "Option::is_none")]
    pub geo_id: Option<String>,

    #[serde(rename = "countryGeoID", default, skip_serializing_if = "Option::is_none")]
    pub country_geo_id: Option<String>,

    #[serde(rename = "geom", default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    #[serde(rename = "altitudeUpper", default, skip_serializing_if = "Option::is_none")]
    pub altitude_upper: Option<i32>,

    #[serde(rename = "altitudeLower", default, skip_serializing_if = "Option::is_none")]
    pub altitude_lower: Option<i32>,

    #[serde(rename = "referenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(rename = "advisoryCategory", default, skip_serializing_if = "Option::is_none")]
    pub advisory_category: Option<AdvisoryCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    #[serde(rename = "contactEmail", default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    #[serde(rename = "contactPhone", default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,

    #[serde(rename = "timezoneName", default, skip_serializing_if = "Option::is_none")]
    pub timezone_name: Option<String>,

    #[serde(
        rename = "startTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(
        rename = "endTime",
        default,
        with = "time::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
}

/// A data layer to fold into a surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    pub alias: String,
    pub fields: Vec<String>,
    pub code: String,
    /// Filter clauses, passed through as-is.
    #[serde(rename = "where")]
    pub where_: Vec<Value>,
    pub score: f64,
}

/// Request for a hexbin surface over an area.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SurfaceHexbinOptions {
    /// The area to cover.
    pub geometry: Geometry,

    /// Layers to query.
    pub layers: Vec<Layer>,

    /// H3 resolution used to index the area.
    pub resolution: u8,
}

/// FAA airspace data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaaType {
    /// Controlled airspace classification.
    ControlledAirspace,
    /// UAS Facility Management flight ceiling.
    UasfmCeiling,
    /// Both SUA prohibited and SUA restricted.
    Sua,
    /// Washington DC flight restricted zone.
    WashingtonFrz,
    /// Part-time national security UAS flight restriction.
    NsufrPt,
    /// Full-time national security UAS flight restriction.
    NsufrFt,
    /// Stadiums under TFR, buffered by 3 nautical miles.
    Stadium,
    /// Airports; within 3 nautical miles of the geometry unless buffered.
    Airports,
    /// Controlled airspace schedules for select airports.
    AirspaceSchedule,
    /// Temporary flight restrictions.
    Tfr,
}

/// Request for FAA aviation data intersecting a geometry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AviationOptions {
    /// Airport buffer in nautical miles. Sent as a query parameter, not in
    /// the body; only meaningful when `types` includes airports.
    #[serde(skip)]
    pub buffer: Option<u32>,

    /// Point, line or polygon; bounding box at most 30 nautical miles a side.
    pub geometry: Geometry,

    /// Types to return; empty means all of them.
    #[serde(rename = "type")]
    pub types: Vec<FaaType>,
}

/// Request for an airspace authorization check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckAirspaceOptions {
    /// The operation area (polygon).
    pub geometry: Geometry,

    #[serde(rename = "startTime", with = "time::required")]
    pub start_time: DateTime<Utc>,

    #[serde(rename = "endTime", with = "time::required")]
    pub end_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_query_options_skip_unset_filters() {
        let opts = QueryAdvisoryOptions::new(Geometry::point(-85.75, 38.25));
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            value,
            json!({"geometry": {"type": "Point", "coordinates": [-85.75, 38.25]}})
        );
    }

    #[test]
    fn test_query_options_full() {
        let start = Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 4, 23, 30, 0).unwrap();
        let opts = QueryAdvisoryOptions::new(Geometry::point(-85.75, 38.25))
            .with_time_range(start, end)
            .with_altitude_range(0, 400)
            .with_geo_id("21111");

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["startTime"], "2024-07-04T18:00:00Z");
        assert_eq!(value["endTime"], "2024-07-04T23:30:00Z");
        assert_eq!(value["altitudeLower"], 0);
        assert_eq!(value["altitudeUpper"], 400);
        assert_eq!(value["geoIDs"], json!(["21111"]));
    }

    #[test]
    fn test_create_options_wire_names() {
        let opts = CreateAdvisoryOptions {
            name: "Fireworks".to_string(),
            geo_id: "21111".to_string(),
            geometry: Geometry::point(-85.75, 38.25),
            altitude_upper: 400,
            advisory_category: Some(AdvisoryCategory::Recreational),
            timezone_name: "America/Kentucky/Louisville".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["geoId"], "21111");
        assert_eq!(value["geom"]["type"], "Point");
        assert_eq!(value["advisoryCategory"], "recreational");
        assert!(value.get("published").is_none());
        assert!(value.get("countryGeoID").is_none());
        assert!(value.get("contactEmail").is_none());
    }

    #[test]
    fn test_update_options_only_send_set_fields() {
        let opts = UpdateAdvisoryOptions {
            name: Some("Renamed".to_string()),
            published: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"name": "Renamed", "published": false})
        );
    }

    #[test]
    fn test_faa_type_snake_case() {
        let opts = AviationOptions {
            buffer: Some(5),
            geometry: Geometry::point(-85.75, 38.25),
            types: vec![FaaType::UasfmCeiling, FaaType::WashingtonFrz, FaaType::Tfr],
        };
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["type"], json!(["uasfm_ceiling", "washington_frz", "tfr"]));
        assert!(value.get("buffer").is_none());
    }

    #[test]
    fn test_layer_where_passthrough() {
        let layer = Layer {
            alias: "schools".to_string(),
            fields: vec!["name".to_string()],
            code: "k12".to_string(),
            where_: vec![json!(["state", "=", "KY"])],
            score: 0.5,
        };
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["where"], json!([["state", "=", "KY"]]));
    }

    #[test]
    fn test_check_airspace_times() {
        let opts = CheckAirspaceOptions {
            geometry: Geometry::point(-85.75, 38.25),
            start_time: Utc.with_ymd_and_hms(2024, 7, 4, 18, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 7, 4, 19, 0, 0).unwrap(),
        };
        let value = serde_json::to_value(&opts).unwrap();
        assert_eq!(value["startTime"], "2024-07-04T18:00:00Z");
        assert_eq!(value["endTime"], "2024-07-04T19:00:00Z");
    }
}
