//! Advisories and their GeoJSON Feature codec.
//!
//! Advisories represent geographic areas where special consideration must
//! be made before operating drones, ranging from restricted airspace where
//! flying is illegal to warnings that give context about the area.
//!
//! On the wire an advisory is a GeoJSON Feature:
//!
//! ```json
//! {
//!     "type": "Feature",
//!     "geometry": {"type": "Polygon", "coordinates": [...]},
//!     "properties": {"advisoryCategory": "admin", "altitudeLower": 0, ...}
//! }
//! ```
//!
//! The flat [`Advisory`] record keeps the geometry next to the other
//! fields; the codec splits it out on encode and folds it back in on decode.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};

use crate::errors::{CodecError, CodecResult};
use crate::geometry::Geometry;
use crate::{number, time};

/// Advisory category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryCategory {
    Emergency,
    Recreational,
    Admin,
}

impl AdvisoryCategory {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::Emergency => "emergency",
            AdvisoryCategory::Recreational => "recreational",
            AdvisoryCategory::Admin => "admin",
        }
    }
}

impl fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographically and temporally scoped flight notice.
///
/// Values are either built by the caller for create/update requests or
/// decoded from a server response. Unset timestamps are `None` and travel
/// as the zero instant `0001-01-01T00:00:00Z`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Advisory {
    /// Server-assigned identifier.
    pub id: String,
    pub geo_id: String,
    /// Category; `None` encodes as `null`.
    pub advisory_category: Option<AdvisoryCategory>,
    pub name: String,
    pub tags: Vec<String>,

    // Geospatial/temporal fields
    pub altitude_lower: f64,
    pub altitude_upper: f64,
    /// Point, line or polygon. The default empty collection means "unset".
    pub geometry: Geometry,
    /// `None` encodes as `0001-01-01T00:00:00Z`. That literal decodes back
    /// to `None`, so `Some` of the zero instant does not survive a round trip.
    pub start_time: Option<DateTime<Utc>>,
    /// Same zero-instant handling as `start_time`.
    pub end_time: Option<DateTime<Utc>>,
    pub timezone_name: String,

    // Contact metadata
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub country_geo_id: String,
    pub url: Option<String>,
    pub reference_number: Option<String>,

    // Access control metadata
    pub created_by: String,
    pub last_edited_by: String,
    pub published: bool,

    // ASTM optimistic concurrency
    pub ovn: String,
    pub version: i64,
}

impl Advisory {
    /// Decode an advisory from a GeoJSON Feature.
    pub fn from_json(buf: &[u8]) -> CodecResult<Self> {
        serde_json::from_slice(buf).map_err(CodecError::Decode)
    }

    /// Encode this advisory as a GeoJSON Feature.
    pub fn to_json(&self) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Whether the advisory carries a real geometry.
    pub fn has_geometry(&self) -> bool {
        !self.geometry.is_empty()
    }

    /// Whether the advisory is active at `at`. Unset bounds are open.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_time.map_or(true, |start| start <= at)
            && self.end_time.map_or(true, |end| at <= end)
    }
}

/// Outgoing Feature envelope.
#[derive(Serialize)]
struct FeatureOut<'a> {
    #[serde(rename = "type")]
    type_: &'static str,
    geometry: &'a Geometry,
    properties: PropertiesOut<'a>,
}

/// Outgoing properties. Fields are declared in lexicographic wire order so
/// the encoded object is byte-stable.
#[derive(Serialize)]
struct PropertiesOut<'a> {
    #[serde(rename = "advisoryCategory")]
    advisory_category: Option<AdvisoryCategory>,
    #[serde(rename = "altitudeLower", serialize_with = "number::serialize_f64")]
    altitude_lower: f64,
    #[serde(rename = "altitudeUpper", serialize_with = "number::serialize_f64")]
    altitude_upper: f64,
    #[serde(rename = "contactEmail")]
    contact_email: Option<&'a str>,
    #[serde(rename = "contactPhone")]
    contact_phone: Option<&'a str>,
    #[serde(rename = "countryGeoID")]
    country_geo_id: &'a str,
    #[serde(rename = "createdBy")]
    created_by: &'a str,
    #[serde(rename = "endTime", with = "time::zero_default")]
    end_time: Option<DateTime<Utc>>,
    #[serde(rename = "geoID")]
    geo_id: &'a str,
    id: &'a str,
    #[serde(rename = "lastEditedBy")]
    last_edited_by: &'a str,
    name: &'a str,
    ovn: &'a str,
    published: bool,
    #[serde(rename = "referenceNumber")]
    reference_number: Option<&'a str>,
    #[serde(rename = "startTime", with = "time::zero_default")]
    start_time: Option<DateTime<Utc>>,
    tags: Option<&'a [String]>,
    #[serde(rename = "timezoneName")]
    timezone_name: &'a str,
    url: Option<&'a str>,
    version: i64,
}

impl<'a> From<&'a Advisory> for PropertiesOut<'a> {
    fn from(a: &'a Advisory) -> Self {
        Self {
            advisory_category: a.advisory_category,
            altitude_lower: a.altitude_lower,
            altitude_upper: a.altitude_upper,
            contact_email: a.contact_email.as_deref(),
            contact_phone: a.contact_phone.as_deref(),
            country_geo_id: &a.country_geo_id,
            created_by: &a.created_by,
            end_time: a.end_time,
            geo_id: &a.geo_id,
            id: &a.id,
            last_edited_by: &a.last_edited_by,
            name: &a.name,
            ovn: &a.ovn,
            published: a.published,
            reference_number: a.reference_number.as_deref(),
            start_time: a.start_time,
            tags: (!a.tags.is_empty()).then_some(a.tags.as_slice()),
            timezone_name: &a.timezone_name,
            url: a.url.as_deref(),
            version: a.version,
        }
    }
}

impl Serialize for Advisory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.geometry.validate().map_err(ser::Error::custom)?;

        FeatureOut {
            type_: "Feature",
            geometry: &self.geometry,
            properties: PropertiesOut::from(self),
        }
        .serialize(serializer)
    }
}

/// Incoming properties. Missing keys and explicit `null`s fall back to
/// the zero value; unknown keys (including a stray `geometry`) are skipped.
#[derive(Deserialize, Default)]
#[serde(default)]
struct PropertiesIn {
    #[serde(deserialize_with = "null_as_default")]
    id: String,
    #[serde(rename = "geoID", deserialize_with = "null_as_default")]
    geo_id: String,
    #[serde(rename = "advisoryCategory")]
    advisory_category: Option<AdvisoryCategory>,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    tags: Vec<String>,
    #[serde(rename = "altitudeLower", deserialize_with = "null_as_default")]
    altitude_lower: f64,
    #[serde(rename = "altitudeUpper", deserialize_with = "null_as_default")]
    altitude_upper: f64,
    #[serde(rename = "startTime", with = "time::zero_default")]
    start_time: Option<DateTime<Utc>>,
    #[serde(rename = "endTime", with = "time::zero_default")]
    end_time: Option<DateTime<Utc>>,
    #[serde(rename = "timezoneName", deserialize_with = "null_as_default")]
    timezone_name: String,
    #[serde(rename = "contactEmail")]
    contact_email: Option<String>,
    #[serde(rename = "contactPhone")]
    contact_phone: Option<String>,
    #[serde(rename = "countryGeoID", deserialize_with = "null_as_default")]
    country_geo_id: String,
    url: Option<String>,
    #[serde(rename = "referenceNumber")]
    reference_number: Option<String>,
    #[serde(rename = "createdBy", deserialize_with = "null_as_default")]
    created_by: String,
    #[serde(rename = "lastEditedBy", deserialize_with = "null_as_default")]
    last_edited_by: String,
    #[serde(deserialize_with = "null_as_default")]
    published: bool,
    #[serde(deserialize_with = "null_as_default")]
    ovn: String,
    #[serde(deserialize_with = "null_as_default")]
    version: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PropertiesIn {
    fn into_advisory(self, geometry: Geometry) -> Advisory {
        Advisory {
            id: self.id,
            geo_id: self.geo_id,
            advisory_category: self.advisory_category,
            name: self.name,
            tags: self.tags,
            altitude_lower: self.altitude_lower,
            altitude_upper: self.altitude_upper,
            geometry,
            start_time: self.start_time,
            end_time: self.end_time,
            timezone_name: self.timezone_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            country_geo_id: self.country_geo_id,
            url: self.url,
            reference_number: self.reference_number,
            created_by: self.created_by,
            last_edited_by: self.last_edited_by,
            published: self.published,
            ovn: self.ovn,
            version: self.version,
        }
    }
}

impl<'de> Deserialize<'de> for Advisory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureVisitor)
    }
}

/// Walks the Feature object by hand so only a JSON object is accepted and
/// `geometry`/`properties` are both required.
struct FeatureVisitor;

impl<'de> Visitor<'de> for FeatureVisitor {
    type Value = Advisory;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a GeoJSON Feature object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Advisory, A::Error> {
        let mut geometry: Option<Geometry> = None;
        let mut properties: Option<Option<PropertiesIn>> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "geometry" => {
                    if geometry.is_some() {
                        return Err(de::Error::duplicate_field("geometry"));
                    }
                    geometry = Some(map.next_value()?);
                }
                "properties" => {
                    if properties.is_some() {
                        return Err(de::Error::duplicate_field("properties"));
                    }
                    properties = Some(map.next_value()?);
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let geometry = geometry.ok_or_else(|| de::Error::missing_field("geometry"))?;
        let properties = properties.ok_or_else(|| de::Error::missing_field("properties"))?;

        geometry.validate().map_err(de::Error::custom)?;

        Ok(properties.unwrap_or_default().into_advisory(geometry))
    }
}
