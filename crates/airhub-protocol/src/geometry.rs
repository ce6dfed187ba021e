//! GeoJSON geometry types.
//!
//! AirHub accepts and returns plain GeoJSON (RFC 7946) geometries. Every
//! request that scopes a query spatially carries one, and advisories embed
//! one in their `Feature` envelope.
//!
//! Positions are `[longitude, latitude]` with an optional third altitude
//! element. Whole-number coordinates encode without a fractional part.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::number::serialize_f64;

/// A GeoJSON position: longitude, latitude and an optional altitude.
///
/// Elements past the third are accepted on decode and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
    pub alt: Option<f64>,
}

impl Position {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat, alt: None }
    }

    pub const fn with_alt(lon: f64, lat: f64, alt: f64) -> Self {
        Self {
            lon,
            lat,
            alt: Some(alt),
        }
    }

    fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.alt.map_or(true, f64::is_finite)
    }
}

impl From<[f64; 2]> for Position {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self::new(lon, lat)
    }
}

impl From<[f64; 3]> for Position {
    fn from([lon, lat, alt]: [f64; 3]) -> Self {
        Self::with_alt(lon, lat, alt)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alt {
            Some(alt) => write!(f, "[{}, {}, {}]", self.lon, self.lat, alt),
            None => write!(f, "[{}, {}]", self.lon, self.lat),
        }
    }
}

struct Coordinate(f64);

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_f64(&self.0, serializer)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.alt.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&Coordinate(self.lon))?;
        seq.serialize_element(&Coordinate(self.lat))?;
        if let Some(alt) = self.alt {
            seq.serialize_element(&Coordinate(alt))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values[..] {
            [lon, lat] => Ok(Self::new(lon, lat)),
            [lon, lat, alt, ..] => Ok(Self::with_alt(lon, lat, alt)),
            _ => Err(de::Error::invalid_length(values.len(), &"at least 2 elements")),
        }
    }
}

/// Reasons a geometry is rejected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    /// A coordinate is NaN or infinite.
    #[error("Non-finite coordinate: {0}")]
    NonFiniteCoordinate(Position),

    /// A line string has fewer than two positions.
    #[error("LineString needs at least 2 positions, got {0}")]
    LineStringTooShort(usize),

    /// A polygon ring has fewer than four positions.
    #[error("Polygon ring needs at least 4 positions, got {0}")]
    RingTooShort(usize),

    /// A polygon ring does not end where it starts.
    #[error("Polygon ring is not closed")]
    RingNotClosed,

    /// A polygon has no rings at all.
    #[error("Polygon has no rings")]
    EmptyPolygon,
}

/// GeoJSON geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// Coordinates as [longitude, latitude].
        coordinates: Position,
    },

    /// Several unconnected positions.
    MultiPoint {
        coordinates: Vec<Position>,
    },

    /// A connected path of at least two positions.
    LineString {
        coordinates: Vec<Position>,
    },

    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },

    /// A polygon geometry.
    Polygon {
        /// Linear rings; the first is the exterior, the rest are holes.
        coordinates: Vec<Vec<Position>>,
    },

    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },

    /// A heterogeneous collection. Empty, it stands in for "no geometry".
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::empty()
    }
}

impl Geometry {
    /// An empty geometry collection.
    pub fn empty() -> Self {
        Geometry::GeometryCollection {
            geometries: Vec::new(),
        }
    }

    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: Position::new(lon, lat),
        }
    }

    /// Create a line string geometry.
    pub fn line_string<P: Into<Position>>(coordinates: Vec<P>) -> Self {
        Geometry::LineString {
            coordinates: coordinates.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a polygon geometry from rings.
    pub fn polygon<P: Into<Position>>(rings: Vec<Vec<P>>) -> Self {
        Geometry::Polygon {
            coordinates: rings
                .into_iter()
                .map(|ring| ring.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Whether this is an empty geometry collection.
    pub fn is_empty(&self) -> bool {
        matches!(self, Geometry::GeometryCollection { geometries } if geometries.is_empty())
    }

    /// The GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Check the structural rules GeoJSON places on each geometry kind.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Geometry::Point { coordinates } => check_position(coordinates),
            Geometry::MultiPoint { coordinates } => coordinates.iter().try_for_each(check_position),
            Geometry::LineString { coordinates } => check_line(coordinates),
            Geometry::MultiLineString { coordinates } => {
                coordinates.iter().try_for_each(|line| check_line(line))
            }
            Geometry::Polygon { coordinates } => check_polygon(coordinates),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().try_for_each(|polygon| check_polygon(polygon))
            }
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().try_for_each(Geometry::validate)
            }
        }
    }
}

fn check_position(position: &Position) -> Result<(), GeometryError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteCoordinate(*position))
    }
}

fn check_line(line: &[Position]) -> Result<(), GeometryError> {
    if line.len() < 2 {
        return Err(GeometryError::LineStringTooShort(line.len()));
    }
    line.iter().try_for_each(check_position)
}

fn check_polygon(rings: &[Vec<Position>]) -> Result<(), GeometryError> {
    if rings.is_empty() {
        return Err(GeometryError::EmptyPolygon);
    }

    for ring in rings {
        if ring.len() < 4 {
            return Err(GeometryError::RingTooShort(ring.len()));
        }
        ring.iter().try_for_each(check_position)?;
        if ring.first() != ring.last() {
            return Err(GeometryError::RingNotClosed);
        }
    }
    Ok(())
}

/// A generic GeoJSON Feature.
///
/// FAA aviation layers come back as plain features. Some of them (airspace
/// schedules, for one) carry no geometry at all, so `geometry` is nullable
/// here, unlike on [`Advisory`](crate::Advisory).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// The geometry of this feature, if any.
    pub geometry: Option<Geometry>,

    /// Free-form properties.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// Create a feature around a geometry.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a property by key.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }
}
