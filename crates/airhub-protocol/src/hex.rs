//! H3 hexbin features.
//!
//! A [`HexFeature`] is the H3 counterpart of a GeoJSON Feature: instead of
//! a geometry it carries a set of H3 cell indices, and its properties member
//! is shortened to `props`:
//!
//! ```json
//! {"hexes": ["892ab2c106bffff", "892ab2c1073ffff"], "props": {"score": 0.4}}
//! ```
//!
//! The hexes form a set. Encoding walks a `HashSet`, so the order of the
//! `hexes` array is unspecified; use [`HexFeature::to_json_sorted`] when a
//! byte-stable encoding is needed.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::errors::{CodecError, CodecResult};
use crate::number::serialize_f64;

/// Longest canonical hex string of a 64-bit index.
const MAX_HEX_DIGITS: usize = 16;

/// Error type for hex index parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HexIndexParseError {
    #[error("Empty hex index")]
    Empty,

    #[error("Hex index '{0}' has more than 16 digits")]
    TooLong(String),

    #[error("Hex index '{0}' contains a non-hex character")]
    InvalidDigit(String),
}

/// A 64-bit H3 cell index.
///
/// The canonical text form is lowercase hexadecimal without a prefix or
/// leading zeros, the same string form H3 itself uses. No H3 validity
/// check (resolution, base cell, mode bits) is performed; the index is
/// carried as an opaque identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HexIndex(u64);

impl HexIndex {
    /// Wrap a raw index.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw 64-bit value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for HexIndex {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<HexIndex> for u64 {
    fn from(index: HexIndex) -> Self {
        index.0
    }
}

impl fmt::Display for HexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl FromStr for HexIndex {
    type Err = HexIndexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(HexIndexParseError::Empty);
        }
        // from_str_radix tolerates a leading '+', the wire format does not.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexIndexParseError::InvalidDigit(s.to_string()));
        }

        let digits = s.trim_start_matches('0');
        if digits.len() > MAX_HEX_DIGITS {
            return Err(HexIndexParseError::TooLong(s.to_string()));
        }
        if digits.is_empty() {
            return Ok(Self(0));
        }

        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| HexIndexParseError::InvalidDigit(s.to_string()))
    }
}

impl Serialize for HexIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A set of H3 cells with an open properties bag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HexFeature {
    /// Cell membership; no per-cell payload.
    pub hexes: HashSet<HexIndex>,
    /// Pass-through properties; `None` encodes as `null`.
    pub props: Option<Map<String, Value>>,
}

impl HexFeature {
    /// Create a feature from cells, without properties.
    pub fn new(hexes: impl IntoIterator<Item = HexIndex>) -> Self {
        Self {
            hexes: hexes.into_iter().collect(),
            props: None,
        }
    }

    /// Attach a properties bag.
    pub fn with_props(mut self, props: Map<String, Value>) -> Self {
        self.props = Some(props);
        self
    }

    /// Whether `index` is one of the cells.
    pub fn contains(&self, index: HexIndex) -> bool {
        self.hexes.contains(&index)
    }

    /// Cells in ascending numeric order.
    pub fn sorted_hexes(&self) -> Vec<HexIndex> {
        let mut hexes: Vec<HexIndex> = self.hexes.iter().copied().collect();
        hexes.sort_unstable();
        hexes
    }

    /// Decode from `{"hexes": [...], "props": {...}}` or `null`.
    pub fn from_json(buf: &[u8]) -> CodecResult<Self> {
        serde_json::from_slice(buf).map_err(CodecError::Decode)
    }

    /// Encode with hexes in unspecified order.
    pub fn to_json(&self) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(CodecError::Encode)
    }

    /// Encode with hexes sorted, for byte-stable output.
    pub fn to_json_sorted(&self) -> CodecResult<Vec<u8>> {
        let encoded = Encoded {
            hexes: self.sorted_hexes(),
            props: self.props.as_ref().map(Props),
        };
        serde_json::to_vec(&encoded).map_err(CodecError::Encode)
    }
}

#[derive(Serialize)]
struct Encoded<'a> {
    hexes: Vec<HexIndex>,
    props: Option<Props<'a>>,
}

impl Serialize for HexFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Encoded {
            hexes: self.hexes.iter().copied().collect(),
            props: self.props.as_ref().map(Props),
        }
        .serialize(serializer)
    }
}

/// Props on the way out: whole floats lose their fractional part, so a
/// decoded `1` re-encodes as `1` rather than `1.0`.
struct Props<'a>(&'a Map<String, Value>);

impl Serialize for Props<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (key, PropValue(value))))
    }
}

struct PropValue<'a>(&'a Value);

impl Serialize for PropValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Number(n) if n.is_f64() => match n.as_f64() {
                Some(float) => serialize_f64(&float, serializer),
                None => n.serialize(serializer),
            },
            Value::Array(items) => serializer.collect_seq(items.iter().map(PropValue)),
            Value::Object(map) => Props(map).serialize(serializer),
            other => other.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
struct Decoded {
    hexes: Vec<HexIndex>,
    #[serde(default)]
    props: Option<Map<String, Value>>,
}

impl<'de> Deserialize<'de> for HexFeature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Some(decoded) = Option::<Decoded>::deserialize(deserializer)? else {
            return Ok(HexFeature::default());
        };

        Ok(HexFeature {
            hexes: decoded.hexes.into_iter().collect(),
            props: decoded.props.map(floats_only),
        })
    }
}

/// Re-type every number in the bag as floating point, the way a generic
/// JSON decoder without integer support would see it.
fn floats_only(props: Map<String, Value>) -> Map<String, Value> {
    props
        .into_iter()
        .map(|(key, value)| (key, float_value(value)))
        .collect()
}

fn float_value(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64().and_then(Number::from_f64) {
            Some(float) => Value::Number(float),
            None => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(float_value).collect()),
        Value::Object(map) => Value::Object(floats_only(map)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_without_prefix() {
        assert_eq!(HexIndex::new(172893179283).to_string(), "28413c8d93");
        assert_eq!(HexIndex::new(0x8928308280fffff).to_string(), "8928308280fffff");
        assert_eq!(HexIndex::new(0).to_string(), "0");
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        assert_eq!("AE769F6".parse::<HexIndex>(), Ok(HexIndex::new(182938102)));
    }

    #[test]
    fn test_parse_leading_zeros() {
        assert_eq!("000ae769f6".parse::<HexIndex>(), Ok(HexIndex::new(182938102)));
        assert_eq!("0000".parse::<HexIndex>(), Ok(HexIndex::new(0)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!("".parse::<HexIndex>(), Err(HexIndexParseError::Empty));
        assert!(matches!(
            "0x28413c8d93".parse::<HexIndex>(),
            Err(HexIndexParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            "+ae769f6".parse::<HexIndex>(),
            Err(HexIndexParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            "fffffffffffffffff".parse::<HexIndex>(),
            Err(HexIndexParseError::TooLong(_))
        ));
    }

    #[test]
    fn test_parse_max_value() {
        assert_eq!(
            "ffffffffffffffff".parse::<HexIndex>(),
            Ok(HexIndex::new(u64::MAX))
        );
    }

    #[test]
    fn test_float_value_recurses() {
        let value = serde_json::json!({"a": [1, {"b": 2}], "c": "3"});
        let Value::Object(map) = value else {
            panic!("Expected object");
        };
        let converted = Value::Object(floats_only(map));
        assert_eq!(converted, serde_json::json!({"a": [1.0, {"b": 2.0}], "c": "3"}));
    }

    #[test]
    fn test_sorted_hexes() {
        let feature = HexFeature::new([HexIndex::new(30), HexIndex::new(10), HexIndex::new(20)]);
        assert_eq!(
            feature.sorted_hexes(),
            vec![HexIndex::new(10), HexIndex::new(20), HexIndex::new(30)]
        );
        assert!(feature.contains(HexIndex::new(20)));
        assert!(!feature.contains(HexIndex::new(40)));
    }
}
