//! Number formatting shared by the codecs.

use serde::Serializer;

/// Largest magnitude that survives an `f64` -> `i64` -> `f64` trip exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize a float, dropping the fractional part when it is zero.
///
/// The API writes altitudes as `100`, not `100.0`; matching that keeps
/// encoded advisories byte-identical to what the server sends back.
pub(crate) fn serialize_f64<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
