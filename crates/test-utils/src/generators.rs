//! Test data generators for hex indices and geometries.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// A resolution 9 H3 cell near Louisville, used as the base of generated runs.
pub const BASE_HEX_INDEX: u64 = 0x892a_b2c1_06bf_fff;

/// Creates `count` distinct hex indices.
///
/// Index `i` is `BASE_HEX_INDEX + i * 0x40000`, a stride that only touches
/// the low cell digits so every value keeps the same 15-digit string form.
///
/// # Example
///
/// ```
/// use test_utils::create_hex_indices;
///
/// let hexes = create_hex_indices(3);
/// assert_eq!(hexes.len(), 3);
/// assert!(hexes.windows(2).all(|w| w[0] < w[1]));
/// ```
pub fn create_hex_indices(count: usize) -> Vec<u64> {
    (0..count as u64)
        .map(|i| BASE_HEX_INDEX + i * 0x40000)
        .collect()
}

/// Creates `count` hex indices where every value appears `repeat` times.
///
/// Useful for checking that a set decoder collapses duplicates.
pub fn create_repeated_hex_indices(count: usize, repeat: usize) -> Vec<u64> {
    create_hex_indices(count)
        .into_iter()
        .flat_map(|index| std::iter::repeat(index).take(repeat))
        .collect()
}

/// Canonical lowercase hex strings for [`create_hex_indices`].
pub fn create_hex_strings(count: usize) -> Vec<String> {
    create_hex_indices(count)
        .into_iter()
        .map(|index| format!("{:x}", index))
        .collect()
}

/// Creates a closed square ring of `half_size` degrees around a center.
///
/// Vertices run counter-clockwise starting from the south-west corner.
pub fn create_square_ring(center_lon: f64, center_lat: f64, half_size: f64) -> Vec<[f64; 2]> {
    let (w, e) = (center_lon - half_size, center_lon + half_size);
    let (s, n) = (center_lat - half_size, center_lat + half_size);
    vec![[w, s], [e, s], [e, n], [w, n], [w, s]]
}
