//! Path utilities for locating test data files.
//!
//! Fixtures live next to the crate that uses them, under
//! `crates/{crate_name}/testdata/`.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// This is determined by walking up from the test-utils manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the testdata directory for a specific crate.
///
/// # Arguments
///
/// * `crate_name` - The name of the crate (e.g., "airhub-protocol")
///
/// # Returns
///
/// The path to `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Reads a fixture from a crate's testdata directory.
///
/// Trailing whitespace is stripped so fixtures can end with a newline and
/// still be compared byte-for-byte against encoder output.
///
/// # Panics
///
/// Panics if the fixture does not exist or cannot be read.
pub fn load_fixture(crate_name: &str, name: &str) -> Vec<u8> {
    let path = crate_testdata_dir(crate_name).join(name);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e));
    raw.trim_end().as_bytes().to_vec()
}

/// Reads a fixture as a string. See [`load_fixture`].
pub fn load_fixture_str(crate_name: &str, name: &str) -> String {
    String::from_utf8(load_fixture(crate_name, name)).expect("Fixture is not valid UTF-8")
}
