//! Destination file naming.
//!
//! Two concerns live here:
//!
//! - **Timestamp names**: an image captured at `2021:05:01 10:00:00` becomes
//!   `2021_05_01_10_00_00.jpg`, keeping the source extension as-is.
//! - **Collision avoidance**: if that name is taken, probe `_2`, `_3`, ...
//!   until a free one is found:
//!
//! ```text
//! 2021_05_01_10_00_00.jpg      (taken)
//! 2021_05_01_10_00_00_2.jpg    (taken)
//! 2021_05_01_10_00_00_3.jpg    ← returned
//! ```
//!
//! Probing is not atomic. Two processes renaming into the same directory at
//! the same time could pick the same name; the engine runs one entry at a
//! time so this never happens within a batch.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Split a file name at its last extension separator.
///
/// The extension keeps its leading dot; names without one get an empty
/// extension. A leading dot alone (`.hidden`) does not start an extension.
fn split_extension(name: &OsStr) -> (OsString, OsString) {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            let mut dotted = OsString::from(".");
            dotted.push(ext);
            (stem.to_os_string(), dotted)
        }
        _ => (name.to_os_string(), OsString::new()),
    }
}

/// Return the first file name, starting with `candidate`'s own, that does not
/// exist in `candidate`'s directory.
pub fn free_name(candidate: &Path) -> OsString {
    let file_name = candidate.file_name().unwrap_or_default().to_os_string();
    if !candidate.exists() {
        return file_name;
    }

    let (stem, ext) = split_extension(&file_name);
    let dir = candidate.parent().unwrap_or_else(|| Path::new(""));
    (2u64..)
        .map(|i| {
            let mut name = stem.clone();
            name.push(format!("_{i}"));
            name.push(&ext);
            name
        })
        .find(|name| !dir.join(name).exists())
        .unwrap_or(file_name)
}

/// Build `<timestamp><.ext>` from a formatted capture timestamp and the
/// source file name whose extension is kept.
pub fn timestamp_file_name(timestamp: &str, source_name: &OsStr) -> OsString {
    let (_, ext) = split_extension(source_name);
    let mut name = OsString::from(timestamp);
    name.push(ext);
    name
}

/// Whether `name` is already `<timestamp><.ext>` or a collision variant
/// `<timestamp>_<N><.ext>` of it (N >= 2).
pub fn is_timestamp_name(timestamp: &str, name: &OsStr) -> bool {
    let (stem, _) = split_extension(name);
    let Some(stem) = stem.to_str() else {
        return false;
    };
    let Some(rest) = stem.strip_prefix(timestamp) else {
        return false;
    };
    if rest.is_empty() {
        return true;
    }
    rest.strip_prefix('_')
        .filter(|n| !n.starts_with('0') && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse::<u64>().ok())
        .is_some_and(|n| n >= 2)
}
