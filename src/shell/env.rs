//! Environment overlay helpers.

use std::collections::HashMap;
use std::ffi::OsString;

/// Merge an overlay onto a copy of a base environment.
///
/// Keys in `overlay` replace keys in `base`; every other base key is kept.
/// Neither input is modified.
pub fn merge_env<I>(base: I, overlay: &HashMap<String, String>) -> HashMap<OsString, OsString>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut merged: HashMap<OsString, OsString> = base.into_iter().collect();
    for (key, value) in overlay {
        merged.insert(OsString::from(key), OsString::from(value));
    }
    merged
}

/// Append a directory to a colon-separated search path.
///
/// An empty or unset existing value yields just `dir`. A directory already
/// on the path is not added twice.
pub fn append_search_path(existing: Option<&str>, dir: &str) -> String {
    match existing {
        None | Some("") => dir.to_string(),
        Some(current) if current.split(':').any(|p| p == dir) => current.to_string(),
        Some(current) => format!("{}:{}", current, dir),
    }
}
