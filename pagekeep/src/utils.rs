// src/utils.rs
use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Error;

pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Reads a JSON state file, falling back to `T::default()` when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or if its contents
/// are not valid JSON for `T` (as [`Error::MalformedState`]).
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content).map_err(|source| Error::MalformedState {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(value)
}

/// Writes `value` as two-space indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Serializes a string map ordered by value instead of by key.
pub struct SortedByValue<'a>(pub &'a BTreeMap<String, String>);

impl Serialize for SortedByValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pairs: Vec<(&String, &String)> = self.0.iter().collect();
        pairs.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        serializer.collect_map(pairs)
    }
}
