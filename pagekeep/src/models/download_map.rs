// src/models/download_map.rs
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::utils::{SortedByValue, read_json_or_default, write_json_pretty};

/// Source URL -> raw archive file name (without extension), as left behind by
/// the downloader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DownloadMap {
    archives: BTreeMap<String, String>,
}

impl DownloadMap {
    /// # Errors
    ///
    /// Returns an error if the file exists but is not a valid download map.
    pub fn load(path: &Path) -> Result<Self> {
        read_json_or_default(path)
    }

    /// Writes the map sorted by archive name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, &SortedByValue(&self.archives))
    }

    pub fn insert(&mut self, url: &str, archive: &str) {
        self.archives.insert(url.to_owned(), archive.to_owned());
    }

    #[must_use]
    pub fn archive_name(&self, url: &str) -> Option<&str> {
        self.archives.get(url).map(String::as_str)
    }

    /// Finds the URL whose archive unpacks into a directory called `dir_name`.
    #[must_use]
    pub fn url_for_directory(&self, dir_name: &str) -> Option<&str> {
        self.archives
            .iter()
            .find(|(_, archive)| archive.trim() == dir_name)
            .map(|(url, _)| url.as_str())
    }

    /// Keeps only the records for which `keep(url, archive)` holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.archives.retain(|url, archive| keep(url, archive));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }
}
