// src/models/favorites.rs
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::utils::{SortedByValue, read_json_or_default, write_json_pretty};

/// Favorited source URL -> `artist/entry` location in the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FavoritesMap {
    locations: BTreeMap<String, String>,
}

impl FavoritesMap {
    /// # Errors
    ///
    /// Returns an error if the file exists but is not a valid favorites map.
    pub fn load(path: &Path) -> Result<Self> {
        read_json_or_default(path)
    }

    /// Writes the map sorted by location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, &SortedByValue(&self.locations))
    }

    pub fn insert(&mut self, url: &str, location: &str) -> Option<String> {
        self.locations.insert(url.to_owned(), location.to_owned())
    }

    #[must_use]
    pub fn location(&self, url: &str) -> Option<&str> {
        self.locations.get(url).map(String::as_str)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.locations
            .iter_mut()
            .map(|(url, location)| (url.as_str(), location))
    }
}
