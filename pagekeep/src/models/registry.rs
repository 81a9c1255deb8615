// src/models/registry.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::utils::{read_json_or_default, write_json_pretty};

pub type Entries = BTreeMap<String, String>;

/// The catalog of the library: artist -> entry -> source URL.
///
/// Keys are kept sorted so the persisted file has a stable layout. An empty URL
/// is a placeholder for an entry that still has to be linked by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    artists: BTreeMap<String, Entries>,
}

impl Registry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            artists: BTreeMap::new(),
        }
    }

    /// Loads the registry, treating a missing file as an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid registry.
    pub fn load(path: &Path) -> Result<Self> {
        read_json_or_default(path)
    }

    /// Rewrites the registry file in full.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, self)
    }

    #[must_use]
    pub fn entries(&self, artist: &str) -> Option<&Entries> {
        self.artists.get(artist)
    }

    #[must_use]
    pub fn url(&self, artist: &str, entry: &str) -> Option<&str> {
        self.artists.get(artist)?.get(entry).map(String::as_str)
    }

    /// Iterates `(artist, entry, url)` in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.artists.iter().flat_map(|(artist, entries)| {
            entries
                .iter()
                .map(move |(entry, url)| (artist.as_str(), entry.as_str(), url.as_str()))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artists.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds an artist with the given entries, replacing any previous record.
    pub fn insert_artist(&mut self, artist: &str, entries: Entries) {
        self.artists.insert(artist.to_owned(), entries);
    }

    /// Sets the URL of an entry, creating the artist if needed. Returns the previous URL.
    pub fn insert(&mut self, artist: &str, entry: &str, url: &str) -> Option<String> {
        self.artists
            .entry(artist.to_owned())
            .or_default()
            .insert(entry.to_owned(), url.to_owned())
    }

    pub fn remove(&mut self, artist: &str, entry: &str) -> Option<String> {
        self.artists.get_mut(artist)?.remove(entry)
    }

    /// Moves an entry record to a new name, keeping its URL.
    ///
    /// Returns `false` when the old entry does not exist or the new name is taken.
    pub fn rename_entry(&mut self, artist: &str, from: &str, to: &str) -> bool {
        let Some(entries) = self.artists.get_mut(artist) else {
            return false;
        };
        if from == to || entries.contains_key(to) {
            return false;
        }
        match entries.remove(from) {
            Some(url) => {
                entries.insert(to.to_owned(), url);
                true
            }
            None => false,
        }
    }

    /// Finds the entry linked to `url`, if any.
    #[must_use]
    pub fn find_by_url(&self, url: &str) -> Option<(&str, &str)> {
        if url.is_empty() {
            return None;
        }
        self.iter()
            .find(|(_, _, entry_url)| *entry_url == url)
            .map(|(artist, entry, _)| (artist, entry))
    }
}
