// src/models/multi_entries.rs
use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::utils::read_json_or_default;

/// Entry paths (`artist/entry`) confirmed to legitimately hold sub-entries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MultiEntryAllowList {
    confirmed: BTreeSet<String>,
}

impl MultiEntryAllowList {
    /// # Errors
    ///
    /// Returns an error if the file exists but is not a JSON array of strings.
    pub fn load(path: &Path) -> Result<Self> {
        read_json_or_default(path)
    }

    #[must_use]
    pub fn contains(&self, entry_path: &str) -> bool {
        self.confirmed.contains(entry_path)
    }
}

impl<S: Into<String>> FromIterator<S> for MultiEntryAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            confirmed: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_array() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("multi_entries.json");
        std::fs::write(&path, "[\n  \"artist/series\"\n]\n")?;
        let list = MultiEntryAllowList::load(&path)?;
        assert!(list.contains("artist/series"));
        assert!(!list.contains("artist/other"));
        Ok(())
    }
}
