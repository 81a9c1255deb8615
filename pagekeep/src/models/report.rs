// src/models/report.rs
use std::fmt;
use tracing::{info, warn};

/// A registry record referenced by a finding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryRef {
    pub artist: String,
    pub entry: String,
    pub url: String,
}

impl EntryRef {
    #[must_use]
    pub fn new(artist: &str, entry: &str, url: &str) -> Self {
        Self {
            artist: artist.to_owned(),
            entry: entry.to_owned(),
            url: url.to_owned(),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.artist, self.entry)
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}: {}", self.artist, self.entry, self.url)
    }
}

/// Non-fatal findings of a run. Collected as the run goes and logged once at the end.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Artists created in the registry, with their entry count.
    pub created_artists: Vec<(String, usize)>,
    /// `artist/entry` records added with an empty URL.
    pub added_entries: Vec<String>,
    /// `artist/entry` records dropped because the directory is gone.
    pub removed_entries: Vec<String>,
    pub duplicate_urls: Vec<EntryRef>,
    pub missing_entries: Vec<EntryRef>,
    pub new_multi_entries: Vec<String>,
    pub missing_links: Vec<String>,
    /// Everything else worth a warning (missing archives, unmatched pages, ...).
    pub notes: Vec<String>,
}

impl Report {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            created_artists: Vec::new(),
            added_entries: Vec::new(),
            removed_entries: Vec::new(),
            duplicate_urls: Vec::new(),
            missing_entries: Vec::new(),
            new_multi_entries: Vec::new(),
            missing_links: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.notes.push(message.into());
    }

    pub fn log(&self) {
        for note in &self.notes {
            warn!("{note}");
        }

        if self.missing_links.is_empty() {
            info!("no missing links");
        } else {
            warn!("missing links:");
            for path in &self.missing_links {
                warn!("{path}");
            }
        }

        if self.duplicate_urls.is_empty() {
            info!("no duplicate urls detected");
        } else {
            warn!("duplicate urls detected:");
            for entry in &self.duplicate_urls {
                warn!("{entry}");
            }
        }

        if self.new_multi_entries.is_empty() {
            info!("no new multi-entries found");
        } else {
            warn!("new multi-entries found:");
            for path in &self.new_multi_entries {
                warn!("{path}");
            }
        }

        if self.missing_entries.is_empty() {
            info!("no missing entries detected");
        } else {
            warn!("missing entries detected:");
            for entry in &self.missing_entries {
                warn!("{entry}");
            }
        }
    }
}
