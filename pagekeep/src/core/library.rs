// src/core/library.rs
use anyhow::Result;
use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::Settings;
use crate::models::PageFile;
use crate::utils::is_hidden;

/// An entry directory, `data/<artist>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDir {
    pub artist: String,
    pub name: String,
    pub path: PathBuf,
    /// Nested volume directories, sorted by name. Empty for a plain entry.
    pub sub_entries: Vec<PathBuf>,
}

impl EntryDir {
    #[must_use]
    pub fn is_multi_entry(&self) -> bool {
        !self.sub_entries.is_empty()
    }

    /// `artist/entry`, the key used by the multi-entry allow-list.
    #[must_use]
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.artist, self.name)
    }

    /// Directories holding this entry's pages: each sub-entry, or the entry itself.
    #[must_use]
    pub fn page_dirs(&self) -> Vec<&Path> {
        if self.sub_entries.is_empty() {
            vec![self.path.as_path()]
        } else {
            self.sub_entries.iter().map(PathBuf::as_path).collect()
        }
    }
}

/// Read-only view over the `artist/entry/[sub-entry/]page` tree.
#[derive(Debug, Clone)]
pub struct Library {
    root: PathBuf,
    image_extensions: Vec<String>,
    archive_extensions: Vec<String>,
    skip: Vec<Pattern>,
}

impl Library {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.data_dir.clone(),
            image_extensions: settings.image_extensions.clone(),
            archive_extensions: settings.archive_extensions.clone(),
            skip: settings.skip.clone(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artist directories, sorted by name. A missing data root holds no artists.
    ///
    /// # Errors
    ///
    /// Returns an error if the data root cannot be read.
    pub fn artists(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        self.child_dirs(&self.root)
    }

    /// Entry directories of one artist, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the artist directory or one of its entries cannot be read.
    pub fn entries(&self, artist_dir: &Path) -> Result<Vec<EntryDir>> {
        let artist = file_name(artist_dir);
        self.child_dirs(artist_dir)?
            .into_iter()
            .map(|path| {
                let sub_entries = self.child_dirs(&path)?;
                Ok(EntryDir {
                    artist: artist.clone(),
                    name: file_name(&path),
                    path,
                    sub_entries,
                })
            })
            .collect()
    }

    /// Every entry of every artist.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the tree cannot be read.
    pub fn all_entries(&self) -> Result<Vec<EntryDir>> {
        let mut entries = Vec::new();
        for artist in self.artists()? {
            entries.extend(self.entries(&artist)?);
        }
        Ok(entries)
    }

    /// Image files directly inside `dir`, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn pages(&self, dir: &Path) -> Result<Vec<PageFile>> {
        Ok(self
            .children(dir, |e| e.file_type().is_file())?
            .iter()
            .filter_map(|path| PageFile::from_path(path))
            .filter(|page| self.is_image(&page.extension))
            .collect())
    }

    /// Archive files lying directly in an artist directory, waiting to be unpacked.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn archives(&self, artist_dir: &Path) -> Result<Vec<PathBuf>> {
        self.children(artist_dir, |e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| has_extension(&self.archive_extensions, ext))
        })
    }

    fn is_image(&self, extension: &str) -> bool {
        has_extension(&self.image_extensions, extension)
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.skip.iter().any(|p| p.matches(name)))
    }

    fn child_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.children(dir, |e| e.file_type().is_dir() && !self.is_skipped(e))
    }

    fn children(&self, dir: &Path, keep: impl Fn(&DirEntry) -> bool) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry?;
            if keep(&entry) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }
}

fn has_extension(extensions: &[String], extension: &str) -> bool {
    extensions.iter().any(|ext| ext.eq_ignore_ascii_case(extension))
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
