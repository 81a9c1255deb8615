// src/config.rs
use anyhow::{Context as _, Result};
use glob::Pattern;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pagekeep.toml";

/// Raw contents of a `pagekeep.toml` file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    registry: Option<PathBuf>,
    downloads: Option<PathBuf>,
    multi_entries: Option<PathBuf>,
    favorites: Option<PathBuf>,
    image_extensions: Option<Vec<String>>,
    archive_extensions: Option<Vec<String>>,
    skip: Vec<String>,
}

/// Resolved locations and knobs for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the `artist/entry/page` tree.
    pub data_dir: PathBuf,
    /// Where the downloader leaves raw archives.
    pub staging_dir: PathBuf,
    pub registry: PathBuf,
    pub downloads: PathBuf,
    pub multi_entries: PathBuf,
    pub favorites: PathBuf,
    pub image_extensions: Vec<String>,
    pub archive_extensions: Vec<String>,
    /// Artist or entry directory names left out of every walk.
    pub skip: Vec<Pattern>,
}

impl Settings {
    /// Default layout rooted at `base`.
    #[must_use]
    pub fn with_base(base: &Path) -> Self {
        Self {
            data_dir: base.join("data"),
            staging_dir: base.join("downloaded"),
            registry: base.join("index.json"),
            downloads: base.join("downloaded.json"),
            multi_entries: base.join("multi_entries.json"),
            favorites: base.join("favorited.json"),
            image_extensions: vec!["jpg".to_owned(), "jpeg".to_owned(), "png".to_owned()],
            archive_extensions: vec!["cbz".to_owned(), "zip".to_owned()],
            skip: Vec::new(),
        }
    }

    /// Loads settings from `explicit` if given, otherwise from the nearest
    /// `pagekeep.toml` at or above `start_dir`. Without any config file the
    /// default layout rooted at `start_dir` is used.
    ///
    /// # Errors
    ///
    /// This function may return an error if:
    /// * The config file cannot be read
    /// * The config file is not valid TOML or has unknown keys
    /// * A `skip` entry is not a valid glob pattern
    pub fn load(explicit: Option<&Path>, start_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(start_dir),
        };
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::with_base(start_dir)),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::with_base(base).merge(file, base)
    }

    fn merge(mut self, file: ConfigFile, base: &Path) -> Result<Self> {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        if let Some(p) = file.data_dir {
            self.data_dir = resolve(p);
        }
        if let Some(p) = file.staging_dir {
            self.staging_dir = resolve(p);
        }
        if let Some(p) = file.registry {
            self.registry = resolve(p);
        }
        if let Some(p) = file.downloads {
            self.downloads = resolve(p);
        }
        if let Some(p) = file.multi_entries {
            self.multi_entries = resolve(p);
        }
        if let Some(p) = file.favorites {
            self.favorites = resolve(p);
        }
        if let Some(exts) = file.image_extensions {
            self.image_extensions = normalize_extensions(exts);
        }
        if let Some(exts) = file.archive_extensions {
            self.archive_extensions = normalize_extensions(exts);
        }
        for pattern in file.skip {
            let compiled = Pattern::new(&pattern)
                .with_context(|| format!("Invalid skip pattern: {pattern}"))?;
            self.skip.push(compiled);
        }
        Ok(self)
    }
}

fn normalize_extensions(exts: Vec<String>) -> Vec<String> {
    exts.into_iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect()
}

/// Finds the nearest `pagekeep.toml`, starting at `dir` and walking up the parents.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let mut current_dir = dir.to_path_buf();
    let mut visited = HashSet::new();

    while visited.insert(current_dir.clone()) {
        let candidate = current_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => break,
        }
    }
    None
}
