// src/core/ingest.rs
use anyhow::{Context as _, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Settings;
use crate::core::cleaner::clean_directory_name;
use crate::core::extract::ArchiveExtractor;
use crate::core::library::{Library, file_name};
use crate::core::planner::RenamePlan;
use crate::models::{DownloadMap, Registry, Report};

/// Copies the downloaded archive of every registered entry whose directory is
/// missing into its artist directory, ready to be unpacked.
///
/// An entry is skipped when the archive or its unpacked directory is already
/// in place. A download record whose archive is not in the staging directory
/// is noted in `report`.
///
/// # Returns
///
/// The number of archives copied.
///
/// # Errors
///
/// Returns an error if an archive cannot be copied.
pub fn stage_archives(
    registry: &Registry,
    downloads: &DownloadMap,
    settings: &Settings,
    report: &mut Report,
) -> Result<usize> {
    info!("========== staging archives ==========");
    let mut staged = 0_usize;
    for (artist, entry, url) in registry.iter() {
        let artist_path = settings.data_dir.join(artist);
        if artist_path.join(entry).exists() {
            continue;
        }
        let Some(archive) = downloads.archive_name(url) else {
            debug!("no download record for {artist}/{entry}");
            continue;
        };
        if artist_path.join(archive).exists() || artist_path.join(archive.trim()).exists() {
            continue;
        }
        let Some(source) = staged_archive(&settings.staging_dir, archive, &settings.archive_extensions) else {
            report.note(format!("staged archive missing for {artist}/{entry}: {archive}"));
            continue;
        };
        let dest = artist_path.join(file_name(&source));
        if dest.exists() {
            continue;
        }
        fs::create_dir_all(&artist_path)?;
        info!("copying {} to {}", source.display(), dest.display());
        fs::copy(&source, &dest)
            .with_context(|| format!("Failed to copy {} to {}", source.display(), dest.display()))?;
        staged = staged.saturating_add(1);
    }
    Ok(staged)
}

/// Finds `<staging>/<archive>.<ext>` for the first configured extension present.
fn staged_archive(staging_dir: &Path, archive: &str, extensions: &[String]) -> Option<PathBuf> {
    extensions
        .iter()
        .map(|ext| staging_dir.join(format!("{archive}.{ext}")))
        .find(|path| path.is_file())
}

/// Unpacks every archive lying in an artist directory into a sibling directory
/// named after its trimmed stem, then deletes the archive.
///
/// # Returns
///
/// The number of archives unpacked.
///
/// # Errors
///
/// Returns an error if extraction fails or the archive cannot be removed.
pub fn unpack_archives(library: &Library, extractor: &dyn ArchiveExtractor) -> Result<usize> {
    info!("========== unpacking archives ==========");
    let mut unpacked = 0_usize;
    for artist in library.artists()? {
        for archive in library.archives(&artist)? {
            let stem = archive
                .file_stem()
                .map(|s| s.to_string_lossy().trim().to_owned())
                .unwrap_or_default();
            let dest = archive.with_file_name(stem);
            info!("extracting and deleting {}", file_name(&archive));
            extractor.extract(&archive, &dest)?;
            fs::remove_file(&archive)
                .with_context(|| format!("Failed to delete {}", archive.display()))?;
            unpacked = unpacked.saturating_add(1);
        }
    }
    Ok(unpacked)
}

/// Links freshly unpacked entry directories to their source URL.
///
/// A directory is recognized by its name matching a download record. The
/// registry name of that URL is reused when the artist already has one,
/// otherwise the cleaned directory name is registered. A directory whose name
/// cleans to nothing is left unregistered and noted. The returned plan moves
/// each directory to its registered name and still has to be committed.
///
/// # Errors
///
/// Returns an error if the library tree cannot be walked.
pub fn register_downloads(
    registry: &mut Registry,
    downloads: &DownloadMap,
    library: &Library,
    report: &mut Report,
) -> Result<RenamePlan> {
    info!("========== registering downloads ==========");
    let mut plan = RenamePlan::new();
    for entry in library.all_entries()? {
        let Some(url) = downloads.url_for_directory(&entry.name) else {
            continue;
        };
        let known = registry
            .entries(&entry.artist)
            .and_then(|entries| entries.iter().find(|(_, u)| *u == url))
            .map(|(name, _)| name.clone());
        let dest = match known {
            Some(name) => name,
            None => {
                let name = clean_directory_name(&entry.name);
                if name.is_empty() {
                    report.note(format!(
                        "download {} cleans to nothing, not registered",
                        entry.relative_path()
                    ));
                    continue;
                }
                info!("adding entry to index: {}/{name}", entry.artist);
                registry.insert(&entry.artist, &name, url);
                report.added_entries.push(format!("{}/{name}", entry.artist));
                name
            }
        };
        if dest != entry.name {
            info!("renaming {} to {}/{dest}", entry.relative_path(), entry.artist);
        }
        plan.add(&entry.path, &dest);
    }
    Ok(plan)
}

/// Drops download records whose archive is no longer in the staging directory.
///
/// # Returns
///
/// The number of records dropped. Each one is noted in `report`.
///
/// # Errors
///
/// Returns an error if the staging directory does not exist, so an unmounted
/// drive cannot wipe the whole map.
pub fn prune_download_map(downloads: &mut DownloadMap, settings: &Settings, report: &mut Report) -> Result<usize> {
    if !settings.staging_dir.is_dir() {
        bail!("staging directory {} does not exist", settings.staging_dir.display());
    }
    let before = downloads.len();
    downloads.retain(|url, archive| {
        let present = staged_archive(&settings.staging_dir, archive, &settings.archive_extensions).is_some();
        if !present {
            report.note(format!("dropping download record {url}: {archive} not staged"));
        }
        present
    });
    Ok(before.saturating_sub(downloads.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::ZipExtractor;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records calls and writes a single page instead of reading a real archive.
    #[derive(Default)]
    struct FakeExtractor {
        calls: RefCell<Vec<(PathBuf, PathBuf)>>,
    }

    impl ArchiveExtractor for FakeExtractor {
        fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
            fs::create_dir_all(dest)?;
            fs::write(dest.join("1.jpg"), "")?;
            self.calls
                .borrow_mut()
                .push((archive.to_path_buf(), dest.to_path_buf()));
            Ok(())
        }
    }

    fn setup() -> Result<(TempDir, Settings)> {
        let dir = TempDir::new()?;
        let settings = Settings::with_base(dir.path());
        fs::create_dir_all(&settings.data_dir)?;
        fs::create_dir_all(&settings.staging_dir)?;
        Ok((dir, settings))
    }

    #[test]
    fn test_stage_copies_missing_entries_only() -> Result<()> {
        let (_dir, settings) = setup()?;
        fs::write(settings.staging_dir.join("[A] Title {t}.cbz"), "zip")?;
        fs::create_dir_all(settings.data_dir.join("A/Present"))?;

        let mut registry = Registry::new();
        registry.insert("A", "Title", "https://example.org/1");
        registry.insert("A", "Present", "https://example.org/2");
        registry.insert("A", "Lost", "https://example.org/3");
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/1", "[A] Title {t}");
        downloads.insert("https://example.org/2", "Present");
        downloads.insert("https://example.org/3", "Lost archive");

        let mut report = Report::new();
        assert_eq!(stage_archives(&registry, &downloads, &settings, &mut report)?, 1);
        assert!(settings.data_dir.join("A/[A] Title {t}.cbz").is_file());
        assert_eq!(report.notes.len(), 1);
        assert!(report.notes[0].contains("A/Lost"));

        // already staged
        assert_eq!(stage_archives(&registry, &downloads, &settings, &mut Report::new())?, 0);
        Ok(())
    }

    #[test]
    fn test_unpack_uses_trimmed_stem_and_deletes_archive() -> Result<()> {
        let (dir, settings) = setup()?;
        let archive = settings.data_dir.join("A/Title .cbz");
        fs::create_dir_all(settings.data_dir.join("A"))?;
        fs::write(&archive, "zip")?;

        let extractor = FakeExtractor::default();
        assert_eq!(unpack_archives(&Library::new(&settings), &extractor)?, 1);
        assert!(!archive.exists());
        assert_eq!(
            extractor.calls.borrow().as_slice(),
            &[(archive, dir.path().join("data/A/Title"))]
        );
        Ok(())
    }

    #[test]
    fn test_unpack_with_zip_extractor_rejects_garbage() -> Result<()> {
        let (_dir, settings) = setup()?;
        let archive = settings.data_dir.join("A/broken.cbz");
        fs::create_dir_all(settings.data_dir.join("A"))?;
        fs::write(&archive, "not a zip")?;
        assert!(unpack_archives(&Library::new(&settings), &ZipExtractor).is_err());
        assert!(archive.exists());
        Ok(())
    }

    #[test]
    fn test_register_new_download_uses_cleaned_name() -> Result<()> {
        let (_dir, settings) = setup()?;
        let raw = settings.data_dir.join("A/[A] Title {tag}");
        fs::create_dir_all(&raw)?;
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/1", "[A] Title {tag} ");

        let mut registry = Registry::new();
        let mut report = Report::new();
        let plan = register_downloads(&mut registry, &downloads, &Library::new(&settings), &mut report)?;

        assert_eq!(registry.url("A", "Title"), Some("https://example.org/1"));
        assert_eq!(report.added_entries, vec!["A/Title"]);
        assert_eq!(plan.commit("entries")?, 1);
        assert!(settings.data_dir.join("A/Title").is_dir());
        Ok(())
    }

    #[test]
    fn test_register_skips_name_cleaning_to_nothing() -> Result<()> {
        let (_dir, settings) = setup()?;
        let raw = settings.data_dir.join("A/[A]");
        fs::create_dir_all(&raw)?;
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/1", "[A]");

        let mut registry = Registry::new();
        let mut report = Report::new();
        let plan = register_downloads(&mut registry, &downloads, &Library::new(&settings), &mut report)?;

        assert!(registry.is_empty());
        assert!(plan.is_empty());
        assert!(report.added_entries.is_empty());
        assert_eq!(report.notes, vec!["download A/[A] cleans to nothing, not registered"]);
        assert!(raw.is_dir());
        Ok(())
    }

    #[test]
    fn test_register_reuses_known_entry_name() -> Result<()> {
        let (_dir, settings) = setup()?;
        fs::create_dir_all(settings.data_dir.join("A/raw name"))?;
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/1", "raw name");

        let mut registry = Registry::new();
        registry.insert("A", "Chosen Name", "https://example.org/1");
        let mut report = Report::new();
        let plan = register_downloads(&mut registry, &downloads, &Library::new(&settings), &mut report)?;

        assert!(report.added_entries.is_empty());
        assert_eq!(registry.len(), 1);
        plan.commit("entries")?;
        assert!(settings.data_dir.join("A/Chosen Name").is_dir());
        Ok(())
    }

    #[test]
    fn test_prune_download_map() -> Result<()> {
        let (_dir, settings) = setup()?;
        fs::write(settings.staging_dir.join("kept.zip"), "zip")?;
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/kept", "kept");
        downloads.insert("https://example.org/gone", "gone");

        let mut report = Report::new();
        assert_eq!(prune_download_map(&mut downloads, &settings, &mut report)?, 1);
        assert_eq!(downloads.archive_name("https://example.org/kept"), Some("kept"));
        assert_eq!(downloads.len(), 1);
        assert_eq!(report.notes.len(), 1);
        Ok(())
    }

    #[test]
    fn test_prune_refuses_missing_staging_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let settings = Settings::with_base(dir.path());
        let mut downloads = DownloadMap::default();
        downloads.insert("https://example.org/1", "one");
        assert!(prune_download_map(&mut downloads, &settings, &mut Report::new()).is_err());
        assert_eq!(downloads.len(), 1);
        Ok(())
    }
}
