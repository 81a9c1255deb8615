// src/core/extract.rs
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

/// Unpacks one archive into a destination directory.
pub trait ArchiveExtractor {
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read or a member cannot be written.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Extracts zip containers (`.cbz`, `.zip`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let file = fs::File::open(archive)
            .with_context(|| format!("Failed to open archive {}", archive.display()))?;
        let mut zip = zip::ZipArchive::new(file)
            .with_context(|| format!("Failed to read archive {}", archive.display()))?;
        fs::create_dir_all(dest)?;

        for i in 0..zip.len() {
            let mut member = zip.by_index(i).context("zip entry")?;
            // Members escaping the destination are skipped.
            let Some(relative) = member.enclosed_name() else {
                continue;
            };
            let out_path = dest.join(relative);
            if member.is_dir() {
                fs::create_dir_all(&out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = fs::File::create(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            std::io::copy(&mut member, &mut out_file)
                .with_context(|| format!("Failed to extract {}", out_path.display()))?;
        }
        Ok(())
    }
}
