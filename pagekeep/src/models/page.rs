// src/models/page.rs
use std::path::{Path, PathBuf};

/// An image file inside an entry or sub-entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    pub path: PathBuf,
    pub stem: String,
    /// Extension without the leading dot, case preserved.
    pub extension: String,
}

impl PageFile {
    /// Builds a page from a path, or `None` when it carries no UTF-8 extension.
    ///
    /// A stem that is not valid UTF-8 is read lossily. Only its digits matter
    /// for matching, and renames go through the original `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        let extension = path.extension()?.to_str()?.to_owned();
        Some(Self {
            path: path.to_path_buf(),
            stem,
            extension,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }
}

/// Groups captured from a page stem by a naming pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capture {
    /// First page number, leading zeros kept, digits rewritten as ASCII.
    pub page: String,
    /// End of a `page-page` range.
    pub range_end: Option<String>,
    /// Variant discriminator, a letter or a single digit depending on the pattern.
    pub variant: Option<String>,
}

impl Capture {
    #[must_use]
    pub fn page(page: &str) -> Self {
        Self {
            page: page.to_owned(),
            ..Self::default()
        }
    }

    /// Number of significant digits in the page number.
    #[must_use]
    pub fn significant_digits(&self) -> usize {
        self.page.trim_start_matches('0').chars().count()
    }
}
