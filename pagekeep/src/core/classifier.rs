// src/core/classifier.rs
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::patterns::NamingPattern;
use crate::error::Error;
use crate::models::{Capture, PageFile};

/// An entry (or sub-entry) whose pages all follow one naming pattern.
#[derive(Debug, Clone)]
pub struct ClassifiedEntry {
    pub dir: PathBuf,
    pub pattern: NamingPattern,
    pub pages: Vec<(PageFile, Capture)>,
    /// Image files that match no pattern at all. They are left untouched.
    pub unmatched: Vec<PathBuf>,
}

/// Resolves the single naming pattern governing the pages of `dir`.
///
/// Pages are visited in the given order and each one is tested against every
/// pattern. The first pattern to match becomes the entry's pattern.
///
/// # Errors
///
/// * [`Error::MultiplePatterns`] if one page matches more than one pattern
/// * [`Error::AmbiguousEntry`] if two pages resolve to different patterns
/// * [`Error::NoPatternFound`] if no page matches any pattern, including when
///   there are no pages at all
/// * [`Error::PatternEngine`] if the regex engine gives up on a page
pub fn classify_entry(dir: &Path, pages: Vec<PageFile>) -> Result<ClassifiedEntry, Error> {
    let mut resolved: Option<NamingPattern> = None;
    let mut matched = Vec::with_capacity(pages.len());
    let mut unmatched = Vec::new();

    for page in pages {
        let mut matches = match NamingPattern::all_matches(&page.stem) {
            Ok(matches) => matches,
            Err(source) => {
                return Err(Error::PatternEngine {
                    page: page.path,
                    source,
                });
            }
        };
        if matches.len() > 1 {
            return Err(Error::MultiplePatterns {
                page: page.path,
                patterns: matches.into_iter().map(|(p, _)| p).collect(),
            });
        }
        let Some((pattern, capture)) = matches.pop() else {
            debug!("no pattern matches {}", page.path.display());
            unmatched.push(page.path);
            continue;
        };

        match resolved {
            None => resolved = Some(pattern),
            Some(first) if first != pattern => {
                return Err(Error::AmbiguousEntry {
                    entry: dir.to_path_buf(),
                    page: page.path,
                    first,
                    second: pattern,
                });
            }
            Some(_) => {}
        }
        matched.push((page, capture));
    }

    let pattern = resolved.ok_or_else(|| Error::NoPatternFound {
        entry: dir.to_path_buf(),
    })?;
    debug!("{} uses pattern {pattern}", dir.display());

    Ok(ClassifiedEntry {
        dir: dir.to_path_buf(),
        pattern,
        pages: matched,
        unmatched,
    })
}
