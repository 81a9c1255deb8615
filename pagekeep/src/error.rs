// src/error.rs
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::patterns::NamingPattern;

/// Conditions that abort a run before anything is renamed.
#[derive(Error, Debug)]
pub enum Error {
    /// Two pages of one entry resolved to different naming patterns.
    #[error(
        "ambiguous entry {}: resolved to '{first}' but {} matches '{second}'",
        entry.display(),
        page.display()
    )]
    AmbiguousEntry {
        entry: PathBuf,
        page: PathBuf,
        first: NamingPattern,
        second: NamingPattern,
    },

    /// Not a single page of an entry matched any naming pattern.
    #[error("no pattern found for entry {}", entry.display())]
    NoPatternFound { entry: PathBuf },

    /// A single page matched more than one naming pattern.
    #[error("a page matched multiple patterns: {} ({})", page.display(), pattern_list(patterns))]
    MultiplePatterns {
        page: PathBuf,
        patterns: Vec<NamingPattern>,
    },

    /// The regex engine gave up while matching a page, e.g. on its backtrack limit.
    #[error("matching {} failed", page.display())]
    PatternEngine {
        page: PathBuf,
        #[source]
        source: fancy_regex::Error,
    },

    /// The rename batch claims some target more than once.
    #[error("duplicate destination paths!\n{}", collision_list(collisions))]
    RenameCollisions { collisions: Vec<(PathBuf, PathBuf)> },

    /// A rename failed after the commit already started.
    #[error("rename {} -> {} failed mid-commit", from.display(), to.display())]
    CommitFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON state file could not be parsed.
    #[error("malformed state file {}", path.display())]
    MalformedState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn pattern_list(patterns: &[NamingPattern]) -> String {
    patterns
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn collision_list(collisions: &[(PathBuf, PathBuf)]) -> String {
    let mut out = String::new();
    for (first, second) in collisions {
        let _ = writeln!(out, "{}\n{}", first.display(), second.display());
    }
    out.trim_end().to_owned()
}
