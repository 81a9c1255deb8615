// src/core/normalize.rs
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::canonical::plan_entry;
use crate::core::classifier::classify_entry;
use crate::core::cleaner::clean_directory_name;
use crate::core::library::{Library, file_name};
use crate::core::planner::RenamePlan;
use crate::error::Error;
use crate::models::{Registry, Report};

/// Plans cleaning every entry directory name in the library.
///
/// Names that would clean down to nothing are left alone and noted.
///
/// # Errors
///
/// Returns an error if the library tree cannot be walked.
pub fn plan_entry_names(library: &Library, report: &mut Report) -> Result<RenamePlan> {
    info!("========== cleaning entries ==========");
    let mut plan = RenamePlan::new();
    for entry in library.all_entries()? {
        let cleaned = clean_directory_name(&entry.name);
        if cleaned.is_empty() {
            report.note(format!("entry name {} cleans to nothing", entry.relative_path()));
            continue;
        }
        plan.add(&entry.path, &cleaned);
    }
    Ok(plan)
}

/// Carries committed entry directory renames over to the registry so their
/// URLs follow them.
pub fn rename_registry_entries(registry: &mut Registry, plan: &RenamePlan) {
    for (target, source) in plan.moves() {
        let Some(artist_dir) = source.parent() else {
            continue;
        };
        let artist = file_name(artist_dir);
        let (from, to) = (file_name(source), file_name(target));
        if registry.rename_entry(&artist, &from, &to) {
            info!("renamed index entry {artist}/{from} to {artist}/{to}");
        }
    }
}

/// Outcome of planning canonical page names over the whole library.
#[derive(Debug, Default)]
pub struct PageNormalization {
    pub plan: RenamePlan,
    /// Entries and sub-entries that were classified.
    pub classified: usize,
    /// Images matching no naming pattern, left as they are.
    pub unmatched: Vec<PathBuf>,
}

/// Classifies every entry (each sub-entry on its own when there are any) and
/// merges the per-entry plans into one batch.
///
/// # Errors
///
/// Returns the first classification error, or an error if the tree cannot be
/// walked. An entry or sub-entry without images fails with
/// [`Error::NoPatternFound`].
pub fn plan_page_names(library: &Library) -> Result<PageNormalization> {
    info!("========== cleaning filenames ==========");
    let mut outcome = PageNormalization::default();
    for entry in library.all_entries()? {
        for dir in entry.page_dirs() {
            let pages = library.pages(dir)?;
            let classified = classify_entry(dir, pages)?;
            outcome.classified = outcome.classified.saturating_add(1);
            outcome.unmatched.extend(classified.unmatched.iter().cloned());
            outcome.plan.merge(plan_entry(&classified));
        }
    }
    Ok(outcome)
}

/// Renames every page of the library to its canonical name.
///
/// With `dry_run` the planned moves are only logged. Collisions are reported
/// as an error either way.
///
/// # Returns
///
/// The number of pages renamed, or that would be renamed.
///
/// # Errors
///
/// Classification errors, [`Error::RenameCollisions`] and [`Error::CommitFailed`].
pub fn normalize_pages(library: &Library, dry_run: bool, report: &mut Report) -> Result<usize> {
    let outcome = plan_page_names(library)?;
    for page in &outcome.unmatched {
        report.note(format!("no pattern matches {}", display_relative(library.root(), page)));
    }

    if !dry_run {
        return Ok(outcome.plan.commit("pages")?);
    }

    let collisions = outcome.plan.all_collisions();
    if !collisions.is_empty() {
        return Err(Error::RenameCollisions { collisions }.into());
    }
    for (target, source) in outcome.plan.moves() {
        info!("would move {} =============> {}", file_name(source), file_name(target));
    }
    Ok(outcome.plan.len())
}

fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
