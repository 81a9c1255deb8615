// src/core/planner.rs
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Error;

/// A batch of renames that is either applied completely or not at all.
///
/// Every claimed target maps to exactly one source. Claiming a target twice
/// records a collision instead of replacing the first claim.
#[derive(Debug, Default, Clone)]
pub struct RenamePlan {
    /// target -> source
    moves: BTreeMap<PathBuf, PathBuf>,
    /// Paths that already carry their final name.
    kept: BTreeSet<PathBuf>,
    collisions: Vec<(PathBuf, PathBuf)>,
}

impl RenamePlan {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            moves: BTreeMap::new(),
            kept: BTreeSet::new(),
            collisions: Vec::new(),
        }
    }

    /// Plans renaming `source` to `new_name` within its own directory.
    pub fn add(&mut self, source: &Path, new_name: &str) {
        let target = source.with_file_name(new_name);
        self.claim(target, source.to_path_buf());
    }

    fn claim(&mut self, target: PathBuf, source: PathBuf) {
        if let Some(existing) = self.moves.get(&target) {
            if *existing != source {
                self.collisions.push((existing.clone(), source));
            }
            return;
        }
        if self.kept.contains(&target) {
            if target != source {
                self.collisions.push((target, source));
            }
            return;
        }
        if target == source {
            self.kept.insert(target);
        } else {
            self.moves.insert(target, source);
        }
    }

    /// Folds another plan into this one, re-checking every claim.
    pub fn merge(&mut self, other: Self) {
        self.collisions.extend(other.collisions);
        for kept in other.kept {
            self.claim(kept.clone(), kept);
        }
        for (target, source) in other.moves {
            self.claim(target, source);
        }
    }

    /// Planned moves as `(target, source)`, ordered by target.
    pub fn moves(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.moves.iter().map(|(t, s)| (t.as_path(), s.as_path()))
    }

    #[must_use]
    pub fn collisions(&self) -> &[(PathBuf, PathBuf)] {
        &self.collisions
    }

    #[must_use]
    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }

    /// Number of planned moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Planned collisions plus targets that already exist on disk and are
    /// neither kept nor vacated by another move of this batch.
    #[must_use]
    pub fn all_collisions(&self) -> Vec<(PathBuf, PathBuf)> {
        let sources: BTreeSet<&PathBuf> = self.moves.values().collect();
        let mut collisions = self.collisions.clone();
        for (target, source) in &self.moves {
            if target.exists() && !sources.contains(target) && !self.kept.contains(target) {
                collisions.push((target.clone(), source.clone()));
            }
        }
        collisions
    }

    /// Applies the whole batch. `kind` only labels the log lines.
    ///
    /// Nothing is touched when any collision exists. When a target is also the
    /// source of another move, every file is first parked under a temporary
    /// name so chained renames cannot overwrite each other.
    ///
    /// # Errors
    ///
    /// * [`Error::RenameCollisions`] listing every collision, before any rename
    /// * [`Error::CommitFailed`] if a rename fails part way through
    pub fn commit(&self, kind: &str) -> Result<usize, Error> {
        let collisions = self.all_collisions();
        if !collisions.is_empty() {
            return Err(Error::RenameCollisions { collisions });
        }
        if self.moves.is_empty() {
            info!("no {kind} to move");
            return Ok(0);
        }

        info!("moving {kind}:");
        let sources: BTreeSet<&PathBuf> = self.moves.values().collect();
        let chained = self.moves.keys().any(|target| sources.contains(target));

        if chained {
            let mut parked = Vec::with_capacity(self.moves.len());
            for (index, (target, source)) in self.moves.iter().enumerate() {
                let temp = parking_path(source, index);
                rename(source, &temp)?;
                parked.push((temp, source, target));
            }
            for (temp, source, target) in parked {
                log_move(source, target);
                rename(&temp, target)?;
            }
        } else {
            for (target, source) in &self.moves {
                log_move(source, target);
                rename(source, target)?;
            }
        }
        Ok(self.moves.len())
    }
}

fn parking_path(source: &Path, index: usize) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!(".pagekeep-{index}-{name}"))
}

fn rename(from: &Path, to: &Path) -> Result<(), Error> {
    fs::rename(from, to).map_err(|source| Error::CommitFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

fn log_move(source: &Path, target: &Path) {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    info!("{} =============> {}", name(source), name(target));
}
