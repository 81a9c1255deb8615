// src/core/reconciler.rs
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::core::library::{EntryDir, Library, file_name};
use crate::models::{Entries, EntryRef, MultiEntryAllowList, Registry, Report};

/// Brings the registry in line with the entry directories on disk and records
/// every anomaly in `report`.
///
/// Missing entries are collected before anything is pruned, so records whose
/// directory vanished are still reported with their URL. Artists with no
/// directory at all are never touched. Running this twice without disk
/// changes leaves the registry unchanged.
///
/// # Errors
///
/// Returns an error if the library tree cannot be walked.
pub fn reconcile(
    registry: &mut Registry,
    library: &Library,
    allow_list: &MultiEntryAllowList,
    report: &mut Report,
) -> Result<()> {
    info!("========== refreshing index ==========");
    let mut on_disk: BTreeMap<String, Vec<EntryDir>> = BTreeMap::new();
    for artist_dir in library.artists()? {
        let entries = library.entries(&artist_dir)?;
        on_disk.insert(file_name(&artist_dir), entries);
    }

    report.missing_entries.extend(
        registry
            .iter()
            .filter(|(artist, entry, _)| !exists_on_disk(&on_disk, artist, entry))
            .map(|(artist, entry, url)| EntryRef::new(artist, entry, url)),
    );

    for (artist, entries) in &on_disk {
        sync_artist(registry, artist, entries, report);
    }

    report.new_multi_entries.extend(
        on_disk
            .values()
            .flatten()
            .filter(|entry| entry.is_multi_entry())
            .map(EntryDir::relative_path)
            .filter(|path| !allow_list.contains(path)),
    );

    report.duplicate_urls.extend(duplicate_urls(registry));
    report.missing_links.extend(
        registry
            .iter()
            .filter(|(_, _, url)| url.is_empty())
            .map(|(artist, entry, _)| format!("{artist}/{entry}")),
    );
    info!("finished refreshing index");
    Ok(())
}

fn exists_on_disk(on_disk: &BTreeMap<String, Vec<EntryDir>>, artist: &str, entry: &str) -> bool {
    on_disk
        .get(artist)
        .is_some_and(|entries| entries.iter().any(|e| e.name == entry))
}

fn sync_artist(registry: &mut Registry, artist: &str, entries: &[EntryDir], report: &mut Report) {
    let Some(known) = registry.entries(artist) else {
        let created: Entries = entries
            .iter()
            .map(|e| (e.name.clone(), String::new()))
            .collect();
        info!("created missing artist {artist} with {} entries", created.len());
        report.created_artists.push((artist.to_owned(), created.len()));
        registry.insert_artist(artist, created);
        return;
    };

    let dir_names: BTreeSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let known_names: BTreeSet<String> = known.keys().cloned().collect();

    for name in dir_names.iter().filter(|n| !known_names.contains(**n)) {
        registry.insert(artist, name, "");
        info!("added missing entry: {artist}/{name}");
        report.added_entries.push(format!("{artist}/{name}"));
    }
    for name in known_names.iter().filter(|n| !dir_names.contains(n.as_str())) {
        registry.remove(artist, name);
        info!("deleted invalid entry: {artist}/{name}");
        report.removed_entries.push(format!("{artist}/{name}"));
    }
}

/// Every record whose non-empty URL is shared with another record.
fn duplicate_urls(registry: &Registry) -> Vec<EntryRef> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, _, url) in registry.iter().filter(|(_, _, url)| !url.is_empty()) {
        let count = counts.entry(url).or_default();
        *count = count.saturating_add(1);
    }
    registry
        .iter()
        .filter(|(_, _, url)| counts.get(url).is_some_and(|&n| n > 1))
        .map(|(artist, entry, url)| EntryRef::new(artist, entry, url))
        .collect()
}
