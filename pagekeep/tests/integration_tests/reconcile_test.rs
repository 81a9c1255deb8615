// tests/integration_tests/reconcile_test.rs
use super::common::setup_test_library;
use anyhow::Result;
use pagekeep::models::EntryRef;
use pagekeep::{MultiEntryAllowList, Registry, Report, reconcile};
use std::fs;

#[test]
fn test_reconcile_persists_sorted_registry() -> Result<()> {
    let (_temp_dir, settings, library) = setup_test_library()?;
    let mut registry = Registry::new();
    registry.insert("Artist", "Plain", "https://example.org/plain");
    registry.insert("Artist", "Deleted", "https://example.org/deleted");
    registry.insert("Missing Artist", "Ghost", "https://example.org/ghost");

    let mut report = Report::new();
    reconcile(&mut registry, &library, &MultiEntryAllowList::default(), &mut report)?;
    registry.save(&settings.registry)?;

    assert_eq!(
        report.missing_entries,
        vec![
            EntryRef::new("Artist", "Deleted", "https://example.org/deleted"),
            EntryRef::new("Missing Artist", "Ghost", "https://example.org/ghost"),
        ]
    );
    assert_eq!(report.added_entries, vec!["Artist/Prefixed", "Artist/Series"]);
    assert_eq!(report.removed_entries, vec!["Artist/Deleted"]);
    assert_eq!(report.new_multi_entries, vec!["Artist/Series"]);
    assert_eq!(report.missing_links, vec!["Artist/Prefixed", "Artist/Series"]);

    let content = fs::read_to_string(&settings.registry)?;
    assert_eq!(
        content,
        concat!(
            "{\n",
            "  \"Artist\": {\n",
            "    \"Plain\": \"https://example.org/plain\",\n",
            "    \"Prefixed\": \"\",\n",
            "    \"Series\": \"\"\n",
            "  },\n",
            "  \"Missing Artist\": {\n",
            "    \"Ghost\": \"https://example.org/ghost\"\n",
            "  }\n",
            "}\n",
        )
    );
    Ok(())
}

#[test]
fn test_reconcile_twice_is_a_fixed_point() -> Result<()> {
    let (_temp_dir, settings, library) = setup_test_library()?;
    let allow_list: MultiEntryAllowList = ["Artist/Series"].into_iter().collect();

    let mut registry = Registry::load(&settings.registry)?;
    reconcile(&mut registry, &library, &allow_list, &mut Report::new())?;
    registry.save(&settings.registry)?;
    let first = fs::read_to_string(&settings.registry)?;

    let mut registry = Registry::load(&settings.registry)?;
    let mut report = Report::new();
    reconcile(&mut registry, &library, &allow_list, &mut report)?;
    registry.save(&settings.registry)?;

    assert_eq!(fs::read_to_string(&settings.registry)?, first);
    assert!(report.created_artists.is_empty());
    assert!(report.added_entries.is_empty());
    assert!(report.new_multi_entries.is_empty());
    Ok(())
}

#[test]
fn test_non_ascii_names_are_written_verbatim() -> Result<()> {
    let (temp_dir, settings, library) = setup_test_library()?;
    fs::create_dir_all(temp_dir.path().join("data/作者/タイトル"))?;

    let mut registry = Registry::new();
    reconcile(&mut registry, &library, &MultiEntryAllowList::default(), &mut Report::new())?;
    registry.save(&settings.registry)?;

    let content = fs::read_to_string(&settings.registry)?;
    assert!(content.contains("\"作者\": {"));
    assert!(content.contains("\"タイトル\": \"\""));
    Ok(())
}
