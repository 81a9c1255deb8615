// tests/integration_tests/ingest_test.rs
use super::common::{create_test_archive, file_names, setup_test_library};
use anyhow::Result;
use pagekeep::{
    DownloadMap, Registry, Report, ZipExtractor, normalize_pages, register_downloads,
    stage_archives, unpack_archives,
};

#[test]
fn test_download_flows_into_library() -> Result<()> {
    let (_temp_dir, settings, library) = setup_test_library()?;
    let raw = "[Artist] New Work {tag, other}";
    create_test_archive(
        &settings.staging_dir.join(format!("{raw}.cbz")),
        &["1.jpg", "2.jpg"],
    )?;

    let mut downloads = DownloadMap::default();
    downloads.insert("https://example.org/new", raw);
    let mut registry = Registry::new();
    registry.insert("Artist", "New Work", "https://example.org/new");
    let mut report = Report::new();

    assert_eq!(stage_archives(&registry, &downloads, &settings, &mut report)?, 1);
    assert_eq!(unpack_archives(&library, &ZipExtractor)?, 1);

    let plan = register_downloads(&mut registry, &downloads, &library, &mut report)?;
    assert!(report.added_entries.is_empty());
    assert_eq!(plan.commit("entries")?, 1);

    let entry = settings.data_dir.join("Artist/New Work");
    assert_eq!(file_names(&entry)?, vec!["1.jpg", "2.jpg"]);
    assert!(!settings.data_dir.join(format!("Artist/{raw}.cbz")).exists());

    normalize_pages(&library, false, &mut report)?;
    assert_eq!(file_names(&entry)?, vec!["01.jpg", "02.jpg"]);
    assert!(report.notes.is_empty());
    Ok(())
}

#[test]
fn test_unregistered_download_gets_cleaned_name() -> Result<()> {
    let (_temp_dir, settings, library) = setup_test_library()?;
    let raw = "[Artist] Fresh (koushoku.org)";
    create_test_archive(
        &settings.data_dir.join(format!("Artist/{raw}.cbz")),
        &["p001.jpg"],
    )?;
    let mut downloads = DownloadMap::default();
    downloads.insert("https://example.org/fresh", raw);

    let mut registry = Registry::new();
    let mut report = Report::new();
    unpack_archives(&library, &ZipExtractor)?;
    let plan = register_downloads(&mut registry, &downloads, &library, &mut report)?;
    plan.commit("entries")?;

    assert_eq!(registry.url("Artist", "Fresh"), Some("https://example.org/fresh"));
    assert_eq!(report.added_entries, vec!["Artist/Fresh"]);
    assert!(settings.data_dir.join("Artist/Fresh/p001.jpg").is_file());
    Ok(())
}
