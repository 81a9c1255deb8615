// tests/integration_tests/normalize_test.rs
use super::common::{create_test_file, file_names, setup_test_library};
use anyhow::Result;
use pagekeep::{Error, Report, normalize_pages, plan_page_names};
use std::fs;

#[test]
fn test_normalize_whole_library() -> Result<()> {
    let (temp_dir, _settings, library) = setup_test_library()?;
    let data = temp_dir.path().join("data/Artist");

    let renamed = normalize_pages(&library, false, &mut Report::new())?;
    assert_eq!(renamed, 8);

    assert_eq!(file_names(&data.join("Plain"))?, vec!["01.jpg", "02.jpg", "10.jpg"]);
    assert_eq!(
        file_names(&data.join("Prefixed"))?,
        vec!["01.png", "02a.png", "02b.png"]
    );
    assert_eq!(file_names(&data.join("Series/vol 1"))?, vec!["01.jpg", "02.jpg"]);
    assert_eq!(file_names(&data.join("Series/vol 2"))?, vec!["07.jpg"]);

    // contents moved with their names
    assert_eq!(fs::read_to_string(data.join("Plain/02.jpg"))?, "2.jpg");
    Ok(())
}

#[test]
fn test_normalize_is_idempotent() -> Result<()> {
    let (_temp_dir, _settings, library) = setup_test_library()?;
    normalize_pages(&library, false, &mut Report::new())?;

    let outcome = plan_page_names(&library)?;
    assert!(outcome.plan.is_empty());
    assert_eq!(normalize_pages(&library, false, &mut Report::new())?, 0);
    Ok(())
}

#[test]
fn test_collision_aborts_whole_batch() -> Result<()> {
    let (temp_dir, _settings, library) = setup_test_library()?;
    let data = temp_dir.path().join("data/Artist");
    create_test_file(&data, "Clash/1.jpg", "one")?;
    create_test_file(&data, "Clash/001.jpg", "also one")?;

    let err = normalize_pages(&library, false, &mut Report::new()).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::RenameCollisions { collisions }) => {
            assert_eq!(collisions.len(), 1);
            let message = err.to_string();
            assert!(message.contains("Clash/1.jpg") || message.contains("Clash/001.jpg"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // nothing anywhere was renamed
    assert_eq!(file_names(&data.join("Plain"))?, vec!["1.jpg", "10.jpg", "2.jpg"]);
    assert_eq!(file_names(&data.join("Clash"))?, vec!["001.jpg", "1.jpg"]);
    Ok(())
}

#[test]
fn test_page_matching_two_patterns_is_fatal() -> Result<()> {
    let (temp_dir, _settings, library) = setup_test_library()?;
    create_test_file(&temp_dir.path().join("data/Other"), "Odd/p1 2.jpg", "")?;

    let err = normalize_pages(&library, false, &mut Report::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MultiplePatterns { .. })
    ));
    assert!(err.to_string().contains("standard, prefixed"));
    Ok(())
}

#[test]
fn test_no_pattern_found_is_fatal() -> Result<()> {
    let (temp_dir, _settings, library) = setup_test_library()?;
    create_test_file(&temp_dir.path().join("data/Artist"), "Cover Only/cover.jpg", "")?;

    let err = normalize_pages(&library, true, &mut Report::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::NoPatternFound { .. })
    ));
    Ok(())
}
