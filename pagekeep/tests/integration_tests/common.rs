// tests/integration_tests/common.rs
use anyhow::Result;
use pagekeep::{Library, Settings};
use std::fs;
use std::io::Write as _;
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Writes a stored (uncompressed) zip archive holding `members`.
pub fn create_test_archive(path: &Path, members: &[&str]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = zip::ZipWriter::new(fs::File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for member in members {
        writer.start_file(*member, options)?;
        writer.write_all(member.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

pub fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// A library with one artist and three entries using different naming patterns.
pub fn setup_test_library() -> Result<(TempDir, Settings, Library)> {
    let temp_dir = TempDir::new()?;
    let data = temp_dir.path().join("data");

    for page in ["1.jpg", "2.jpg", "10.jpg"] {
        create_test_file(&data, &format!("Artist/Plain/{page}"), page)?;
    }
    for page in ["p001.png", "p002x1.png", "p002x2.png"] {
        create_test_file(&data, &format!("Artist/Prefixed/{page}"), page)?;
    }
    for page in ["Page_1_Image_0001.jpg", "Page_2_Image_0001.jpg"] {
        create_test_file(&data, &format!("Artist/Series/vol 1/{page}"), page)?;
    }
    create_test_file(&data, "Artist/Series/vol 2/img_3200x_7.jpg", "7")?;

    let settings = Settings::with_base(temp_dir.path());
    let library = Library::new(&settings);
    Ok((temp_dir, settings, library))
}
