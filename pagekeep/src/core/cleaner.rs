// src/core/cleaner.rs
use fancy_regex::Regex;
use std::sync::LazyLock;

static ARTIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]").expect("valid artist prefix regex"));
static TAG_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^\}]*\}$").expect("valid tag block regex"));
static WATERMARK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(koushoku\.org\)|\(ksk\.moe\)").expect("valid watermark regex")
});

/// Cleans an entry directory name as it comes out of a downloaded archive.
///
/// Strips a leading `[artist]` token, a trailing `{tags}` block and site
/// watermarks, maps `’` to `'`, drops `？`, maps `–` to `-` and trims the
/// result. Runs to a fixed point, so `clean_directory_name` of its own output
/// is a no-op.
#[must_use]
pub fn clean_directory_name(name: &str) -> String {
    let mut current = name.to_owned();
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(name: &str) -> String {
    let new_name = ARTIST_PREFIX.replace(name, "");
    let new_name = TAG_BLOCK.replace(&new_name, "");
    let new_name = WATERMARK.replace_all(&new_name, "");
    new_name
        .replace('’', "'")
        .replace('？', "")
        .replace('–', "-")
        .trim()
        .to_owned()
}
