// src/core/canonical.rs
use crate::core::classifier::ClassifiedEntry;
use crate::core::patterns::{NamingPattern, Strategy};
use crate::core::planner::RenamePlan;
use crate::models::Capture;

/// Zero-padding width for an entry: the significant digit count of its largest
/// page number, never less than two.
#[must_use]
pub fn padding_width<'a>(captures: impl IntoIterator<Item = &'a Capture>) -> usize {
    captures
        .into_iter()
        .map(Capture::significant_digits)
        .fold(2, usize::max)
}

/// Renders a page number zero-padded to `width` without going through an integer.
#[must_use]
pub fn pad_number(digits: &str, width: usize) -> String {
    let significant = digits.trim_start_matches('0');
    let significant = if significant.is_empty() { "0" } else { significant };
    format!("{significant:0>width$}")
}

/// Canonical file name for one page.
#[must_use]
pub fn canonical_name(pattern: NamingPattern, capture: &Capture, extension: &str, width: usize) -> String {
    let mut name = pad_number(&capture.page, width);
    if let Strategy::Ranged { numeric_variant } = pattern.strategy() {
        if let Some(range_end) = &capture.range_end {
            name.push('-');
            name.push_str(&pad_number(range_end, width));
        }
        if let Some(variant) = &capture.variant {
            if numeric_variant {
                name.push_str(&variant_letter(variant));
            } else {
                name.push_str(variant);
            }
        }
    }
    name.push('.');
    name.push_str(extension);
    name
}

/// `1` -> `a`, `2` -> `b`, ... Anything else is kept as is.
fn variant_letter(variant: &str) -> String {
    match variant.parse::<u8>() {
        Ok(n @ 1..=26) => char::from(b'a' + n - 1).to_string(),
        _ => variant.to_owned(),
    }
}

/// Plans the renames that bring every page of `entry` to its canonical name.
///
/// Pages already carrying their canonical name still claim it, so nothing else
/// in the batch can be renamed onto them.
#[must_use]
pub fn plan_entry(entry: &ClassifiedEntry) -> RenamePlan {
    let width = padding_width(entry.pages.iter().map(|(_, capture)| capture));
    let mut plan = RenamePlan::new();
    for (page, capture) in &entry.pages {
        let new_name = canonical_name(entry.pattern, capture, &page.extension, width);
        plan.add(&page.path, &new_name);
    }
    plan
}
