// src/core/patterns.rs
use fancy_regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

use crate::models::Capture;

/// The page naming conventions found in downloaded archives.
///
/// Variants are listed in precedence order; [`NamingPattern::ALL`] keeps that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamingPattern {
    /// `12`, `3-4`, `7b`, `scan 12`: a whitespace-delimited number token.
    Standard,
    /// `p012`, `p002x1`, `p004-p005`: letter prefix, numeric variant.
    Prefixed,
    /// `img_12_x3200`
    UnderscoreResolution,
    /// `page_0000012`: letters, separator, then only digits.
    ZeroHeavy,
    /// `Page_12_Image_0001`
    PageImage,
    /// `index-12_1`
    IndexedImage,
    /// `img_3200x_12`
    ResolutionPrefixed,
}

/// How a pattern's captures turn into a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Page, optional range end and optional variant suffix. With
    /// `numeric_variant` the suffix is a digit that becomes a letter.
    Ranged { numeric_variant: bool },
    /// Page number only.
    PageOnly,
}

static STANDARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<![^\s])\b(?P<page>\d+)(?:-(?P<range_end>\d+))?(?P<variant>[a-c])?\b(?![^\s])")
        .expect("valid standard pattern")
});
static PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"p(?P<page>\d+)(?:(?:x(?P<variant>\d))|(?:-p(?P<range_end>\d+)))?")
        .expect("valid prefixed pattern")
});
static UNDERSCORE_RESOLUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(?P<page>\d+)_x3200").expect("valid underscore-resolution pattern")
});
static ZERO_HEAVY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+[_-]+(?P<page>\d+)$").expect("valid zero-heavy pattern")
});
static PAGE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Page_(?P<page>\d+)_Image_0001").expect("valid page-image pattern")
});
static INDEXED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"index-(?P<page>\d+)_1").expect("valid indexed-image pattern")
});
static RESOLUTION_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_3200x_(?P<page>\d+)$").expect("valid resolution-prefixed pattern")
});

impl NamingPattern {
    pub const ALL: [Self; 7] = [
        Self::Standard,
        Self::Prefixed,
        Self::UnderscoreResolution,
        Self::ZeroHeavy,
        Self::PageImage,
        Self::IndexedImage,
        Self::ResolutionPrefixed,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Prefixed => "prefixed",
            Self::UnderscoreResolution => "underscore-resolution",
            Self::ZeroHeavy => "zero-heavy",
            Self::PageImage => "page-image",
            Self::IndexedImage => "indexed-image",
            Self::ResolutionPrefixed => "resolution-prefixed",
        }
    }

    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::Standard => Strategy::Ranged {
                numeric_variant: false,
            },
            Self::Prefixed => Strategy::Ranged {
                numeric_variant: true,
            },
            Self::UnderscoreResolution
            | Self::ZeroHeavy
            | Self::PageImage
            | Self::IndexedImage
            | Self::ResolutionPrefixed => Strategy::PageOnly,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Standard => &STANDARD,
            Self::Prefixed => &PREFIXED,
            Self::UnderscoreResolution => &UNDERSCORE_RESOLUTION,
            Self::ZeroHeavy => &ZERO_HEAVY,
            Self::PageImage => &PAGE_IMAGE,
            Self::IndexedImage => &INDEXED_IMAGE,
            Self::ResolutionPrefixed => &RESOLUTION_PREFIXED,
        }
    }

    /// Matches `stem` and returns the groups of the last match, so leading noise
    /// such as a scanner prefix does not shadow the real page number.
    ///
    /// # Errors
    ///
    /// Returns the regex engine's error when matching gives up, for example on
    /// hitting the backtrack limit.
    pub fn capture(self, stem: &str) -> Result<Option<Capture>, fancy_regex::Error> {
        last_capture(self.regex(), stem)
    }

    /// Every pattern matching `stem`, in precedence order.
    ///
    /// # Errors
    ///
    /// Returns the first regex engine error.
    pub fn all_matches(stem: &str) -> Result<Vec<(Self, Capture)>, fancy_regex::Error> {
        let mut matches = Vec::new();
        for pattern in Self::ALL {
            if let Some(capture) = pattern.capture(stem)? {
                matches.push((pattern, capture));
            }
        }
        Ok(matches)
    }
}

fn last_capture(regex: &Regex, stem: &str) -> Result<Option<Capture>, fancy_regex::Error> {
    let mut last = None;
    for caps in regex.captures_iter(stem) {
        last = Some(to_capture(&caps?));
    }
    Ok(last)
}

fn to_capture(caps: &Captures<'_>) -> Capture {
    let group = |name: &str| caps.name(name).map(|m| ascii_digits(m.as_str()));
    Capture {
        page: group("page").unwrap_or_default(),
        range_end: group("range_end"),
        variant: group("variant"),
    }
}

static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("valid decimal digit pattern"));

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0_u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf)).unwrap_or(false)
}

/// Rewrites every decimal digit of `text` (`２`, `٣`, `𝟗`) as its ASCII digit.
fn ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() { c } else { ascii_digit(c).unwrap_or(c) })
        .collect()
}

/// Decimal digits come in contiguous runs starting at zero, so the value is
/// the distance from the start of the run, modulo ten.
fn ascii_digit(c: char) -> Option<char> {
    if !is_decimal_digit(c) {
        return None;
    }
    let code = u32::from(c);
    let mut start = code;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start = u32::from(prev);
    }
    char::from_digit(code.saturating_sub(start) % 10, 10)
}

impl fmt::Display for NamingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
