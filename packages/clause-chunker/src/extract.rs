//! Pattern extractors applied to block text.
//!
//! All extractors are pure functions over strings or bytes.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Requirement, RequirementKind};

/// Clause number followed by a title, e.g. "4.2 Scope" or "A.1 General".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLAUSE_WITH_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:[A-Z]|\d+)(?:\.\d+)*)\s+(.+)$").expect("valid regex")
});

/// Clause number on its own, e.g. "4.3" or "B".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CLAUSE_NUMBER_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:[A-Z]|\d+)(?:\.\d+)*)\s*$").expect("valid regex")
});

/// Anything that looks like a markup tag.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Modal keywords; alternation order makes "shall not" win over "shall".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REQUIREMENT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(shall not|shall|should|may)\b").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TABLE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btable\s+([A-Z]?\d+(?:\.\d+)*)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static FIGURE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:figure|fig\.?)\s+([A-Z]?\d+(?:\.\d+)*)").expect("valid regex")
});

/// Remove markup tags and trim surrounding whitespace.
///
/// Entities are left as they are.
///
/// # Examples
/// ```
/// use clause_chunker::extract::strip_html;
///
/// assert_eq!(strip_html("<p>Hello <b>world</b></p>\n"), "Hello world");
/// assert_eq!(strip_html("a &amp; b"), "a &amp; b");
/// ```
#[must_use]
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}

/// What a section header's text says about clause structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseHeading {
    /// Number and title in one header ("4.2 Scope").
    Titled { id: String, title: String },

    /// A bare number whose title follows in a later header ("4.3").
    NumberOnly { id: String },
}

impl ClauseHeading {
    /// The clause id in either form.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Titled { id, .. } | Self::NumberOnly { id } => id,
        }
    }
}

/// Classify plain header text as a clause heading.
///
/// Returns `None` when the text carries no clause number.
///
/// # Examples
/// ```
/// use clause_chunker::extract::{parse_clause_heading, ClauseHeading};
///
/// assert_eq!(
///     parse_clause_heading("4.2 Scope"),
///     Some(ClauseHeading::Titled { id: "4.2".into(), title: "Scope".into() })
/// );
/// assert_eq!(
///     parse_clause_heading("A.1"),
///     Some(ClauseHeading::NumberOnly { id: "A.1".into() })
/// );
/// assert_eq!(parse_clause_heading("Introduction"), None);
/// ```
#[must_use]
pub fn parse_clause_heading(text: &str) -> Option<ClauseHeading> {
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = CLAUSE_WITH_TITLE.captures(text) {
        let id = caps.get(1)?.as_str().to_string();
        let title = caps.get(2).map_or("", |m| m.as_str().trim());
        if title.is_empty() {
            return Some(ClauseHeading::NumberOnly { id });
        }
        return Some(ClauseHeading::Titled {
            id,
            title: title.to_string(),
        });
    }

    CLAUSE_NUMBER_ONLY.captures(text).and_then(|caps| {
        caps.get(1).map(|m| ClauseHeading::NumberOnly {
            id: m.as_str().to_string(),
        })
    })
}

/// Classify a paragraph by its first modal keyword.
///
/// At most one requirement is produced per paragraph, keyed by the leftmost
/// keyword; the record carries the whole paragraph.
///
/// # Examples
/// ```
/// use clause_chunker::extract::extract_requirement;
/// use clause_chunker::types::RequirementKind;
///
/// let req = extract_requirement("Equipment shall not exceed 50°C.").unwrap();
/// assert_eq!(req.kind, RequirementKind::Prohibition);
/// assert_eq!(req.keyword, "shall not");
/// assert!(extract_requirement("Informative text.").is_none());
/// ```
#[must_use]
pub fn extract_requirement(text: &str) -> Option<Requirement> {
    if text.is_empty() {
        return None;
    }

    let keyword = REQUIREMENT_KEYWORD
        .captures(text)?
        .get(1)?
        .as_str()
        .to_lowercase();
    let kind = RequirementKind::from_keyword(&keyword)?;

    Some(Requirement {
        kind,
        keyword,
        text: text.to_string(),
    })
}

/// Table number referenced by a caption ("Table 4.1 - Limits" -> "4.1").
#[must_use]
pub fn extract_table_number(caption: &str) -> Option<String> {
    TABLE_REF
        .captures(caption)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Figure number referenced by a caption ("Fig. 3 Layout" -> "3").
#[must_use]
pub fn extract_figure_number(caption: &str) -> Option<String> {
    FIGURE_REF
        .captures(caption)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Guess an image file extension from its leading bytes.
///
/// Unknown formats fall back to `.bin`.
///
/// # Examples
/// ```
/// use clause_chunker::extract::detect_image_format;
///
/// assert_eq!(detect_image_format(b"\x89PNG\r\n\x1a\n"), ".png");
/// assert_eq!(detect_image_format(b"RIFF\0\0\0\0WEBPVP8 "), ".webp");
/// assert_eq!(detect_image_format(b"plain"), ".bin");
/// ```
#[must_use]
pub fn detect_image_format(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG") {
        ".png"
    } else if data.starts_with(b"\xff\xd8\xff") {
        ".jpg"
    } else if data.starts_with(b"GIF8") {
        ".gif"
    } else if data.starts_with(b"BM") {
        ".bmp"
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        ".webp"
    } else {
        ".bin"
    }
}
