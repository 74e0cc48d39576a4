use once_cell::sync::Lazy;
use regex::Regex;

use crate::clean::{clean_field, FieldKind};
use crate::record::{MovieRecord, UNKNOWN_TITLE};
use crate::year::is_valid_year;

// Pre-compiled regex for whitespace normalization (compile once, use many times)
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex pattern")
});

/// Values that stand for "nothing" in infobox cells
const EMPTY_MARKERS: [&str; 4] = ["", "—", "-", "–"];

/// Collapse whitespace runs to one space, trim, and map dash placeholders to ""
pub fn normalize_text(content: &str) -> String {
    let collapsed = normalize_whitespace(content);
    let trimmed = collapsed.trim();
    if is_empty_marker(trimmed) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Normalize whitespace: collapse multiple spaces/newlines into single space
fn normalize_whitespace(content: &str) -> String {
    WHITESPACE_RE.replace_all(content, " ").to_string()
}

pub fn is_empty_marker(value: &str) -> bool {
    EMPTY_MARKERS.contains(&value)
}

/// Final pass before a record leaves the pipeline.
///
/// Text fields are normalized, list fields re-cleaned, and a year that is not
/// a plausible 4-digit year is dropped. The title is never left empty.
pub fn finalize(record: &mut MovieRecord) {
    record.title = normalize_text(&record.title);
    if record.title.is_empty() {
        record.title = UNKNOWN_TITLE.to_string();
    }

    for kind in FieldKind::ALL {
        let field = kind.field();
        let normalized = normalize_text(record.get(field));
        record.set(field, clean_field(&normalized, kind));
    }

    let year = record.year.trim();
    record.year = if is_valid_year(year) {
        year.to_string()
    } else {
        String::new()
    };
}
