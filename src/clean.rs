//! Field cleaning for list-valued movie fields (genre, director, country).
//!
//! Raw values arrive as `" | "`-joined tokens from infobox cells or as single
//! strings from entity data. Cleaning splits them on `|`, strips parentheticals
//! within each part, splits again on `,` and `;`, removes
//! field-specific service words, trims trailing punctuation and deduplicates
//! case-insensitively. The operation is idempotent, so it can run both during
//! infobox mapping and again in the final normalization pass.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Field;

/// Separator used between list entries in every output field
pub const SEPARATOR: &str = " | ";

/// Separates cell tokens; parentheticals never span it
const PART_SPLIT: char = '|';

/// Split a part into entries once its parentheticals are gone
const ENTRY_SPLIT: [char; 2] = [',', ';'];

/// Punctuation trimmed from the end of an entry
const TRAILING_PUNCT: [char; 4] = [';', ':', ',', '.'];

static PARENTHETICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)").expect("Invalid parenthetical regex pattern")
});

// An opening parenthesis whose closing one landed in a later part
static OPEN_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*$").expect("Invalid open parenthesis regex pattern")
});

/// Which stop-word list applies to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Director,
    Country,
    Genre,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Genre, FieldKind::Director, FieldKind::Country];

    /// Service words removed from entries, matched as whole words ignoring case.
    /// Multi-word entries must appear as consecutive words.
    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Director => &[
                "режиссёр",
                "режиссер",
                "реж.",
                "сорежиссёр",
                "и",
                "совместно с",
            ],
            FieldKind::Country => &["страна", "страны", "и", "совместно", "производство"],
            FieldKind::Genre => &["жанр", "жанры", "и", "с элементами", "в жанре"],
        }
    }

    pub fn field(&self) -> Field {
        match self {
            FieldKind::Director => Field::Director,
            FieldKind::Country => Field::Country,
            FieldKind::Genre => Field::Genre,
        }
    }
}

/// Clean a raw list value for the given field kind.
///
/// Entries are deduplicated on their cleaned form, which also collapses raw
/// entries that only differ by case or by stripped service words
/// ("режиссёр Иванов" vs "Иванов"). First-seen order is kept.
pub fn clean_field(raw: &str, kind: FieldKind) -> String {
    let mut seen = HashSet::new();
    let mut kept: Vec<String> = Vec::new();

    for part in raw.split(PART_SPLIT) {
        // Commas inside a parenthetical never split an entry
        let part = strip_parentheticals(part);
        for entry in part.split(ENTRY_SPLIT) {
            let cleaned = clean_entry(entry, kind);
            if cleaned.is_empty() {
                continue;
            }
            if seen.insert(cleaned.to_lowercase()) {
                kept.push(cleaned);
            }
        }
    }

    kept.join(SEPARATOR)
}

/// Drop parentheticals from one part, including halves cut off by a separator
fn strip_parentheticals(part: &str) -> String {
    let closed = PARENTHETICAL_RE.replace_all(part, " ");
    let open = OPEN_TAIL_RE.replace(&closed, " ");
    open.replace(')', " ")
}

/// Clean a single entry until it stops changing
fn clean_entry(part: &str, kind: FieldKind) -> String {
    let mut current = part.trim().to_string();
    loop {
        let without_parens = PARENTHETICAL_RE.replace_all(&current, " ");
        let without_stops = strip_stop_words(&without_parens, kind.stop_words());
        let next = trim_trailing_punctuation(&without_stops).to_string();
        if next == current {
            break;
        }
        current = next;
    }

    // Leftovers like "—" or "." are not entries
    if current.chars().any(char::is_alphanumeric) {
        current
    } else {
        String::new()
    }
}

/// Remove stop-word token sequences and rejoin remaining tokens with single spaces
fn strip_stop_words(text: &str, stop_words: &[&str]) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<String> = tokens.iter().map(|t| match_key(t)).collect();

    let mut phrases: Vec<Vec<&str>> = stop_words
        .iter()
        .map(|w| w.split_whitespace().collect())
        .collect();
    // Longest phrases first so "совместно с" wins over "совместно"
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut kept = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let matched = phrases.iter().find(|phrase| {
            i + phrase.len() <= keys.len()
                && phrase
                    .iter()
                    .zip(&keys[i..])
                    .all(|(word, key)| key.as_str() == *word)
        });
        match matched {
            Some(phrase) => i += phrase.len(),
            None => {
                kept.push(tokens[i]);
                i += 1;
            }
        }
    }

    kept.join(" ")
}

/// Comparison form of a token: lowercase, without trailing `, ; :`
fn match_key(token: &str) -> String {
    token
        .trim_end_matches([',', ';', ':'])
        .to_lowercase()
}

/// Trim trailing `; : , .` but keep the dot that closes initials ("Петров П.")
fn trim_trailing_punctuation(text: &str) -> &str {
    let mut end = text.trim_end();
    while let Some(c) = end.chars().last() {
        if !TRAILING_PUNCT.contains(&c) || (c == '.' && ends_with_initials(end)) {
            break;
        }
        end = end[..end.len() - c.len_utf8()].trim_end();
    }
    end
}

/// True when the last word is a run of single-letter initials like "И." or "И.И."
fn ends_with_initials(text: &str) -> bool {
    let word = text.split_whitespace().last().unwrap_or("");
    let Some(body) = word.strip_suffix('.') else {
        return false;
    };
    !body.is_empty()
        && body.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
        })
}
