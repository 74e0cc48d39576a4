//! Movie article parsing: title, Wikidata id, infobox fields.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::infobox::{infobox_rows, map_infobox};
use crate::normalize::normalize_text;
use crate::record::{MovieRecord, UNKNOWN_TITLE};

/// Heading selectors tried in order for the article title
const TITLE_SELECTORS: [&str; 4] = [
    "h1#firstHeading span",
    "h1#firstHeading",
    "h1.page-title",
    "h1.mw-first-heading",
];

/// Words that must appear somewhere on a movie page
const MOVIE_CUES: [&str; 3] = ["фильм", "кино", "кинокартина"];

static TITLE_QUALIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\([^)]*(?:фильм|кинокартина|кинофильм)[^)]*\)")
        .expect("Invalid title qualifier regex")
});

static QID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Q[0-9]+").expect("Invalid QID regex")
});

/// Why a page produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No heading and no listing title
    NoTitle,
    /// None of the movie cue words appear on the page
    NoMovieCue,
}

/// Result of parsing one article
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Skip(SkipReason),
    /// Record can be emitted as is
    Ready(MovieRecord),
    /// Fields are missing and the page links a Wikidata entity
    NeedsClaims { record: MovieRecord, qid: String },
}

/// Parse a movie article into a record (not yet finalized).
///
/// `link_title` is the title attribute of the listing link that led here and
/// is used when the page has no recognizable heading.
pub fn parse_movie_page(url: &str, html: &str, link_title: Option<&str>) -> PageOutcome {
    let document = Html::parse_document(html);

    let raw_title = extract_heading(&document).or_else(|| {
        link_title
            .map(normalize_text)
            .filter(|t| !t.is_empty())
    });
    let Some(raw_title) = raw_title else {
        return PageOutcome::Skip(SkipReason::NoTitle);
    };

    let mut record = MovieRecord::new(&clean_title(&raw_title), url);
    if let Some(qid) = extract_qid(&document) {
        record.qid = qid;
    }

    let rows = infobox_rows(&document);
    map_infobox(&rows, &mut record);

    if !has_movie_cue(html) {
        return PageOutcome::Skip(SkipReason::NoMovieCue);
    }

    if record.is_complete() || record.qid.is_empty() {
        PageOutcome::Ready(record)
    } else {
        let qid = record.qid.clone();
        PageOutcome::NeedsClaims { record, qid }
    }
}

/// First non-empty heading text
fn extract_heading(document: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        document
            .select(&selector)
            .map(|el| normalize_text(&el.text().collect::<String>()))
            .find(|t| !t.is_empty())
    })
}

/// Drop "(фильм, 1972)"-style qualifiers from a title
pub fn clean_title(raw: &str) -> String {
    let cleaned = TITLE_QUALIFIER_RE.replace_all(raw, "");
    let cleaned = normalize_text(&cleaned);
    if cleaned.is_empty() {
        UNKNOWN_TITLE.to_string()
    } else {
        cleaned
    }
}

/// Wikidata id from the sidebar tool link or any entity link
pub fn extract_qid(document: &Html) -> Option<String> {
    ["li#t-wikidata a[href]", r#"a[href*="wikidata.org/wiki/Q"]"#]
        .iter()
        .find_map(|sel| {
            let selector = Selector::parse(sel).ok()?;
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("href"))
                .find_map(|href| QID_RE.find(href).map(|m| m.as_str().to_string()))
        })
}

/// Coarse full-text check that the page is about a film
pub fn has_movie_cue(html: &str) -> bool {
    let lower = html.to_lowercase();
    MOVIE_CUES.iter().any(|cue| lower.contains(cue))
}
