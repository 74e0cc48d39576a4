//! Year extraction from free-form infobox date text.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:19|20)[0-9]{2})\b").expect("Invalid year regex pattern")
});

static VALID_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:19|20)[0-9]{2}$").expect("Invalid year regex pattern")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{1,2})\s+(\w+)\s+([0-9]{4})").expect("Invalid date regex pattern")
});

/// Genitive month names as they appear in "15 мая 2001"
const RU_MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// chrono formats tried after the Russian month table
const DATE_FORMATS: [&str; 2] = ["%d %B %Y", "%d %b %Y"];

/// Pull a 4-digit year out of arbitrary text, or return "".
///
/// A standalone 19xx/20xx token wins. Otherwise the first day-month-year
/// date is parsed and its year returned if it is in range.
pub fn extract_year(text: &str) -> String {
    if let Some(caps) = YEAR_RE.captures(text) {
        return caps[1].to_string();
    }

    let Some(caps) = DATE_RE.captures(text) else {
        return String::new();
    };

    parse_date(&caps[1], &caps[2], &caps[3])
        .map(|date| date.year().to_string())
        .filter(|year| is_valid_year(year))
        .unwrap_or_default()
}

fn parse_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day: u32 = day.parse().ok()?;
    let year_num: i32 = year.parse().ok()?;

    let month_lower = month.to_lowercase();
    if let Some(idx) = RU_MONTHS.iter().position(|m| *m == month_lower) {
        if let Some(date) = NaiveDate::from_ymd_opt(year_num, idx as u32 + 1, day) {
            return Some(date);
        }
    }

    let joined = format!("{} {} {}", day, month, year);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&joined, fmt).ok())
}

/// True for exactly four ASCII digits starting with 19 or 20
pub fn is_valid_year(value: &str) -> bool {
    VALID_YEAR_RE.is_match(value)
}
