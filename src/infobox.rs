//! Infobox row mapping onto `MovieRecord` fields.

use scraper::{ElementRef, Html, Selector};

use crate::cell::extract_cell_text;
use crate::clean::{clean_field, FieldKind};
use crate::normalize::normalize_text;
use crate::record::MovieRecord;
use crate::year::extract_year;

/// What a recognized row label fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    /// A list field, cleaned with the kind's stop words
    List(FieldKind),
    /// The year, always overwritten
    Year,
    /// The year, only when nothing set it yet
    ReleaseDate,
}

/// Label substrings in priority order; the first match decides the row
const LABEL_TARGETS: [(&str, RowTarget); 5] = [
    ("Жанр", RowTarget::List(FieldKind::Genre)),
    ("Режиссёр", RowTarget::List(FieldKind::Director)),
    ("Страна", RowTarget::List(FieldKind::Country)),
    ("Год", RowTarget::Year),
    ("Дата выхода", RowTarget::ReleaseDate),
];

/// One `<tr>` of the infobox that has both a header and a data cell
#[derive(Debug, Clone)]
pub struct InfoboxRow<'a> {
    pub label: String,
    pub cell: ElementRef<'a>,
}

impl RowTarget {
    pub fn for_label(label: &str) -> Option<RowTarget> {
        LABEL_TARGETS
            .iter()
            .find(|(needle, _)| label.contains(needle))
            .map(|(_, target)| *target)
    }
}

/// Rows of the first `table.infobox` in the document
pub fn infobox_rows(document: &Html) -> Vec<InfoboxRow<'_>> {
    let (Ok(table_sel), Ok(row_sel), Ok(th_sel), Ok(td_sel)) = (
        Selector::parse("table.infobox"),
        Selector::parse("tr"),
        Selector::parse("th"),
        Selector::parse("td"),
    ) else {
        return Vec::new();
    };

    let Some(table) = document.select(&table_sel).next() else {
        return Vec::new();
    };

    table
        .select(&row_sel)
        .filter_map(|row| {
            let th = row.select(&th_sel).next()?;
            let cell = row.select(&td_sel).next()?;
            let label = normalize_text(&th.text().collect::<String>());
            if label.is_empty() {
                return None;
            }
            Some(InfoboxRow { label, cell })
        })
        .collect()
}

/// Fill record fields from infobox rows
pub fn map_infobox(rows: &[InfoboxRow], item: &mut MovieRecord) {
    for row in rows {
        let text = extract_cell_text(row.cell);
        apply_row(&row.label, &text, item);
    }
}

/// Apply one row given its label and extracted cell text
pub fn apply_row(label: &str, cell_text: &str, item: &mut MovieRecord) {
    if label.is_empty() || cell_text.is_empty() {
        return;
    }

    match RowTarget::for_label(label) {
        Some(RowTarget::List(kind)) => {
            item.set(kind.field(), clean_field(cell_text, kind));
        }
        Some(RowTarget::Year) => {
            item.year = extract_year(cell_text);
        }
        Some(RowTarget::ReleaseDate) if item.year.is_empty() => {
            item.year = extract_year(cell_text);
        }
        Some(RowTarget::ReleaseDate) | None => {}
    }
}
