use serde::{Deserialize, Serialize};

/// Title used when a page had a heading but nothing survived cleanup
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One movie as emitted to the sink.
///
/// Every field is always present; an empty string means "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    /// Pipe-delimited (`" | "`) list of genres
    pub genre: String,
    /// Pipe-delimited list of directors
    pub director: String,
    /// Pipe-delimited list of production countries
    pub country: String,
    /// Four-digit year or empty
    pub year: String,
    pub wiki_url: String,
    /// Wikidata entity id (e.g. "Q12345"), empty when the page links none
    pub qid: String,
}

/// Fields that extraction can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Genre,
    Director,
    Country,
    Year,
}

impl Field {
    /// Fields whose absence triggers an entity-data lookup
    pub const LOOKUP: [Field; 4] = [Field::Genre, Field::Director, Field::Country, Field::Year];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Genre => "genre",
            Field::Director => "director",
            Field::Country => "country",
            Field::Year => "year",
        }
    }
}

impl MovieRecord {
    pub fn new(title: &str, wiki_url: &str) -> Self {
        Self {
            title: title.to_string(),
            wiki_url: wiki_url.to_string(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Genre => &self.genre,
            Field::Director => &self.director,
            Field::Country => &self.country,
            Field::Year => &self.year,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Genre => &mut self.genre,
            Field::Director => &mut self.director,
            Field::Country => &mut self.country,
            Field::Year => &mut self.year,
        };
        *slot = value;
    }

    pub fn is_missing(&self, field: Field) -> bool {
        self.get(field).is_empty()
    }

    /// Lookup fields still empty after infobox extraction
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::LOOKUP
            .into_iter()
            .filter(|f| self.is_missing(*f))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
