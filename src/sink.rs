//! CSV output for finalized records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::record::MovieRecord;

/// Column order of the output file
pub const COLUMNS: [&str; 5] = ["title", "genre", "director", "country", "year"];

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    genre: &'a str,
    director: &'a str,
    country: &'a str,
    year: &'a str,
}

impl<'a> From<&'a MovieRecord> for CsvRow<'a> {
    fn from(record: &'a MovieRecord) -> Self {
        Self {
            title: &record.title,
            genre: &record.genre,
            director: &record.director,
            country: &record.country,
            year: &record.year,
        }
    }
}

/// Writes records as UTF-8 CSV with a fixed header
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file and write the header
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap a writer; the header row is written immediately
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record(COLUMNS)?;
        Ok(Self { writer, written: 0 })
    }

    pub fn write(&mut self, record: &MovieRecord) -> Result<()> {
        self.writer.serialize(CsvRow::from(record))?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered rows and return the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: &str) -> MovieRecord {
        MovieRecord {
            title: title.into(),
            genre: "драма | фантастика".into(),
            director: "Андрей Тарковский".into(),
            country: "СССР".into(),
            year: year.into(),
            wiki_url: "https://ru.wikipedia.org/wiki/x".into(),
            qid: "Q1".into(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let mut sink = CsvSink::new(Vec::new()).unwrap();
        sink.write(&record("Солярис", "1972")).unwrap();
        sink.write(&record("Сталкер, новый", "")).unwrap();
        assert_eq!(sink.written(), 2);

        let bytes = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], COLUMNS.join(","));
        assert_eq!(lines[1], "Солярис,драма | фантастика,Андрей Тарковский,СССР,1972");
        assert_eq!(lines[2], "\"Сталкер, новый\",драма | фантастика,Андрей Тарковский,СССР,");
    }

    #[test]
    fn test_header_without_records() {
        let sink = CsvSink::new(Vec::new()).unwrap();
        assert_eq!(sink.written(), 0);
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(text, "title,genre,director,country,year\n");
    }

    #[test]
    fn test_create_overwrites() {
        let path = std::env::temp_dir().join(format!("wikimovies-sink-{}.csv", std::process::id()));
        std::fs::write(&path, "stale content\nmore\n").unwrap();

        let mut sink = CsvSink::create(&path).unwrap();
        sink.write(&record("Зеркало", "1974")).unwrap();
        sink.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 2);
        std::fs::remove_file(&path).ok();
    }
}
