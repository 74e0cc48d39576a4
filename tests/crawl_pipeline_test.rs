//! End-to-end crawl tests against scripted pages

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use wikimovies::crawl::{CrawlOptions, Crawler};
use wikimovies::error::{Result, WikiMoviesError};
use wikimovies::fetch::{FetchedPage, Fetcher};
use wikimovies::record::MovieRecord;
use wikimovies::sink::CsvSink;
use wikimovies::year::is_valid_year;

// ============================================================================
// Scripted fetcher
// ============================================================================

#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    requested: Vec<String>,
}

impl ScriptedFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    fn count(&self, url: &str) -> usize {
        self.requested.iter().filter(|u| u.as_str() == url).count()
    }
}

impl Fetcher for ScriptedFetcher {
    fn fetch(&mut self, url: &str) -> Result<FetchedPage> {
        self.requested.push(url.to_string());
        match self.pages.get(url) {
            Some(body) => Ok(FetchedPage {
                url: url.to_string(),
                body: body.clone(),
            }),
            None => Err(WikiMoviesError::IoError(std::io::Error::other(format!(
                "404 for {}",
                url
            )))),
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

const START: &str = "https://ru.wikipedia.org/wiki/Category_Films";
const PAGE_2: &str = "https://ru.wikipedia.org/w/index.php?title=Category_Films&pagefrom=M";

const LISTING_1: &str = r#"
<html><body><div id="mw-pages">
  <ul>
    <li><a href="/wiki/Solaris" title="Солярис (фильм, 1972)">Солярис</a></li>
    <li><a href="/wiki/Stalker" title="Сталкер (фильм)">Сталкер</a></li>
    <li><a href="/wiki/Moscow" title="Москва (город)">Москва</a></li>
    <li><a href="/wiki/Broken" title="Сломанная страница">Сломанная</a></li>
  </ul>
  <a href="/w/index.php?title=Category_Films&amp;pagefrom=M">Следующая страница</a>
</div></body></html>
"#;

const LISTING_2: &str = r#"
<html><body><div id="mw-pages">
  <ul>
    <li><a href="/wiki/Mirror" title="Зеркало (фильм)">Зеркало</a></li>
    <li><a href="/wiki/Solaris" title="Солярис (фильм, 1972)">Солярис</a></li>
    <li><a href="/wiki/Ivan" title="Иваново детство">Иваново детство</a></li>
  </ul>
</div></body></html>
"#;

const SOLARIS: &str = r#"
<html><body>
<h1 id="firstHeading"><span>Солярис (фильм, 1972)</span></h1>
<table class="infobox">
  <tr><th>Жанр</th><td><a>драма</a>, <a>фантастика</a><sup class="reference"><a>[1]</a></sup></td></tr>
  <tr><th>Режиссёр</th><td><a>Андрей Тарковский</a></td></tr>
  <tr><th>Страна</th><td><a>СССР</a></td></tr>
  <tr><th>Год</th><td>1972</td></tr>
</table>
<li id="t-wikidata"><a href="https://www.wikidata.org/wiki/Special:EntityPage/Q14712">Элемент Викиданных</a></li>
<p>«Солярис» — советский фильм.</p>
</body></html>
"#;

/// Only a director in the infobox; the rest comes from Wikidata
const STALKER: &str = r#"
<html><body>
<h1 id="firstHeading">Сталкер (фильм)</h1>
<table class="infobox">
  <tr><th>Режиссёр</th><td>режиссёр Андрей Тарковский</td></tr>
  <tr><th>Дата выхода</th><td>25 мая 1979</td></tr>
</table>
<li id="t-wikidata"><a href="https://www.wikidata.org/wiki/Special:EntityPage/Q181086">Элемент Викиданных</a></li>
<p>Научно-фантастический фильм.</p>
</body></html>
"#;

const STALKER_ENTITY: &str = r#"{
  "entities": {
    "Q181086": {
      "claims": {
        "P136": [{"mainsnak": {"datavalue": {"type": "wikibase-entityid", "value": {"id": "Q471839"}}}}],
        "P57":  [{"mainsnak": {"datavalue": {"type": "wikibase-entityid", "value": {"id": "Q853"}}}}],
        "P495": [{"mainsnak": {"datavalue": {"type": "wikibase-entityid", "value": {"id": "Q15180"}}}}],
        "P577": [{"mainsnak": {"datavalue": {"type": "time", "value": {"time": "+1980-05-01T00:00:00Z"}}}}]
      }
    }
  }
}"#;

const MOSCOW: &str = r#"
<html><body><h1 id="firstHeading">Москва</h1><p>Столица России.</p></body></html>
"#;

/// Incomplete, with a Wikidata link whose payload is broken
const MIRROR: &str = r#"
<html><body>
<h1 id="firstHeading">Зеркало (фильм)</h1>
<table class="infobox">
  <tr><th>Жанр</th><td><span>драма</span></td></tr>
  <tr><th>Год</th><td>—</td></tr>
</table>
<a href="https://www.wikidata.org/wiki/Q2361907">wd</a>
<p>Фильм Андрея Тарковского.</p>
</body></html>
"#;

/// Incomplete and without any Wikidata link
const IVAN: &str = r#"
<html><body>
<h1 id="firstHeading">Иваново детство</h1>
<table class="infobox">
  <tr><th>Страна</th><td><a>СССР</a> и <a>СССР</a></td></tr>
</table>
<p>Военный фильм.</p>
</body></html>
"#;

fn entity_url(qid: &str) -> String {
    format!("https://www.wikidata.org/wiki/Special:EntityData/{}.json", qid)
}

fn wiki(path: &str) -> String {
    format!("https://ru.wikipedia.org/wiki/{}", path)
}

fn scripted() -> ScriptedFetcher {
    ScriptedFetcher::default()
        .with(START, LISTING_1)
        .with(PAGE_2, LISTING_2)
        .with(&wiki("Solaris"), SOLARIS)
        .with(&wiki("Stalker"), STALKER)
        .with(&entity_url("Q181086"), STALKER_ENTITY)
        .with(&wiki("Moscow"), MOSCOW)
        .with(&wiki("Mirror"), MIRROR)
        .with(&entity_url("Q2361907"), "{\"entities\": [broken")
        .with(&wiki("Ivan"), IVAN)
}

fn crawl(options: CrawlOptions) -> (Vec<MovieRecord>, Crawler<ScriptedFetcher>) {
    let mut crawler = Crawler::new(scripted(), options);
    let mut records = Vec::new();
    crawler
        .run(START, |record| {
            records.push(record.clone());
            Ok(())
        })
        .expect("crawl succeeds");
    (records, crawler)
}

fn find<'a>(records: &'a [MovieRecord], title: &str) -> &'a MovieRecord {
    records
        .iter()
        .find(|r| r.title == title)
        .unwrap_or_else(|| panic!("no record titled {}", title))
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_full_crawl_emits_each_movie_once() {
    let (records, crawler) = crawl(CrawlOptions::default());

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Солярис", "Сталкер", "Зеркало", "Иваново детство"]);

    let stats = crawler.stats();
    assert_eq!(stats.pages, 2);
    assert_eq!(stats.emitted, 4);
    assert_eq!(stats.skipped, 1, "Moscow is not a movie page");
    assert_eq!(stats.duplicates, 1, "Solaris is listed twice");
    // Broken page fetch + broken entity payload
    assert_eq!(stats.errors, 2);
}

#[test]
fn test_complete_infobox_record() {
    let (records, crawler) = crawl(CrawlOptions::default());
    let solaris = find(&records, "Солярис");

    assert_eq!(solaris.genre, "драма | фантастика");
    assert_eq!(solaris.director, "Андрей Тарковский");
    assert_eq!(solaris.country, "СССР");
    assert_eq!(solaris.year, "1972");
    assert_eq!(solaris.qid, "Q14712");
    assert_eq!(solaris.wiki_url, wiki("Solaris"));
    assert_eq!(crawler.fetcher().count(&entity_url("Q14712")), 0);
}

#[test]
fn test_claims_fill_only_missing_fields() {
    let (records, _) = crawl(CrawlOptions::default());
    let stalker = find(&records, "Сталкер");

    // Infobox values win over Wikidata
    assert_eq!(stalker.director, "Андрей Тарковский");
    assert_eq!(stalker.year, "1979");
    // Gaps are filled with entity ids
    assert_eq!(stalker.genre, "Q471839");
    assert_eq!(stalker.country, "Q15180");
}

#[test]
fn test_broken_entity_payload_keeps_infobox_fields() {
    let (records, _) = crawl(CrawlOptions::default());
    let mirror = find(&records, "Зеркало");

    assert_eq!(mirror.genre, "драма");
    assert_eq!(mirror.year, "");
    assert_eq!(mirror.director, "");
    assert_eq!(mirror.qid, "Q2361907");
}

#[test]
fn test_record_without_qid_is_emitted_directly() {
    let (records, _) = crawl(CrawlOptions::default());
    let ivan = find(&records, "Иваново детство");
    assert_eq!(ivan.country, "СССР");
    assert_eq!(ivan.qid, "");
}

#[test]
fn test_one_entity_lookup_per_incomplete_record() {
    let (_, crawler) = crawl(CrawlOptions::default());

    // Stalker and Mirror need lookups; Solaris and Ivan do not
    assert_eq!(crawler.stats().claims_lookups, 2);
    assert_eq!(crawler.fetcher().count(&entity_url("Q181086")), 1);
    assert_eq!(crawler.fetcher().count(&entity_url("Q2361907")), 1);
    // The duplicate listing entry is never fetched again
    assert_eq!(crawler.fetcher().count(&wiki("Solaris")), 1);
}

#[test]
fn test_no_claims_option_skips_lookups() {
    let (records, crawler) = crawl(CrawlOptions {
        limit: None,
        resolve_claims: false,
    });
    assert_eq!(crawler.stats().claims_lookups, 0);
    let stalker = find(&records, "Сталкер");
    assert_eq!(stalker.genre, "");
    assert_eq!(stalker.year, "1979");
}

#[test]
fn test_limit_stops_early() {
    let (records, crawler) = crawl(CrawlOptions {
        limit: Some(1),
        resolve_claims: true,
    });
    assert_eq!(records.len(), 1);
    assert_eq!(crawler.stats().pages, 1);
}

#[test]
fn test_stop_flag_prevents_any_fetch() {
    let stop = Arc::new(AtomicBool::new(true));
    let mut crawler = Crawler::new(scripted(), CrawlOptions::default()).with_stop_flag(stop);
    let stats = crawler.run(START, |_| Ok(())).unwrap();
    assert_eq!(stats.pages, 0);
    assert_eq!(stats.emitted, 0);
}

#[test]
fn test_emitted_records_hold_invariants() {
    let (records, _) = crawl(CrawlOptions::default());
    for record in &records {
        assert!(!record.title.is_empty());
        assert!(record.year.is_empty() || is_valid_year(&record.year));
        for value in [&record.genre, &record.director, &record.country] {
            let parts: Vec<String> = value
                .split(" | ")
                .filter(|p| !p.is_empty())
                .map(|p| p.to_lowercase())
                .collect();
            let mut unique = parts.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), parts.len(), "duplicates in {:?}", value);
        }
    }
}

#[test]
fn test_sink_error_aborts_crawl() {
    let mut crawler = Crawler::new(scripted(), CrawlOptions::default());
    let result = crawler.run(START, |_| {
        Err(WikiMoviesError::IoError(std::io::Error::other("disk full")))
    });
    assert!(result.is_err());
}

#[test]
fn test_crawl_into_csv() {
    let mut crawler = Crawler::new(scripted(), CrawlOptions::default());
    let mut sink = CsvSink::new(Vec::new()).unwrap();
    crawler.run(START, |record| sink.write(record)).unwrap();
    let text = String::from_utf8(sink.finish().unwrap()).unwrap();

    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("title,genre,director,country,year"));
    assert_eq!(
        lines.next(),
        Some("Солярис,драма | фантастика,Андрей Тарковский,СССР,1972")
    );
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn test_fetch_movie_directly() {
    let mut fetcher = scripted();
    fetcher.requested.clear();
    let mut crawler = Crawler::new(fetcher, CrawlOptions::default());

    let record = crawler.fetch_movie(&wiki("Stalker"), None).unwrap().unwrap();
    assert_eq!(record.genre, "Q471839");
    assert!(crawler.fetch_movie(&wiki("Moscow"), None).unwrap().is_none());
    assert!(crawler.fetch_movie(&wiki("Missing"), None).is_err());
}

#[test]
fn test_scripted_fetcher_counts() {
    let mut fetcher = scripted();
    fetcher.fetch(START).unwrap();
    fetcher.fetch(START).unwrap();
    assert_eq!(fetcher.count(START), 2);
}
