//! Single-article extraction

use colored::Colorize;

use wikimovies::config::Config;
use wikimovies::crawl::{CrawlOptions, Crawler};
use wikimovies::error::{Result, WikiMoviesError};
use wikimovies::fetch::HttpFetcher;
use wikimovies::record::Field;

pub fn cmd_page(url: &str, json: bool, no_claims: bool) -> Result<()> {
    let config = Config::load()?;
    let options = CrawlOptions {
        limit: None,
        resolve_claims: !no_claims,
    };
    let mut crawler = Crawler::new(HttpFetcher::new(&config), options);

    let record = crawler.fetch_movie(url, None)?.ok_or_else(|| {
        WikiMoviesError::ExtractionError(format!("{} does not look like a movie article", url))
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("\n{}", record.title.bold());
    for field in [Field::Genre, Field::Director, Field::Country, Field::Year] {
        let value = record.get(field);
        let shown = if value.is_empty() {
            "-".dimmed().to_string()
        } else {
            value.to_string()
        };
        println!("  {:<9} {}", format!("{}:", field.name()), shown);
    }
    println!("  {:<9} {}", "url:", record.wiki_url.dimmed());
    if !record.qid.is_empty() {
        println!("  {:<9} {}", "wikidata:", record.qid);
    }
    if crawler.stats().claims_lookups > 0 {
        println!("\n  {}", "Some fields were filled from Wikidata".dimmed());
    }

    Ok(())
}
