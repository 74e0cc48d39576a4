//! Full category crawl into CSV

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;

use wikimovies::config::Config;
use wikimovies::crawl::{CrawlOptions, Crawler};
use wikimovies::error::{Result, WikiMoviesError};
use wikimovies::fetch::HttpFetcher;
use wikimovies::sink::CsvSink;

use crate::utils::{format_elapsed, truncate_str};

pub fn cmd_crawl(
    output: Option<PathBuf>,
    start_url: Option<String>,
    limit: Option<usize>,
    delay_ms: Option<u64>,
    no_claims: bool,
) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(output) = output {
        config.output = output;
    }
    if let Some(start_url) = start_url {
        config.start_url = start_url;
    }
    if let Some(delay_ms) = delay_ms {
        config.download_delay_ms = delay_ms;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        println!("\n\nStopping after the current page...");
        s.store(true, Ordering::SeqCst);
    })
    .map_err(|e| WikiMoviesError::ConfigError(format!("Failed to set Ctrl+C handler: {}", e)))?;

    println!(
        "\nCrawling {}\n  output: {}\n",
        config.start_url.bold(),
        config.output.display()
    );

    let options = CrawlOptions {
        limit,
        resolve_claims: !no_claims,
    };
    let mut crawler = Crawler::new(HttpFetcher::new(&config), options).with_stop_flag(stop);
    let mut sink = CsvSink::create(&config.output)?;

    let started = Instant::now();
    let stats = crawler.run(&config.start_url, |record| {
        println!(
            "  {} {} {}",
            "+".green(),
            truncate_str(&record.title, 50),
            record.year.dimmed()
        );
        sink.write(record)
    })?;
    sink.finish()?;

    println!(
        "\n{} {} records from {} listing pages in {}",
        "Done:".bold(),
        stats.emitted,
        stats.pages,
        format_elapsed(started.elapsed())
    );
    println!(
        "  movie pages: {}, skipped: {}, wikidata lookups: {}, duplicates: {}, errors: {}",
        stats.movies, stats.skipped, stats.claims_lookups, stats.duplicates, stats.errors
    );
    if stats.errors > 0 {
        println!("  {}", "Run with RUST_LOG=debug for per-page details".yellow());
    }

    Ok(())
}
