use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wikimovies")]
#[command(author, version, about = "Movie metadata from Russian Wikipedia infoboxes, with Wikidata fallback", long_about = None)]
#[command(after_help = r#"Examples:
  wikimovies crawl                                   Crawl the default category into movies.csv
  wikimovies crawl --limit 50 --output sample.csv    Stop after 50 records
  wikimovies page "https://ru.wikipedia.org/wiki/Солярис_(фильм,_1972)"
  wikimovies config                                  Show effective configuration
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk a category listing and write every movie to CSV
    #[command(after_help = r#"Examples:
  wikimovies crawl
  wikimovies crawl --start-url "https://ru.wikipedia.org/wiki/Категория:Фильмы_СССР"
  wikimovies crawl --delay-ms 1000 --no-claims
  RUST_LOG=debug wikimovies crawl --limit 10
"#)]
    Crawl {
        /// CSV output path (overwritten)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Category page to start from
        #[arg(long)]
        start_url: Option<String>,

        /// Stop after this many records
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Delay between requests to the same host
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Skip Wikidata lookups for incomplete records
        #[arg(long)]
        no_claims: bool,
    },

    /// Extract one movie article and print the record
    Page {
        /// Article URL
        #[arg(value_name = "URL")]
        url: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Skip the Wikidata lookup
        #[arg(long)]
        no_claims: bool,
    },

    /// Show configuration and its location
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}
