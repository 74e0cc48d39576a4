//! wikimovies - movie metadata crawler for Russian Wikipedia

use clap::Parser;
use colored::Colorize;

use wikimovies::cli::{Cli, Commands};
use wikimovies::error::Result;

mod commands;
mod utils;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{} {}", "Error:".red(), e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint.yellow());
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            output,
            start_url,
            limit,
            delay_ms,
            no_claims,
        } => commands::cmd_crawl(output, start_url, limit, delay_ms, no_claims),
        Commands::Page { url, json, no_claims } => commands::cmd_page(&url, json, no_claims),
        Commands::Config { init } => commands::cmd_config(init),
    }
}
