//! Crawl driver: category pages -> movie pages -> optional entity data -> sink.
//!
//! Each movie page runs through its own isolated pipeline. A failure on one
//! page is logged and counted; it never stops the crawl. Only sink errors
//! propagate, since they mean the output itself is broken.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::category::parse_category_page;
use crate::claims::{entity_data_url, resolve_payload};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::normalize::finalize;
use crate::page::{parse_movie_page, PageOutcome, SkipReason};
use crate::record::MovieRecord;

/// Knobs for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Stop after this many emitted records
    pub limit: Option<usize>,
    /// Look up entity data for incomplete records
    pub resolve_claims: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            limit: None,
            resolve_claims: true,
        }
    }
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Category listing pages fetched
    pub pages: usize,
    /// Movie pages fetched
    pub movies: usize,
    pub emitted: usize,
    /// Pages without a title or movie cue
    pub skipped: usize,
    pub claims_lookups: usize,
    /// Fetch failures and unusable entity payloads
    pub errors: usize,
    /// Records dropped because their URL was already emitted
    pub duplicates: usize,
}

/// Tracks which page URLs already produced a record
#[derive(Debug, Default)]
pub struct EmissionLedger {
    emitted: HashSet<String>,
}

impl EmissionLedger {
    pub fn contains(&self, url: &str) -> bool {
        self.emitted.contains(url)
    }

    /// Returns false if `url` was already recorded
    pub fn record(&mut self, url: &str) -> bool {
        self.emitted.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

pub struct Crawler<F: Fetcher> {
    fetcher: F,
    options: CrawlOptions,
    stop: Arc<AtomicBool>,
    ledger: EmissionLedger,
    stats: CrawlStats,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, options: CrawlOptions) -> Self {
        Self {
            fetcher,
            options,
            stop: Arc::new(AtomicBool::new(false)),
            ledger: EmissionLedger::default(),
            stats: CrawlStats::default(),
        }
    }

    /// Share a flag that ends the crawl between pages when set
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
            || self
                .options
                .limit
                .is_some_and(|limit| self.stats.emitted >= limit)
    }

    /// Walk the category starting at `start_url` until no next page remains.
    ///
    /// `emit` receives each finalized record exactly once per page URL.
    pub fn run<E>(&mut self, start_url: &str, mut emit: E) -> Result<CrawlStats>
    where
        E: FnMut(&MovieRecord) -> Result<()>,
    {
        let mut visited_listings = HashSet::new();
        let mut next = Some(start_url.to_string());

        while let Some(listing_url) = next.take() {
            if self.should_stop() {
                break;
            }
            if !visited_listings.insert(listing_url.clone()) {
                warn!(url = %listing_url, "pagination loop detected");
                break;
            }

            let page = match self.fetcher.fetch(&listing_url) {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %listing_url, error = %e, "category page fetch failed");
                    self.stats.errors += 1;
                    break;
                }
            };
            self.stats.pages += 1;

            let listing = parse_category_page(&page.url, &page.body);
            info!(
                url = %listing_url,
                movies = listing.movies.len(),
                "category page parsed"
            );

            for link in &listing.movies {
                if self.should_stop() {
                    break;
                }
                if self.ledger.contains(&link.url) {
                    self.stats.duplicates += 1;
                    continue;
                }

                let record = match self.fetch_movie(&link.url, Some(&link.title)) {
                    Ok(Some(record)) => record,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(url = %link.url, error = %e, "movie page fetch failed");
                        self.stats.errors += 1;
                        continue;
                    }
                };

                // Redirects can land two listing links on one article
                let fresh = self.ledger.record(&record.wiki_url);
                self.ledger.record(&link.url);
                if !fresh {
                    debug!(url = %record.wiki_url, "already emitted");
                    self.stats.duplicates += 1;
                    continue;
                }

                emit(&record)?;
                self.stats.emitted += 1;
            }

            next = listing.next_page;
        }

        info!(
            pages = self.stats.pages,
            emitted = self.stats.emitted,
            errors = self.stats.errors,
            "crawl finished"
        );
        Ok(self.stats.clone())
    }

    /// Fetch one movie page and build its finalized record.
    ///
    /// `Ok(None)` means the page is not a movie. Only the article fetch itself
    /// can fail; entity-data problems fall back to the infobox fields.
    pub fn fetch_movie(
        &mut self,
        url: &str,
        link_title: Option<&str>,
    ) -> Result<Option<MovieRecord>> {
        let page = self.fetcher.fetch(url)?;
        self.stats.movies += 1;

        let mut record = match parse_movie_page(&page.url, &page.body, link_title) {
            PageOutcome::Skip(reason) => {
                self.stats.skipped += 1;
                match reason {
                    SkipReason::NoTitle => debug!(url, "skipped: no title"),
                    SkipReason::NoMovieCue => debug!(url, "skipped: not a movie page"),
                }
                return Ok(None);
            }
            PageOutcome::Ready(record) => record,
            PageOutcome::NeedsClaims { mut record, qid } => {
                if self.options.resolve_claims {
                    self.fill_from_entity(&qid, &mut record);
                }
                record
            }
        };

        finalize(&mut record);
        Ok(Some(record))
    }

    /// One entity-data lookup; any failure leaves the record as it was
    fn fill_from_entity(&mut self, qid: &str, record: &mut MovieRecord) {
        self.stats.claims_lookups += 1;
        let url = entity_data_url(qid);
        let outcome = self
            .fetcher
            .fetch(&url)
            .and_then(|page| resolve_payload(&page.body, qid, record));

        if let Err(e) = outcome {
            warn!(qid, error = %e, "entity data unavailable, keeping infobox fields");
            self.stats.errors += 1;
        }
    }
}
