use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;
use ureq::ResponseExt;
use url::Url;

use crate::config::Config;
use crate::error::{Result, WikiMoviesError};

/// Content fetched from a URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// Response body (HTML or JSON)
    pub body: String,
}

/// Anything that can turn a URL into page content.
///
/// The crawl driver only talks to this trait, so tests can script responses.
pub trait Fetcher {
    fn fetch(&mut self, url: &str) -> Result<FetchedPage>;
}

/// Blocking HTTP fetcher with a domain allow-list and per-host politeness delay
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
    allowed_domains: Vec<String>,
    delay: Duration,
    last_request: HashMap<String, Instant>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .max_idle_connections_per_host(config.concurrent_requests_per_domain)
            .build()
            .into();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
            allowed_domains: config.allowed_domains.clone(),
            delay: Duration::from_millis(config.download_delay_ms),
            last_request: HashMap::new(),
        }
    }

    /// Sleep until `delay` has passed since the last request to `host`
    fn wait_for_host(&mut self, host: &str) {
        if let Some(last) = self.last_request.get(host) {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
        self.last_request.insert(host.to_string(), Instant::now());
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&mut self, url: &str) -> Result<FetchedPage> {
        let parsed = Url::parse(url)?;
        let host = parsed.host_str().unwrap_or_default().to_string();
        if !is_allowed_host(&host, &self.allowed_domains) {
            return Err(WikiMoviesError::DomainNotAllowed(host));
        }

        self.wait_for_host(&host);
        debug!(url, "fetching");

        let response = self
            .agent
            .get(parsed.as_str())
            .header("User-Agent", &self.user_agent)
            .call()?;
        let final_url = response.get_uri().to_string();
        let body = response.into_body().read_to_string()?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

/// Host matches an allowed domain exactly or as a subdomain
pub fn is_allowed_host(host: &str, allowed: &[String]) -> bool {
    !host.is_empty()
        && allowed
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{}", d)))
}
