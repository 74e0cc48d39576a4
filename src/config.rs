use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, WikiMoviesError};

/// Global wikimovies configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Category listing where traversal starts
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// Hosts the fetcher may contact (subdomains included)
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum delay between requests to the same host, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub download_delay_ms: u64,

    /// Connections kept open per host; requests themselves run one at a time
    #[serde(default = "default_concurrency")]
    pub concurrent_requests_per_domain: usize,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// CSV output path
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_start_url() -> String {
    "https://ru.wikipedia.org/wiki/Категория:Фильмы_по_алфавиту".to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec!["ru.wikipedia.org".to_string(), "www.wikidata.org".to_string()]
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_delay_ms() -> u64 {
    500
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout() -> u64 {
    30
}

fn default_output() -> PathBuf {
    PathBuf::from("movies.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            allowed_domains: default_allowed_domains(),
            user_agent: default_user_agent(),
            download_delay_ms: default_delay_ms(),
            concurrent_requests_per_domain: default_concurrency(),
            timeout_secs: default_timeout(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.allowed_domains.is_empty() {
            return Err(WikiMoviesError::ConfigError(
                "allowed_domains must list at least one host".into(),
            ));
        }
        if self.concurrent_requests_per_domain == 0 {
            return Err(WikiMoviesError::ConfigError(
                "concurrent_requests_per_domain must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| WikiMoviesError::ConfigError(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Supports WIKIMOVIES_CONFIG environment variable for test isolation
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("WIKIMOVIES_CONFIG") {
            return Ok(PathBuf::from(path));
        }
        let dirs = ProjectDirs::from("", "", "wikimovies").ok_or_else(|| {
            WikiMoviesError::ConfigError("Could not determine config directory".into())
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
