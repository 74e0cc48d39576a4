use thiserror::Error;

#[derive(Error, Debug)]
pub enum WikiMoviesError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] ureq::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Extraction failed: {0}")]
    ExtractionError(String),

    #[error("Entity data payload unusable: {0}")]
    ClaimsPayload(String),

    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WikiMoviesError {
    /// Get an actionable hint for how to resolve this error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            WikiMoviesError::HttpError(_) => Some(
                "Check your internet connection, or raise the delay:\n  wikimovies crawl --delay-ms 2000"
            ),
            WikiMoviesError::DomainNotAllowed(_) => Some(
                "Add the host to `allowed_domains` in the config file (see `wikimovies config`)"
            ),
            WikiMoviesError::TomlError(_) | WikiMoviesError::ConfigError(_) => Some(
                "Inspect the config with `wikimovies config`, or rewrite defaults with `wikimovies config --init`"
            ),
            WikiMoviesError::CsvError(_) => Some(
                "Check that the output path is writable: wikimovies crawl --output <path>"
            ),
            WikiMoviesError::ExtractionError(_) => Some(
                "Make sure the URL points to a Russian Wikipedia article"
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WikiMoviesError>;
