//! Error types for the search library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a provider response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid search input (empty query, missing field).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A mandatory credential or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Writing to the search history store failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// No providers configured.
    #[error("No search providers configured")]
    NoProviders,

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
