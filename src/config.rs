//! Environment configuration.
//!
//! Read once at startup and injected into the service; nothing in this crate
//! reads the environment after construction.

use std::path::PathBuf;

/// Default bind address for the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Runtime configuration for the search service.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// SerpAPI key. Optional: absent means the SerpAPI providers are skipped.
    pub serp_api_key: Option<String>,
    /// GitHub token. Optional: absent means unauthenticated GitHub requests.
    pub github_token: Option<String>,
    /// LLM API key. Mandatory only for the insights endpoint.
    pub openai_api_key: Option<String>,
    /// Search history database path. Optional: absent disables persistence.
    pub db_path: Option<PathBuf>,
    /// HTTP server bind address.
    pub bind_addr: String,
}

impl Config {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            serp_api_key: read_var("SERP_API_KEY"),
            github_token: read_var("GITHUB_TOKEN"),
            openai_api_key: read_var("OPENAI_API_KEY"),
            db_path: read_var("NOVA_DB_PATH").map(PathBuf::from),
            bind_addr: read_var("NOVA_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    /// Sets the SerpAPI key.
    pub fn with_serp_api_key(mut self, key: impl Into<String>) -> Self {
        self.serp_api_key = Some(key.into());
        self
    }

    /// Sets the GitHub token.
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Sets the LLM API key.
    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Sets the database path.
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }
}

/// Reads an environment variable, treating empty values as absent.
fn read_var(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
