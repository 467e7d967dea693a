//! Search provider trait and configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Category, Result, SearchRequest, SearchResult};

/// Configuration for a search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name of the provider (used as `SearchResult::source`).
    pub name: String,
    /// Short identifier (e.g., "gh" for GitHub), used for result ids.
    pub shortcut: String,
    /// Categories this provider serves.
    pub categories: Vec<Category>,
    /// Fixed relevance score assigned to every result from this provider.
    #[serde(default = "default_relevance")]
    pub relevance: f64,
    /// Maximum number of results taken from this provider.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Whether the provider is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_relevance() -> f64 {
    0.5
}

fn default_max_results() -> usize {
    5
}

fn default_timeout() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            shortcut: String::new(),
            categories: vec![Category::Web],
            relevance: 0.5,
            max_results: 5,
            timeout: 5,
            enabled: true,
        }
    }
}

/// Trait for implementing search providers.
///
/// Each provider translates one external API's native response into the
/// shared [`SearchResult`] shape. Providers share no mutable state and are
/// invoked concurrently by the dispatcher.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider configuration.
    fn config(&self) -> &ProviderConfig;

    /// Performs a search and returns results.
    ///
    /// Errors returned here are contained by the dispatcher: they degrade
    /// this provider's contribution to empty, never the whole search.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>>;

    /// Returns the provider name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns the provider shortcut.
    fn shortcut(&self) -> &str {
        &self.config().shortcut
    }

    /// Returns the fixed relevance score for this provider's results.
    fn relevance(&self) -> f64 {
        self.config().relevance
    }

    /// Returns whether the provider is enabled.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }

    /// Returns whether the provider serves the requested category.
    fn serves(&self, category: Category) -> bool {
        category == Category::All || self.config().categories.contains(&category)
    }
}
