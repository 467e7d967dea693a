//! Search result types.

use serde::{Deserialize, Serialize};

/// Type of search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Standard web result.
    Web,
    /// Video result.
    Video,
    /// News article.
    News,
    /// Image result.
    Image,
    /// Source code or repository.
    Code,
    /// Academic paper.
    Academic,
    /// Forum or Q&A discussion.
    Community,
    /// Software tool or service.
    Tool,
    /// Dataset.
    Data,
    /// Encyclopedia or long-form article.
    Article,
}

impl Default for ResultType {
    fn default() -> Self {
        Self::Web
    }
}

fn default_relevance() -> f64 {
    0.5
}

/// Optional per-result metadata supplied by providers.
///
/// Fields a provider does not report are left absent and skipped during
/// serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Publication or last-update date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Author, channel, or owner name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Host domain of the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// View/star/upvote count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Provider-reported rating or score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// A single search result.
///
/// Immutable once constructed. The `id` is unique within one aggregated
/// response only, never globally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Identifier within one aggregated response (`<shortcut>-<index>`).
    pub id: String,
    /// Result title.
    pub title: String,
    /// Result description/snippet.
    pub description: String,
    /// Result URL.
    pub url: String,
    /// Type of result.
    #[serde(rename = "type", default)]
    pub result_type: ResultType,
    /// Name of the provider that returned this result.
    pub source: String,
    /// Fixed per-provider relevance score used as the sort tiebreaker.
    #[serde(default = "default_relevance")]
    pub relevance: f64,
    /// Thumbnail URL (for images/videos).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Optional provider-supplied metadata.
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl SearchResult {
    /// Creates a new search result.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            url: url.into(),
            result_type: ResultType::Web,
            source: source.into(),
            relevance: 0.5,
            thumbnail: None,
            metadata: ResultMetadata::default(),
        }
    }

    /// Sets the result type.
    pub fn with_type(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        self
    }

    /// Sets the relevance score.
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance;
        self
    }

    /// Sets the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Sets the metadata block.
    pub fn with_metadata(mut self, metadata: ResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the deduplication key: the exact `(title, url)` pair.
    pub fn dedupe_key(&self) -> (String, String) {
        (self.title.clone(), self.url.clone())
    }
}

/// Container for one aggregated search response.
///
/// Created once per request and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResponse {
    /// The original query string.
    pub query: String,
    /// Merged, deduplicated, truncated results in priority order.
    pub results: Vec<SearchResult>,
    /// Number of distinct results computed before truncation.
    pub total: usize,
    /// Providers that contributed to `results`, in result order.
    pub sources: Vec<String>,
    /// ISO-8601 creation timestamp.
    pub timestamp: String,
}

impl AggregatedResponse {
    /// Builds a response, deriving `sources` from the result list.
    pub fn new(query: impl Into<String>, results: Vec<SearchResult>, total: usize) -> Self {
        let mut sources: Vec<String> = Vec::new();
        for result in &results {
            if !sources.contains(&result.source) {
                sources.push(result.source.clone());
            }
        }
        Self {
            query: query.into(),
            results,
            total,
            sources,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
