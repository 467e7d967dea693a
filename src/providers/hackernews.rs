//! Hacker News provider using the Algolia search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// Hacker News search provider.
pub struct HackerNews {
    config: ProviderConfig,
    client: Client,
    base_url: String,
}

impl HackerNews {
    /// Creates a new Hacker News provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "Hacker News".to_string(),
                shortcut: "hn".to_string(),
                categories: vec![Category::News, Category::Community],
                relevance: 0.75,
                max_results: 5,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: "https://hn.algolia.com".to_string(),
        }
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for HackerNews {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct HnResponse {
    #[serde(default)]
    hits: Vec<HnHit>,
}

#[derive(Deserialize)]
struct HnHit {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    points: Option<i64>,
    #[serde(default)]
    num_comments: Option<u64>,
    #[serde(default)]
    created_at: Option<String>,
}

#[async_trait]
impl Provider for HackerNews {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/api/v1/search?query={}&hitsPerPage={}",
            self.base_url,
            urlencoding::encode(&request.query),
            self.config.max_results
        );

        let response = self.client.get(&url).send().await?;
        let hn_response: HnResponse = response.json().await?;

        let results = hn_response
            .hits
            .into_iter()
            .filter(|hit| hit.title.as_deref().is_some_and(|t| !t.is_empty()))
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, hit)| {
                let discussion = format!("https://news.ycombinator.com/item?id={}", hit.object_id);
                // Link posts point at the story URL; text posts at the thread.
                let url = hit.url.filter(|u| !u.is_empty()).unwrap_or(discussion);
                let domain = url::Url::parse(&url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string));
                let description = format!(
                    "{} points, {} comments on Hacker News",
                    hit.points.unwrap_or(0),
                    hit.num_comments.unwrap_or(0)
                );
                SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    hit.title.unwrap_or_default(),
                    description,
                    url,
                    &self.config.name,
                )
                .with_type(ResultType::News)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    author: hit.author,
                    domain,
                    rating: hit.points.map(|p| p as f64),
                    date: hit.created_at,
                    ..Default::default()
                })
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hackernews_new() {
        let provider = HackerNews::new();
        assert_eq!(provider.config.name, "Hacker News");
        assert_eq!(provider.config.shortcut, "hn");
        assert_eq!(
            provider.config.categories,
            vec![Category::News, Category::Community]
        );
    }

    #[test]
    fn test_hackernews_default() {
        let provider = HackerNews::default();
        assert_eq!(provider.name(), "Hacker News");
    }

    #[test]
    fn test_hackernews_with_base_url() {
        let provider = HackerNews::new().with_base_url("http://localhost:9999");
        assert_eq!(provider.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_hn_response_deserialization() {
        let json = r#"{
            "hits": [{
                "objectID": "12345",
                "title": "Rust 1.80 released",
                "url": "https://blog.rust-lang.org/2024/07/25/Rust-1.80.0.html",
                "author": "steveklabnik",
                "points": 500,
                "num_comments": 200,
                "created_at": "2024-07-25T10:00:00Z"
            }]
        }"#;
        let response: HnResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].object_id, "12345");
        assert_eq!(response.hits[0].points, Some(500));
    }

    #[test]
    fn test_hn_response_null_url() {
        let json = r#"{
            "hits": [{
                "objectID": "678",
                "title": "Ask HN: Favorite crate?",
                "url": null,
                "author": "someone",
                "points": 10
            }]
        }"#;
        let response: HnResponse = serde_json::from_str(json).unwrap();
        assert!(response.hits[0].url.is_none());
    }

    #[test]
    fn test_hn_response_empty() {
        let response: HnResponse = serde_json::from_str("{}").unwrap();
        assert!(response.hits.is_empty());
    }

    #[test]
    fn test_hn_response_missing_title() {
        // Comment hits carry no title; the adapter filters them out.
        let json = r#"{"hits": [{"objectID": "9", "title": null}]}"#;
        let response: HnResponse = serde_json::from_str(json).unwrap();
        assert!(response.hits[0].title.is_none());
    }
}
