//! DuckDuckGo provider using the Instant Answer API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// DuckDuckGo search provider.
///
/// The Instant Answer API returns an abstract plus related topics rather
/// than a classic result page; both are mapped into web results.
pub struct DuckDuckGo {
    config: ProviderConfig,
    client: Client,
    base_url: String,
}

impl DuckDuckGo {
    /// Creates a new DuckDuckGo provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "DuckDuckGo".to_string(),
                shortcut: "ddg".to_string(),
                categories: vec![Category::Web],
                relevance: 0.8,
                max_results: 6,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: "https://api.duckduckgo.com".to_string(),
        }
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct DdgResponse {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// A related topic entry.
///
/// The API mixes plain topics and nested groups in one array, so every
/// field is optional and picked over manually.
#[derive(Deserialize)]
struct RelatedTopic {
    #[serde(rename = "Text", default)]
    text: Option<String>,
    #[serde(rename = "FirstURL", default)]
    first_url: Option<String>,
    #[serde(rename = "Topics", default)]
    topics: Option<Vec<RelatedTopic>>,
}

#[async_trait]
impl Provider for DuckDuckGo {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/?q={}&format=json&no_html=1&skip_disambig=1",
            self.base_url,
            urlencoding::encode(&request.query)
        );

        let response = self.client.get(&url).send().await?;
        let ddg: DdgResponse = response.json().await?;

        let mut results = Vec::new();

        if !ddg.abstract_text.is_empty() && !ddg.abstract_url.is_empty() {
            let title = if ddg.heading.is_empty() {
                ddg.abstract_source.clone()
            } else {
                ddg.heading.clone()
            };
            results.push(self.make_result(results.len(), title, ddg.abstract_text, ddg.abstract_url));
        }

        for topic in flatten_topics(ddg.related_topics) {
            if results.len() >= self.config.max_results {
                break;
            }
            let (text, url) = topic;
            // Topic text reads "Title - description"; keep the head as title.
            let title = text.split(" - ").next().unwrap_or(&text).to_string();
            results.push(self.make_result(results.len(), title, text.clone(), url));
        }

        Ok(results)
    }
}

impl DuckDuckGo {
    fn make_result(&self, index: usize, title: String, description: String, url: String) -> SearchResult {
        let domain = url::Url::parse(&url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        SearchResult::new(
            format!("{}-{}", self.config.shortcut, index),
            title,
            description,
            url,
            &self.config.name,
        )
        .with_type(ResultType::Web)
        .with_relevance(self.config.relevance)
        .with_metadata(ResultMetadata {
            domain,
            ..Default::default()
        })
    }
}

/// Flattens the mixed topic/group array into `(text, url)` pairs.
fn flatten_topics(topics: Vec<RelatedTopic>) -> Vec<(String, String)> {
    let mut flat = Vec::new();
    for topic in topics {
        match (topic.text, topic.first_url, topic.topics) {
            (Some(text), Some(url), _) if !text.is_empty() && !url.is_empty() => {
                flat.push((text, url));
            }
            (_, _, Some(nested)) => flat.extend(flatten_topics(nested)),
            _ => {}
        }
    }
    flat
}
