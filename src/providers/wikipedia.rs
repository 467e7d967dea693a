//! Wikipedia search provider using the MediaWiki API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// Wikipedia search provider.
pub struct Wikipedia {
    config: ProviderConfig,
    client: Client,
    language: String,
    base_url: Option<String>,
}

impl Wikipedia {
    /// Creates a new Wikipedia provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "Wikipedia".to_string(),
                shortcut: "wiki".to_string(),
                categories: vec![Category::Web],
                relevance: 0.85,
                max_results: 5,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            language: "en".to_string(),
            base_url: None,
        }
    }

    /// Sets the Wikipedia language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn api_base(&self) -> String {
        match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{}.wikipedia.org", self.language),
        }
    }
}

impl Default for Wikipedia {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Deserialize)]
struct WikiQuery {
    search: Vec<WikiSearchResult>,
}

#[derive(Deserialize)]
struct WikiSearchResult {
    title: String,
    snippet: String,
    #[serde(default)]
    timestamp: Option<String>,
}

#[async_trait]
impl Provider for Wikipedia {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/w/api.php?action=query&list=search&srsearch={}&format=json&srlimit={}",
            self.api_base(),
            urlencoding::encode(&request.query),
            self.config.max_results
        );

        let response = self.client.get(&url).send().await?;
        let wiki_response: WikiResponse = response.json().await?;

        let results = wiki_response
            .query
            .map(|q| {
                q.search
                    .into_iter()
                    .take(self.config.max_results)
                    .enumerate()
                    .map(|(i, item)| {
                        let url = format!(
                            "https://{}.wikipedia.org/wiki/{}",
                            self.language,
                            item.title.replace(' ', "_")
                        );
                        let description = strip_html_tags(&item.snippet);
                        SearchResult::new(
                            format!("{}-{}", self.config.shortcut, i),
                            item.title,
                            description,
                            url,
                            &self.config.name,
                        )
                        .with_type(ResultType::Article)
                        .with_relevance(self.config.relevance)
                        .with_metadata(ResultMetadata {
                            date: item.timestamp,
                            domain: Some(format!("{}.wikipedia.org", self.language)),
                            ..Default::default()
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}
