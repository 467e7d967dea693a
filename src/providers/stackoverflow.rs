//! Stack Overflow provider using the Stack Exchange API.

use async_trait::async_trait;
use chrono::TimeZone;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// Stack Overflow search provider.
pub struct StackOverflow {
    config: ProviderConfig,
    client: Client,
    base_url: String,
}

impl StackOverflow {
    /// Creates a new Stack Overflow provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "Stack Overflow".to_string(),
                shortcut: "so".to_string(),
                categories: vec![Category::Code, Category::Community],
                relevance: 0.85,
                max_results: 5,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: "https://api.stackexchange.com".to_string(),
        }
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for StackOverflow {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct SoResponse {
    #[serde(default)]
    items: Vec<SoQuestion>,
}

#[derive(Deserialize)]
struct SoQuestion {
    title: String,
    link: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    answer_count: u64,
    #[serde(default)]
    creation_date: Option<i64>,
    #[serde(default)]
    owner: Option<SoOwner>,
}

#[derive(Deserialize)]
struct SoOwner {
    #[serde(default)]
    display_name: Option<String>,
}

#[async_trait]
impl Provider for StackOverflow {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/2.3/search/advanced?order=desc&sort=relevance&q={}&site=stackoverflow&pagesize={}",
            self.base_url,
            urlencoding::encode(&request.query),
            self.config.max_results
        );

        let response = self.client.get(&url).send().await?;
        let so_response: SoResponse = response.json().await?;

        let results = so_response
            .items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, question)| {
                let description = format!(
                    "{} answers, score {}",
                    question.answer_count, question.score
                );
                SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    decode_html_entities(&question.title),
                    description,
                    question.link,
                    &self.config.name,
                )
                .with_type(ResultType::Community)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    author: question.owner.and_then(|o| o.display_name),
                    domain: Some("stackoverflow.com".to_string()),
                    rating: Some(question.score as f64),
                    date: question.creation_date.and_then(epoch_to_rfc3339),
                    ..Default::default()
                })
            })
            .collect();

        Ok(results)
    }
}

/// Decodes the small set of HTML entities Stack Exchange uses in titles.
fn decode_html_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn epoch_to_rfc3339(epoch: i64) -> Option<String> {
    chrono::Utc
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
}
