//! Reddit provider using the public search endpoint.

use async_trait::async_trait;
use chrono::TimeZone;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// Longest selftext excerpt carried into the result description.
const EXCERPT_LEN: usize = 200;

/// Reddit search provider.
pub struct Reddit {
    config: ProviderConfig,
    client: Client,
    base_url: String,
}

impl Reddit {
    /// Creates a new Reddit provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "Reddit".to_string(),
                shortcut: "rd".to_string(),
                categories: vec![Category::Community],
                relevance: 0.7,
                max_results: 5,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: "https://www.reddit.com".to_string(),
        }
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for Reddit {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RedditResponse {
    data: Option<RedditListing>,
}

#[derive(Deserialize)]
struct RedditListing {
    #[serde(default)]
    children: Vec<RedditChild>,
}

#[derive(Deserialize)]
struct RedditChild {
    data: RedditPost,
}

#[derive(Deserialize)]
struct RedditPost {
    title: String,
    permalink: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    ups: Option<u64>,
    #[serde(default)]
    created_utc: Option<f64>,
    #[serde(default)]
    thumbnail: Option<String>,
}

#[async_trait]
impl Provider for Reddit {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/search.json?q={}&limit={}&sort=relevance",
            self.base_url,
            urlencoding::encode(&request.query),
            self.config.max_results
        );

        let response = self.client.get(&url).send().await?;
        let reddit_response: RedditResponse = response.json().await?;

        let results = reddit_response
            .data
            .map(|listing| {
                listing
                    .children
                    .into_iter()
                    .take(self.config.max_results)
                    .enumerate()
                    .map(|(i, child)| self.map_post(i, child.data))
                    .collect()
            })
            .unwrap_or_default();

        Ok(results)
    }
}

impl Reddit {
    fn map_post(&self, index: usize, post: RedditPost) -> SearchResult {
        let url = format!("https://www.reddit.com{}", post.permalink);
        let description = if post.selftext.is_empty() {
            match &post.subreddit {
                Some(subreddit) => format!("Discussion in r/{subreddit}"),
                None => "Discussion on Reddit".to_string(),
            }
        } else {
            excerpt(&post.selftext, EXCERPT_LEN)
        };
        // Reddit uses placeholder words ("self", "default") where there is
        // no real thumbnail.
        let thumbnail = post
            .thumbnail
            .filter(|t| t.starts_with("http"));

        let mut result = SearchResult::new(
            format!("{}-{}", self.config.shortcut, index),
            post.title,
            description,
            url,
            &self.config.name,
        )
        .with_type(ResultType::Community)
        .with_relevance(self.config.relevance)
        .with_metadata(ResultMetadata {
            author: post.author,
            domain: Some("reddit.com".to_string()),
            views: post.ups,
            date: post
                .created_utc
                .and_then(|epoch| chrono::Utc.timestamp_opt(epoch as i64, 0).single())
                .map(|dt| dt.to_rfc3339()),
            ..Default::default()
        });
        if let Some(thumbnail) = thumbnail {
            result = result.with_thumbnail(thumbnail);
        }
        result
    }
}

/// Truncates at a character boundary, appending an ellipsis when shortened.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
