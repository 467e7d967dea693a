//! GitHub provider using the repository search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// GitHub repository search provider.
///
/// Works unauthenticated within GitHub's anonymous rate limits; a token
/// raises the limit but is never required.
pub struct GitHub {
    config: ProviderConfig,
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl GitHub {
    /// Creates a new GitHub provider.
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                name: "GitHub".to_string(),
                shortcut: "gh".to_string(),
                categories: vec![Category::Code],
                relevance: 0.9,
                max_results: 5,
                timeout: 5,
                enabled: true,
            },
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            token: None,
            base_url: "https://api.github.com".to_string(),
        }
    }

    /// Sets an access token for authenticated requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for GitHub {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RepoSearchResponse {
    #[serde(default)]
    items: Vec<Repo>,
}

#[derive(Deserialize)]
struct Repo {
    full_name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    owner: Option<RepoOwner>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Deserialize)]
struct RepoOwner {
    login: String,
}

#[async_trait]
impl Provider for GitHub {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/search/repositories?q={}&sort=stars&order=desc&per_page={}",
            self.base_url,
            urlencoding::encode(&request.query),
            self.config.max_results
        );

        let mut http_request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await?;
        let repos: RepoSearchResponse = response.json().await?;

        let results = repos
            .items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, repo)| {
                let description = repo
                    .description
                    .unwrap_or_else(|| format!("{} on GitHub", repo.full_name));
                SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    repo.full_name,
                    description,
                    repo.html_url,
                    &self.config.name,
                )
                .with_type(ResultType::Code)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    author: repo.owner.map(|o| o.login),
                    domain: Some("github.com".to_string()),
                    views: Some(repo.stargazers_count),
                    date: repo.updated_at,
                    ..Default::default()
                })
            })
            .collect();

        Ok(results)
    }
}
