//! SerpAPI providers: one sub-engine per instance.
//!
//! SerpAPI exposes many Google-family engines behind a single endpoint.
//! Each [`SerpApi`] instance wraps exactly one sub-engine, so the dispatcher
//! treats them as independent providers with their own category, priority
//! and result cap. All of them require the SerpAPI key; without one they are
//! never registered.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Category, Provider, ProviderConfig, Result, ResultMetadata, ResultType, SearchRequest,
    SearchResult,
};

/// SerpAPI sub-engine selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerpEngine {
    /// Google organic web results.
    Web,
    /// Google News.
    News,
    /// YouTube videos.
    Videos,
    /// Google Images.
    Images,
    /// Google Scholar.
    Scholar,
}

/// One SerpAPI sub-engine as a search provider.
pub struct SerpApi {
    config: ProviderConfig,
    client: Client,
    engine: SerpEngine,
    api_key: String,
    base_url: String,
}

impl SerpApi {
    fn build(engine: SerpEngine, api_key: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            config,
            client: Client::builder()
                .user_agent(super::USER_AGENT)
                .build()
                .expect("Failed to create HTTP client"),
            engine,
            api_key: api_key.into(),
            base_url: "https://serpapi.com".to_string(),
        }
    }

    /// Google web search.
    pub fn web(api_key: impl Into<String>) -> Self {
        Self::build(
            SerpEngine::Web,
            api_key,
            ProviderConfig {
                name: "Google".to_string(),
                shortcut: "web".to_string(),
                categories: vec![Category::Web],
                relevance: 0.95,
                max_results: 8,
                timeout: 8,
                enabled: true,
            },
        )
    }

    /// Google News search.
    pub fn news(api_key: impl Into<String>) -> Self {
        Self::build(
            SerpEngine::News,
            api_key,
            ProviderConfig {
                name: "Google News".to_string(),
                shortcut: "news".to_string(),
                categories: vec![Category::News],
                relevance: 0.9,
                max_results: 6,
                timeout: 8,
                enabled: true,
            },
        )
    }

    /// YouTube video search.
    pub fn videos(api_key: impl Into<String>) -> Self {
        Self::build(
            SerpEngine::Videos,
            api_key,
            ProviderConfig {
                name: "YouTube".to_string(),
                shortcut: "video".to_string(),
                categories: vec![Category::Video],
                relevance: 0.85,
                max_results: 6,
                timeout: 8,
                enabled: true,
            },
        )
    }

    /// Google Images search.
    pub fn images(api_key: impl Into<String>) -> Self {
        Self::build(
            SerpEngine::Images,
            api_key,
            ProviderConfig {
                name: "Google Images".to_string(),
                shortcut: "image".to_string(),
                categories: vec![Category::Image],
                relevance: 0.8,
                max_results: 4,
                timeout: 8,
                enabled: true,
            },
        )
    }

    /// Google Scholar search.
    pub fn scholar(api_key: impl Into<String>) -> Self {
        Self::build(
            SerpEngine::Scholar,
            api_key,
            ProviderConfig {
                name: "Google Scholar".to_string(),
                shortcut: "academic".to_string(),
                categories: vec![Category::Academic],
                relevance: 0.75,
                max_results: 3,
                timeout: 8,
                enabled: true,
            },
        )
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, query: &str) -> String {
        let q = urlencoding::encode(query);
        let key = &self.api_key;
        let num = self.config.max_results;
        match self.engine {
            SerpEngine::Web => format!(
                "{}/search.json?engine=google&q={q}&api_key={key}&num={num}",
                self.base_url
            ),
            SerpEngine::News => format!(
                "{}/search.json?engine=google_news&q={q}&api_key={key}&num={num}",
                self.base_url
            ),
            SerpEngine::Videos => format!(
                "{}/search.json?engine=youtube&search_query={q}&api_key={key}",
                self.base_url
            ),
            SerpEngine::Images => format!(
                "{}/search.json?engine=google&tbm=isch&q={q}&api_key={key}&num={num}",
                self.base_url
            ),
            SerpEngine::Scholar => format!(
                "{}/search.json?engine=google_scholar&q={q}&api_key={key}&num={num}",
                self.base_url
            ),
        }
    }
}

#[derive(Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    news_results: Vec<NewsResult>,
    #[serde(default)]
    video_results: Vec<VideoResult>,
    #[serde(default)]
    images_results: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    publication_info: Option<PublicationInfo>,
}

#[derive(Deserialize)]
struct PublicationInfo {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    authors: Vec<PublicationAuthor>,
}

#[derive(Deserialize)]
struct PublicationAuthor {
    name: String,
}

#[derive(Deserialize)]
struct NewsResult {
    #[serde(default)]
    title: Option<String>,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    source: Option<NewsSource>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// News `source` appears as either a plain string or an object with a name.
#[derive(Deserialize)]
#[serde(untagged)]
enum NewsSource {
    Name(String),
    Detailed { name: String },
}

impl NewsSource {
    fn name(&self) -> &str {
        match self {
            NewsSource::Name(name) => name,
            NewsSource::Detailed { name } => name,
        }
    }
}

#[derive(Deserialize)]
struct VideoResult {
    #[serde(default)]
    title: Option<String>,
    link: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnail: Option<VideoThumbnail>,
    #[serde(default)]
    channel: Option<VideoChannel>,
    #[serde(default)]
    views: Option<u64>,
    #[serde(default)]
    published_date: Option<String>,
}

#[derive(Deserialize)]
struct VideoThumbnail {
    #[serde(rename = "static", default)]
    static_url: Option<String>,
}

#[derive(Deserialize)]
struct VideoChannel {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ImageResult {
    #[serde(default)]
    title: Option<String>,
    original: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

#[async_trait]
impl Provider for SerpApi {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        let url = self.request_url(&request.query);
        let response = self.client.get(&url).send().await?;
        let serp: SerpResponse = response.json().await?;

        let results = match self.engine {
            SerpEngine::Web => self.map_organic(serp.organic_results, ResultType::Web),
            SerpEngine::Scholar => self.map_organic(serp.organic_results, ResultType::Academic),
            SerpEngine::News => self.map_news(serp.news_results),
            SerpEngine::Videos => self.map_videos(serp.video_results),
            SerpEngine::Images => self.map_images(serp.images_results),
        };

        Ok(results)
    }
}

impl SerpApi {
    fn map_organic(&self, items: Vec<OrganicResult>, result_type: ResultType) -> Vec<SearchResult> {
        items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, item)| {
                let title = item.title.unwrap_or_else(|| "Web Result".to_string());
                let description = item.snippet.unwrap_or_else(|| title.clone());
                let domain = url::Url::parse(&item.link)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string));
                let (author, date) = match item.publication_info {
                    Some(info) => (
                        info.authors.into_iter().next().map(|a| a.name),
                        info.summary.or(item.date),
                    ),
                    None => (None, item.date),
                };
                SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    title,
                    description,
                    item.link,
                    &self.config.name,
                )
                .with_type(result_type)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    domain,
                    author,
                    date,
                    ..Default::default()
                })
            })
            .collect()
    }

    fn map_news(&self, items: Vec<NewsResult>) -> Vec<SearchResult> {
        items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, item)| {
                let title = item.title.unwrap_or_else(|| "News Article".to_string());
                let description = item.snippet.unwrap_or_else(|| title.clone());
                let author = item.source.as_ref().map(|s| s.name().to_string());
                let mut result = SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    title,
                    description,
                    item.link,
                    &self.config.name,
                )
                .with_type(ResultType::News)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    author,
                    date: item.date,
                    ..Default::default()
                });
                if let Some(thumbnail) = item.thumbnail {
                    result = result.with_thumbnail(thumbnail);
                }
                result
            })
            .collect()
    }

    fn map_videos(&self, items: Vec<VideoResult>) -> Vec<SearchResult> {
        items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, item)| {
                let title = item.title.unwrap_or_else(|| "Video".to_string());
                let description = item.description.unwrap_or_else(|| title.clone());
                let mut result = SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    title,
                    description,
                    item.link,
                    &self.config.name,
                )
                .with_type(ResultType::Video)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    author: item.channel.and_then(|c| c.name),
                    views: item.views,
                    date: item.published_date,
                    ..Default::default()
                });
                if let Some(thumbnail) = item.thumbnail.and_then(|t| t.static_url) {
                    result = result.with_thumbnail(thumbnail);
                }
                result
            })
            .collect()
    }

    fn map_images(&self, items: Vec<ImageResult>) -> Vec<SearchResult> {
        items
            .into_iter()
            .take(self.config.max_results)
            .enumerate()
            .map(|(i, item)| {
                let title = item.title.unwrap_or_else(|| "Image".to_string());
                let mut result = SearchResult::new(
                    format!("{}-{}", self.config.shortcut, i),
                    title.clone(),
                    title,
                    item.original,
                    &self.config.name,
                )
                .with_type(ResultType::Image)
                .with_relevance(self.config.relevance)
                .with_metadata(ResultMetadata {
                    domain: item.source,
                    ..Default::default()
                });
                if let Some(thumbnail) = item.thumbnail {
                    result = result.with_thumbnail(thumbnail);
                }
                result
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serpapi_web_config() {
        let provider = SerpApi::web("key");
        assert_eq!(provider.name(), "Google");
        assert_eq!(provider.engine, SerpEngine::Web);
        assert_eq!(provider.config.categories, vec![Category::Web]);
        assert_eq!(provider.config.max_results, 8);
    }

    #[test]
    fn test_serpapi_news_config() {
        let provider = SerpApi::news("key");
        assert_eq!(provider.name(), "Google News");
        assert_eq!(provider.config.categories, vec![Category::News]);
    }

    #[test]
    fn test_serpapi_videos_config() {
        let provider = SerpApi::videos("key");
        assert_eq!(provider.name(), "YouTube");
        assert_eq!(provider.config.categories, vec![Category::Video]);
    }

    #[test]
    fn test_serpapi_images_config() {
        let provider = SerpApi::images("key");
        assert_eq!(provider.name(), "Google Images");
        assert_eq!(provider.config.max_results, 4);
    }

    #[test]
    fn test_serpapi_scholar_config() {
        let provider = SerpApi::scholar("key");
        assert_eq!(provider.name(), "Google Scholar");
        assert_eq!(provider.config.categories, vec![Category::Academic]);
        assert_eq!(provider.config.max_results, 3);
    }

    #[test]
    fn test_request_url_web() {
        let provider = SerpApi::web("secret").with_base_url("http://localhost:1");
        let url = provider.request_url("rust lang");
        assert!(url.starts_with("http://localhost:1/search.json?engine=google&q=rust%20lang"));
        assert!(url.contains("api_key=secret"));
        assert!(url.contains("num=8"));
    }

    #[test]
    fn test_request_url_videos_uses_search_query_param() {
        let provider = SerpApi::videos("secret").with_base_url("http://localhost:1");
        let url = provider.request_url("rust");
        assert!(url.contains("engine=youtube"));
        assert!(url.contains("search_query=rust"));
    }

    #[test]
    fn test_request_url_images_uses_tbm() {
        let provider = SerpApi::images("secret").with_base_url("http://localhost:1");
        let url = provider.request_url("rust");
        assert!(url.contains("tbm=isch"));
    }

    #[test]
    fn test_map_organic_defaults_missing_title() {
        let provider = SerpApi::web("key");
        let results = provider.map_organic(
            vec![OrganicResult {
                title: None,
                link: "https://example.com/page".to_string(),
                snippet: None,
                date: None,
                publication_info: None,
            }],
            ResultType::Web,
        );
        assert_eq!(results[0].title, "Web Result");
        assert_eq!(results[0].description, "Web Result");
        assert_eq!(results[0].metadata.domain, Some("example.com".to_string()));
    }

    #[test]
    fn test_map_organic_scholar_publication_info() {
        let provider = SerpApi::scholar("key");
        let results = provider.map_organic(
            vec![OrganicResult {
                title: Some("A Paper".to_string()),
                link: "https://dl.acm.org/paper".to_string(),
                snippet: Some("Abstract".to_string()),
                date: None,
                publication_info: Some(PublicationInfo {
                    summary: Some("J Smith - 2023".to_string()),
                    authors: vec![PublicationAuthor {
                        name: "J Smith".to_string(),
                    }],
                }),
            }],
            ResultType::Academic,
        );
        assert_eq!(results[0].result_type, ResultType::Academic);
        assert_eq!(results[0].metadata.author, Some("J Smith".to_string()));
        assert_eq!(results[0].metadata.date, Some("J Smith - 2023".to_string()));
    }

    #[test]
    fn test_map_news_source_variants() {
        let provider = SerpApi::news("key");
        let results = provider.map_news(vec![
            NewsResult {
                title: Some("Plain".to_string()),
                link: "https://news.example.com/1".to_string(),
                snippet: None,
                source: Some(NewsSource::Name("The Paper".to_string())),
                thumbnail: None,
                date: None,
            },
            NewsResult {
                title: Some("Detailed".to_string()),
                link: "https://news.example.com/2".to_string(),
                snippet: None,
                source: Some(NewsSource::Detailed {
                    name: "The Other Paper".to_string(),
                }),
                thumbnail: Some("https://news.example.com/t.jpg".to_string()),
                date: Some("today".to_string()),
            },
        ]);
        assert_eq!(results[0].metadata.author, Some("The Paper".to_string()));
        assert_eq!(results[1].metadata.author, Some("The Other Paper".to_string()));
        assert_eq!(
            results[1].thumbnail,
            Some("https://news.example.com/t.jpg".to_string())
        );
    }

    #[test]
    fn test_map_videos() {
        let provider = SerpApi::videos("key");
        let results = provider.map_videos(vec![VideoResult {
            title: Some("Rust in 100 seconds".to_string()),
            link: "https://youtube.com/watch?v=abc".to_string(),
            description: None,
            thumbnail: Some(VideoThumbnail {
                static_url: Some("https://i.ytimg.com/t.jpg".to_string()),
            }),
            channel: Some(VideoChannel {
                name: Some("Fireship".to_string()),
            }),
            views: Some(1_000_000),
            published_date: Some("1 year ago".to_string()),
        }]);
        assert_eq!(results[0].result_type, ResultType::Video);
        assert_eq!(results[0].metadata.author, Some("Fireship".to_string()));
        assert_eq!(results[0].metadata.views, Some(1_000_000));
        assert_eq!(results[0].thumbnail, Some("https://i.ytimg.com/t.jpg".to_string()));
    }

    #[test]
    fn test_map_images() {
        let provider = SerpApi::images("key");
        let results = provider.map_images(vec![ImageResult {
            title: None,
            original: "https://example.com/full.png".to_string(),
            thumbnail: Some("https://example.com/thumb.png".to_string()),
            source: Some("example.com".to_string()),
        }]);
        assert_eq!(results[0].title, "Image");
        assert_eq!(results[0].url, "https://example.com/full.png");
        assert_eq!(results[0].metadata.domain, Some("example.com".to_string()));
    }

    #[test]
    fn test_map_respects_max_results() {
        let provider = SerpApi::scholar("key"); // cap 3
        let items: Vec<OrganicResult> = (0..10)
            .map(|i| OrganicResult {
                title: Some(format!("Paper {i}")),
                link: format!("https://example.com/{i}"),
                snippet: None,
                date: None,
                publication_info: None,
            })
            .collect();
        let results = provider.map_organic(items, ResultType::Academic);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_serp_response_empty() {
        let response: SerpResponse = serde_json::from_str("{}").unwrap();
        assert!(response.organic_results.is_empty());
        assert!(response.news_results.is_empty());
        assert!(response.video_results.is_empty());
        assert!(response.images_results.is_empty());
    }
}
