//! Search orchestration.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::merge::Merger;
use crate::providers::{
    DuckDuckGo, GitHub, HackerNews, Reddit, SerpApi, StackOverflow, Wikipedia,
};
use crate::store::{SearchRecord, SearchStore, SqliteStore};
use crate::{AggregatedResponse, Provider, Result, SearchError, SearchRequest};

/// Aggregating search service: fan-out, merge, best-effort persistence.
pub struct SearchService {
    providers: Vec<Arc<dyn Provider>>,
    merger: Merger,
    store: Option<Arc<dyn SearchStore>>,
}

impl SearchService {
    /// Creates an empty service with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            merger: Merger::new(),
            store: None,
        }
    }

    /// Builds a service with the default provider set for `config`.
    ///
    /// Key-gated providers are registered only when their credential is
    /// present; the rest degrade to unauthenticated or are skipped.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut service = Self::new();

        service.add_provider(DuckDuckGo::new());
        service.add_provider(Wikipedia::new());
        service.add_provider(match &config.github_token {
            Some(token) => GitHub::new().with_token(token),
            None => GitHub::new(),
        });
        service.add_provider(StackOverflow::new());
        service.add_provider(HackerNews::new());
        service.add_provider(Reddit::new());

        match &config.serp_api_key {
            Some(key) => {
                service.add_provider(SerpApi::web(key));
                service.add_provider(SerpApi::news(key));
                service.add_provider(SerpApi::videos(key));
                service.add_provider(SerpApi::images(key));
                service.add_provider(SerpApi::scholar(key));
            }
            None => debug!("SERP_API_KEY not set, skipping SerpAPI providers"),
        }

        if let Some(path) = &config.db_path {
            service.set_store(SqliteStore::open(path)?);
        } else {
            debug!("NOVA_DB_PATH not set, search history disabled");
        }

        Ok(service)
    }

    /// Adds a search provider.
    pub fn add_provider<P: Provider + 'static>(&mut self, provider: P) {
        self.providers.push(Arc::new(provider));
    }

    /// Sets the search history store.
    pub fn set_store<S: SearchStore + 'static>(&mut self, store: S) {
        self.store = Some(Arc::new(store));
    }

    /// Returns the number of configured providers.
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Performs an aggregated search.
    ///
    /// Validates the query, fans out to every selected provider, merges the
    /// settled outcomes, records the search (best-effort), and returns the
    /// response. Provider failures degrade to a sparser result set; only
    /// input validation and a fully unconfigured service produce errors.
    pub async fn search(&self, request: SearchRequest) -> Result<AggregatedResponse> {
        if self.providers.is_empty() {
            return Err(SearchError::NoProviders);
        }

        let selected = self.select_providers(&request);
        debug!(
            "Searching {} of {} providers for category '{}'",
            selected.len(),
            self.providers.len(),
            request.category.as_str()
        );

        let outcomes = dispatch(&selected, &request).await?;
        let merged = self.merger.merge(outcomes, request.limit);
        let response = AggregatedResponse::new(request.query.clone(), merged.results, merged.total);

        self.persist(&request, &response);

        Ok(response)
    }

    /// Selects enabled providers serving the requested category.
    fn select_providers(&self, request: &SearchRequest) -> Vec<Arc<dyn Provider>> {
        self.providers
            .iter()
            .filter(|provider| provider.is_enabled() && provider.serves(request.category))
            .cloned()
            .collect()
    }

    /// Best-effort write to the search history store.
    fn persist(&self, request: &SearchRequest, response: &AggregatedResponse) {
        let Some(store) = &self.store else {
            return;
        };
        let record = SearchRecord {
            query: &request.query,
            results: &response.results,
            source: request.category.as_str(),
            user_session: request.session_id.as_deref(),
        };
        if let Err(e) = store.record_search(&record) {
            warn!("Failed to record search: {}", e);
        }
    }
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ProviderConfig, SearchResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockProvider {
        config: ProviderConfig,
        results: Vec<SearchResult>,
    }

    impl MockProvider {
        fn new(name: &str, results: Vec<SearchResult>) -> Self {
            Self {
                config: ProviderConfig {
                    name: name.to_string(),
                    shortcut: name.to_string(),
                    categories: vec![Category::Web],
                    ..Default::default()
                },
                results,
            }
        }

        fn with_category(mut self, category: Category) -> Self {
            self.config.categories = vec![category];
            self
        }

        fn disabled(mut self) -> Self {
            self.config.enabled = false;
            self
        }
    }

    #[async_trait]
    impl Provider for MockProvider {
        fn config(&self) -> &ProviderConfig {
            &self.config
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchResult>> {
            Ok(self.results.clone())
        }
    }

    struct FailingProvider {
        config: ProviderConfig,
    }

    impl FailingProvider {
        fn new(name: &str) -> Self {
            Self {
                config: ProviderConfig {
                    name: name.to_string(),
                    shortcut: name.to_string(),
                    ..Default::default()
                },
            }
        }
    }

    #[async_trait]
    impl Provider for FailingProvider {
        fn config(&self) -> &ProviderConfig {
            &self.config
        }

        async fn search(&self, _request: &SearchRequest) -> Result<Vec<SearchResult>> {
            Err(SearchError::Other("provider failed".to_string()))
        }
    }

    /// Store that counts writes and can be told to fail.
    struct CountingStore {
        writes: AtomicUsize,
        fail: bool,
        last_query: Mutex<Option<String>>,
    }

    impl CountingStore {
        fn new(fail: bool) -> Self {
            Self {
                writes: AtomicUsize::new(0),
                fail,
                last_query: Mutex::new(None),
            }
        }
    }

    impl SearchStore for Arc<CountingStore> {
        fn record_search(&self, record: &SearchRecord<'_>) -> Result<()> {
            if self.fail {
                return Err(SearchError::Persistence("write refused".to_string()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(record.query.to_string());
            Ok(())
        }
    }

    fn result(id: &str, title: &str, url: &str, source: &str) -> SearchResult {
        SearchResult::new(id, title, "description", url, source)
    }

    #[tokio::test]
    async fn test_search_no_providers() {
        let service = SearchService::new();
        let outcome = service.search(SearchRequest::new("test")).await;
        assert!(matches!(outcome, Err(SearchError::NoProviders)));
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new("one", vec![]));
        let outcome = service.search(SearchRequest::new("  ")).await;
        assert!(matches!(outcome, Err(SearchError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn test_search_aggregates_and_orders() {
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new(
            "Wikipedia",
            vec![result(
                "wiki-0",
                "Rust (programming language)",
                "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                "Wikipedia",
            )],
        ));
        service.add_provider(MockProvider::new(
            "GitHub",
            vec![result(
                "gh-0",
                "rust-lang/rust",
                "https://github.com/rust-lang/rust",
                "GitHub",
            )],
        ));

        let response = service.search(SearchRequest::new("rust")).await.unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.total, 2);
        // GitHub outranks Wikipedia in the priority table.
        assert_eq!(response.sources, vec!["GitHub", "Wikipedia"]);
        assert_eq!(response.results[0].id, "gh-0");
        assert_eq!(response.query, "rust");
    }

    #[tokio::test]
    async fn test_search_all_providers_fail_returns_empty() {
        let mut service = SearchService::new();
        service.add_provider(FailingProvider::new("f1"));
        service.add_provider(FailingProvider::new("f2"));

        let response = service.search(SearchRequest::new("test")).await.unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_search_partial_failure_keeps_successes() {
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new(
            "working",
            vec![result("w-0", "A", "https://a.com", "working")],
        ));
        service.add_provider(FailingProvider::new("failing"));

        let response = service.search(SearchRequest::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].source, "working");
    }

    #[tokio::test]
    async fn test_search_filters_by_category() {
        let mut service = SearchService::new();
        service.add_provider(
            MockProvider::new("web", vec![result("w-0", "A", "https://a.com", "web")])
                .with_category(Category::Web),
        );
        service.add_provider(
            MockProvider::new("code", vec![result("c-0", "B", "https://b.com", "code")])
                .with_category(Category::Code),
        );

        let response = service
            .search(SearchRequest::new("test").with_category(Category::Code))
            .await
            .unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].source, "code");
    }

    #[tokio::test]
    async fn test_search_category_all_selects_everything() {
        let mut service = SearchService::new();
        service.add_provider(
            MockProvider::new("web", vec![result("w-0", "A", "https://a.com", "web")])
                .with_category(Category::Web),
        );
        service.add_provider(
            MockProvider::new("code", vec![result("c-0", "B", "https://b.com", "code")])
                .with_category(Category::Code),
        );

        let response = service.search(SearchRequest::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_skips_disabled_providers() {
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new(
            "enabled",
            vec![result("e-0", "A", "https://a.com", "enabled")],
        ));
        service.add_provider(
            MockProvider::new("disabled", vec![result("d-0", "B", "https://b.com", "disabled")])
                .disabled(),
        );

        let response = service.search(SearchRequest::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].source, "enabled");
    }

    #[tokio::test]
    async fn test_search_category_with_no_providers_is_empty() {
        let mut service = SearchService::new();
        service.add_provider(
            MockProvider::new("web", vec![result("w-0", "A", "https://a.com", "web")])
                .with_category(Category::Web),
        );

        let response = service
            .search(SearchRequest::new("test").with_category(Category::Academic))
            .await
            .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let mut service = SearchService::new();
        let results: Vec<SearchResult> = (0..10)
            .map(|i| result(&format!("m-{i}"), &format!("T{i}"), &format!("https://{i}.com"), "m"))
            .collect();
        service.add_provider(MockProvider::new("m", results));

        let response = service
            .search(SearchRequest::new("test").with_limit(3))
            .await
            .unwrap();
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.total, 10);
    }

    #[tokio::test]
    async fn test_search_records_to_store() {
        let store = Arc::new(CountingStore::new(false));
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new(
            "one",
            vec![result("o-0", "A", "https://a.com", "one")],
        ));
        service.set_store(Arc::clone(&store));

        service
            .search(SearchRequest::new("persisted query").with_session_id("s-1"))
            .await
            .unwrap();

        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        assert_eq!(
            *store.last_query.lock().unwrap(),
            Some("persisted query".to_string())
        );
    }

    #[tokio::test]
    async fn test_search_store_failure_does_not_fail_request() {
        let store = Arc::new(CountingStore::new(true));
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new(
            "one",
            vec![result("o-0", "A", "https://a.com", "one")],
        ));
        service.set_store(Arc::clone(&store));

        let response = service.search(SearchRequest::new("test")).await.unwrap();
        assert_eq!(response.results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_invalid_query_skips_store() {
        let store = Arc::new(CountingStore::new(false));
        let mut service = SearchService::new();
        service.add_provider(MockProvider::new("one", vec![]));
        service.set_store(Arc::clone(&store));

        let outcome = service.search(SearchRequest::new("")).await;
        assert!(outcome.is_err());
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_without_keys() {
        let service = SearchService::from_config(&Config::default()).unwrap();
        // DuckDuckGo, Wikipedia, GitHub, Stack Overflow, Hacker News, Reddit.
        assert_eq!(service.provider_count(), 6);
    }

    #[test]
    fn test_from_config_with_serp_key() {
        let config = Config::default().with_serp_api_key("key");
        let service = SearchService::from_config(&config).unwrap();
        // Six keyless providers plus five SerpAPI sub-engines.
        assert_eq!(service.provider_count(), 11);
    }
}
