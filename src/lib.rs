//! # nova-search
//!
//! A multi-source search aggregation library.
//!
//! This library fans a query out to several external search providers
//! concurrently, maps each provider's response into a shared result shape,
//! and merges the outcomes into one deduplicated, priority-ordered list,
//! with support for:
//!
//! - Async parallel provider fan-out with per-provider timeouts
//! - Independent per-provider failure containment
//! - Static priority/relevance ranking with stable ordering
//! - Best-effort search history persistence
//! - AI insight generation over aggregated results
//!
//! ## Example
//!
//! ```rust,no_run
//! use nova_search::{providers::Wikipedia, SearchRequest, SearchService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut service = SearchService::new();
//!     service.add_provider(Wikipedia::new());
//!
//!     let request = SearchRequest::new("rust programming");
//!     let response = service.search(request).await?;
//!
//!     for result in &response.results {
//!         println!("{}: {}", result.title, result.url);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod dispatch;
mod error;
mod insights;
mod merge;
mod provider;
mod request;
mod result;
mod search;
mod store;

pub mod providers;
pub mod server;

pub use config::{Config, DEFAULT_BIND_ADDR};
pub use dispatch::{dispatch, ProviderOutcome};
pub use error::{Result, SearchError};
pub use insights::{Insights, InsightsClient};
pub use merge::{provider_priority, MergeOutput, Merger};
pub use provider::{Provider, ProviderConfig};
pub use request::{Category, SearchRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use result::{AggregatedResponse, ResultMetadata, ResultType, SearchResult};
pub use search::SearchService;
pub use store::{SearchRecord, SearchStore, SqliteStore};
