//! Concurrent provider fan-out.
//!
//! Invokes every selected provider for one query concurrently and collects
//! each outcome independently. One provider's failure or slowness cannot
//! block or corrupt the others; the caller receives every outcome after all
//! provider calls have settled.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::{Provider, Result, SearchError, SearchRequest, SearchResult};

/// The settled outcome of one provider call.
#[derive(Debug)]
pub struct ProviderOutcome {
    /// Display name of the provider.
    pub provider: String,
    /// Results on success, the contained error otherwise.
    pub outcome: Result<Vec<SearchResult>>,
}

impl ProviderOutcome {
    /// Returns true if the provider call succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Fans the request out to all given providers and waits for every call to
/// settle.
///
/// Rejects empty or whitespace-only queries with
/// [`SearchError::InvalidQuery`] before any provider is invoked. Each
/// provider call is bounded by its configured timeout; a timeout is recorded
/// as a failed outcome for that provider only.
pub async fn dispatch(
    providers: &[Arc<dyn Provider>],
    request: &SearchRequest,
) -> Result<Vec<ProviderOutcome>> {
    if request.query.trim().is_empty() {
        return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
    }

    let futures: Vec<_> = providers
        .iter()
        .map(|provider| {
            let provider = Arc::clone(provider);
            let request = request.clone();
            let timeout_duration = Duration::from_secs(provider.config().timeout);

            async move {
                let name = provider.name().to_string();
                let outcome = match timeout(timeout_duration, provider.search(&request)).await {
                    Ok(Ok(results)) => {
                        debug!("Provider {} returned {} results", name, results.len());
                        Ok(results)
                    }
                    Ok(Err(e)) => {
                        warn!("Provider {} failed: {}", name, e);
                        Err(e)
                    }
                    Err(_) => {
                        warn!("Provider {} timed out", name);
                        Err(SearchError::Other(format!("Provider {} timed out", name)))
                    }
                };
                ProviderOutcome {
                    provider: name,
                    outcome,
                }
            }
        })
        .collect();

    Ok(join_all(futures).await)
}
