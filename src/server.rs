//! HTTP surface for the aggregated search service.
//!
//! Mirrors the contract of the original serverless endpoints: permissive
//! CORS, JSON bodies in and out, 400 for invalid input, 500 with a
//! `success: false` envelope for configuration and unexpected failures.
//! Provider failures never surface here — a partially failed search is
//! indistinguishable from a sparse result set.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::insights::InsightsClient;
use crate::{Category, SearchError, SearchRequest, SearchResult, SearchService};

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The aggregating search service.
    pub service: Arc<SearchService>,
    /// Insights client, present only when an LLM key is configured.
    pub insights: Option<Arc<InsightsClient>>,
}

impl AppState {
    /// Creates the handler state.
    pub fn new(service: SearchService, insights: Option<InsightsClient>) -> Self {
        Self {
            service: Arc::new(service),
            insights: insights.map(Arc::new),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(search_handler))
        .route("/api/insights", post(insights_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    query: Option<String>,
    #[serde(rename = "type")]
    category: Option<String>,
    limit: Option<usize>,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsightsBody {
    query: Option<String>,
    results: Option<Vec<SearchResult>>,
}

async fn search_handler(State(state): State<AppState>, Json(body): Json<SearchBody>) -> Response {
    let Some(query) = body.query.filter(|q| !q.trim().is_empty()) else {
        return bad_request("Search query is required");
    };

    let category = match body.category.as_deref() {
        None => Category::All,
        Some(raw) => match Category::from_str(raw) {
            Ok(category) => category,
            Err(e) => return bad_request(&e),
        },
    };

    let mut request = SearchRequest::new(query).with_category(category);
    if let Some(limit) = body.limit {
        request = request.with_limit(limit);
    }
    if let Some(session_id) = body.session_id {
        request = request.with_session_id(session_id);
    }

    match state.service.search(request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "query": response.query,
                "results": response.results,
                "total_results": response.total,
                "sources": response.sources,
                "timestamp": response.timestamp,
            })),
        )
            .into_response(),
        Err(SearchError::InvalidQuery(message)) => bad_request(&message),
        Err(e) => internal_error(e),
    }
}

async fn insights_handler(
    State(state): State<AppState>,
    Json(body): Json<InsightsBody>,
) -> Response {
    // An empty results array is valid input; only an absent field is not.
    let (Some(query), Some(results)) = (body.query, body.results) else {
        return bad_request("Results and query are required");
    };

    let Some(client) = &state.insights else {
        return internal_error(SearchError::Configuration(
            "OPENAI_API_KEY not configured".to_string(),
        ));
    };

    match client.generate(&query, &results).await {
        Ok(insights) => (
            StatusCode::OK,
            Json(json!({ "success": true, "insights": insights })),
        )
            .into_response(),
        Err(SearchError::InvalidQuery(message)) => bad_request(&message),
        Err(e) => internal_error(e),
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "providers": state.service.provider_count(),
            "insights": state.insights.is_some(),
        })),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn internal_error(error: SearchError) -> Response {
    error!("Request failed: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": error.to_string() })),
    )
        .into_response()
}
