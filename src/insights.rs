//! AI insight generation over aggregated results.
//!
//! Sends the query plus a digest of the top results to an OpenAI-compatible
//! chat completion endpoint and asks for a structured summary. If the model
//! answers with anything other than the requested JSON, the raw text becomes
//! the summary — structured-parse failure never fails the request.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{Result, SearchError, SearchResult};

/// Default chat completion endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default model for insight generation.
const DEFAULT_MODEL: &str = "gpt-4.1";

/// Number of results included in the digest sent to the model.
const DIGEST_RESULTS: usize = 10;

/// Synthesized insights over one result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Short prose summary.
    pub summary: String,
    /// Key themes or findings.
    #[serde(default)]
    pub key_insights: Vec<String>,
    /// Suggested follow-up queries.
    #[serde(default)]
    pub recommended_searches: Vec<String>,
}

/// Client for the insight generation endpoint.
pub struct InsightsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl InsightsClient {
    /// Creates a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the endpoint base URL (for tests and compatible gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Generates insights for `query` over up to ten of `results`.
    ///
    /// An empty result slice is valid input: the model still produces a
    /// (generic) summary. Only a missing/empty query is rejected.
    pub async fn generate(&self, query: &str, results: &[SearchResult]) -> Result<Insights> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("Query cannot be empty".into()));
        }

        let digest: Vec<String> = results
            .iter()
            .take(DIGEST_RESULTS)
            .map(|r| format!("{}: {}", r.title, r.description))
            .collect();
        let digest = digest.join("\n");

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You are an expert research assistant. Analyze search results and provide concise, valuable insights. Focus on key themes, important findings, and actionable information."
                },
                {
                    "role": "user",
                    "content": format!(
                        "Analyze these search results for the query \"{query}\" and provide:\n\
                         1. A brief summary (2-3 sentences)\n\
                         2. Key insights or themes (3-4 bullet points)\n\
                         3. Recommended next steps or related searches (2-3 suggestions)\n\n\
                         Search Results:\n{digest}\n\n\
                         Format your response as JSON with fields: summary, keyInsights (array), recommendedSearches (array)."
                    )
                }
            ],
            "temperature": 0.3,
            "max_tokens": 500,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Other(format!(
                "LLM API error {status}: {text}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| SearchError::Parse("LLM response contained no choices".into()))?;

        Ok(parse_insights(&content))
    }
}

/// Parses the model's reply, falling back to raw text on malformed JSON.
fn parse_insights(content: &str) -> Insights {
    match serde_json::from_str::<Insights>(content) {
        Ok(insights) => insights,
        Err(e) => {
            debug!("Insights reply was not structured JSON ({e}), using raw text");
            Insights {
                summary: content.to_string(),
                key_insights: Vec::new(),
                recommended_searches: Vec::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insights_structured() {
        let content = r#"{
            "summary": "Rust is a systems language.",
            "keyInsights": ["memory safety", "zero-cost abstractions"],
            "recommendedSearches": ["rust async", "rust ownership"]
        }"#;
        let insights = parse_insights(content);
        assert_eq!(insights.summary, "Rust is a systems language.");
        assert_eq!(insights.key_insights.len(), 2);
        assert_eq!(insights.recommended_searches.len(), 2);
    }

    #[test]
    fn test_parse_insights_missing_optional_arrays() {
        let content = r#"{"summary": "Just a summary."}"#;
        let insights = parse_insights(content);
        assert_eq!(insights.summary, "Just a summary.");
        assert!(insights.key_insights.is_empty());
        assert!(insights.recommended_searches.is_empty());
    }

    #[test]
    fn test_parse_insights_raw_text_fallback() {
        let content = "Rust is popular because of its safety guarantees.";
        let insights = parse_insights(content);
        assert_eq!(insights.summary, content);
        assert!(insights.key_insights.is_empty());
        assert!(insights.recommended_searches.is_empty());
    }

    #[test]
    fn test_parse_insights_malformed_json_fallback() {
        let content = r#"{"summary": "unterminated"#;
        let insights = parse_insights(content);
        assert_eq!(insights.summary, content);
    }

    #[test]
    fn test_insights_serialization_camel_case() {
        let insights = Insights {
            summary: "s".to_string(),
            key_insights: vec!["a".to_string()],
            recommended_searches: vec!["b".to_string()],
        };
        let json = serde_json::to_string(&insights).unwrap();
        assert!(json.contains("\"keyInsights\""));
        assert!(json.contains("\"recommendedSearches\""));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_query() {
        let client = InsightsClient::new("test-key");
        let result = client.generate("   ", &[]).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery(_))));
    }

    #[test]
    fn test_client_builders() {
        let client = InsightsClient::new("key")
            .with_base_url("http://localhost:9999")
            .with_model("test-model");
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.model, "test-model");
    }
}
