//! Search request representation.

use serde::{Deserialize, Serialize};

/// Source category requested by the caller.
///
/// Selects which providers participate in a search. `All` fans out to every
/// configured provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Web,
    News,
    Video,
    Image,
    Code,
    Academic,
    Community,
}

impl Category {
    /// Lowercase label used in persisted records and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Web => "web",
            Category::News => "news",
            Category::Video => "video",
            Category::Image => "image",
            Category::Code => "code",
            Category::Academic => "academic",
            Category::Community => "community",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "web" => Ok(Category::Web),
            "news" => Ok(Category::News),
            "video" => Ok(Category::Video),
            "image" => Ok(Category::Image),
            "code" => Ok(Category::Code),
            "academic" => Ok(Category::Academic),
            "community" => Ok(Category::Community),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Default result limit applied when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 20;

/// Upper bound on the caller-supplied result limit.
pub const MAX_LIMIT: usize = 100;

/// A search request with all parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search terms.
    pub query: String,
    /// Requested source category.
    pub category: Category,
    /// Maximum number of results to return.
    pub limit: usize,
    /// Opaque caller session identifier, stored with the search record.
    pub session_id: Option<String>,
}

impl SearchRequest {
    /// Creates a new search request with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: Category::All,
            limit: DEFAULT_LIMIT,
            session_id: None,
        }
    }

    /// Sets the source category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the result limit, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
