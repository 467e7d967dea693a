//! Best-effort search history persistence.
//!
//! The aggregator records each completed search for later analytics. A
//! failed write is logged and lost; it never fails the search request, and
//! there is no retry or read path here.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::{Result, SearchError, SearchResult};

/// One search to be recorded.
#[derive(Debug)]
pub struct SearchRecord<'a> {
    /// The query as received.
    pub query: &'a str,
    /// The aggregated result set returned to the caller.
    pub results: &'a [SearchResult],
    /// Requested source category label.
    pub source: &'a str,
    /// Opaque caller session identifier, if supplied.
    pub user_session: Option<&'a str>,
}

/// Sink for completed searches.
pub trait SearchStore: Send + Sync {
    /// Persists one search record.
    fn record_search(&self, record: &SearchRecord<'_>) -> Result<()>;
}

/// SQLite-backed search store.
///
/// Thread-safe via an internal `Mutex<Connection>`; all writes are
/// serialized.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS searches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    results TEXT NOT NULL,
    source TEXT NOT NULL,
    user_session TEXT,
    result_count INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

impl SqliteStore {
    /// Opens (or creates) the database at `path` and applies the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SearchError::Persistence(e.to_string()))?;
            }
        }
        let conn = Connection::open(path).map_err(|e| SearchError::Persistence(e.to_string()))?;
        conn.execute(SCHEMA, [])
            .map_err(|e| SearchError::Persistence(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| SearchError::Persistence(e.to_string()))?;
        conn.execute(SCHEMA, [])
            .map_err(|e| SearchError::Persistence(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of recorded searches.
    pub fn search_count(&self) -> Result<u64> {
        let conn = self.lock()?;
        conn.query_row("SELECT COUNT(*) FROM searches", [], |row| row.get(0))
            .map_err(|e| SearchError::Persistence(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SearchError::Persistence("store lock poisoned".to_string()))
    }
}

impl SearchStore for SqliteStore {
    fn record_search(&self, record: &SearchRecord<'_>) -> Result<()> {
        let results_json = serde_json::to_string(record.results)
            .map_err(|e| SearchError::Persistence(e.to_string()))?;
        let created_at = chrono::Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO searches (query, results, source, user_session, result_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.query,
                results_json,
                record.source,
                record.user_session,
                record.results.len() as i64,
                created_at,
            ],
        )
        .map_err(|e| SearchError::Persistence(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchResult;

    fn record<'a>(
        query: &'a str,
        results: &'a [SearchResult],
        session: Option<&'a str>,
    ) -> SearchRecord<'a> {
        SearchRecord {
            query,
            results,
            source: "all",
            user_session: session,
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.search_count().unwrap(), 0);
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nova.db");
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.search_count().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/nova.db");
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.search_count().unwrap(), 0);
    }

    #[test]
    fn test_record_search() {
        let store = SqliteStore::open_in_memory().unwrap();
        let results = vec![SearchResult::new(
            "gh-0",
            "repo",
            "desc",
            "https://github.com/r",
            "GitHub",
        )];
        store
            .record_search(&record("rust", &results, Some("session-1")))
            .unwrap();
        assert_eq!(store.search_count().unwrap(), 1);
    }

    #[test]
    fn test_record_search_without_session() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.record_search(&record("rust", &[], None)).unwrap();
        assert_eq!(store.search_count().unwrap(), 1);
    }

    #[test]
    fn test_record_search_stores_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let results = vec![
            SearchResult::new("gh-0", "a", "d", "https://a.com", "GitHub"),
            SearchResult::new("gh-1", "b", "d", "https://b.com", "GitHub"),
        ];
        store
            .record_search(&record("rust async", &results, Some("s-9")))
            .unwrap();

        let conn = store.conn.lock().unwrap();
        let (query, source, session, count, results_json): (String, String, Option<String>, i64, String) = conn
            .query_row(
                "SELECT query, source, user_session, result_count, results FROM searches",
                [],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                    ))
                },
            )
            .unwrap();
        assert_eq!(query, "rust async");
        assert_eq!(source, "all");
        assert_eq!(session, Some("s-9".to_string()));
        assert_eq!(count, 2);

        let stored: Vec<SearchResult> = serde_json::from_str(&results_json).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, "gh-0");
    }

    #[test]
    fn test_record_search_multiple() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 0..3 {
            let query = format!("query {i}");
            store.record_search(&record(&query, &[], None)).unwrap();
        }
        assert_eq!(store.search_count().unwrap(), 3);
    }
}
