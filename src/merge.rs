//! Result merging: deduplication, priority ordering, truncation.

use std::collections::HashSet;

use crate::dispatch::ProviderOutcome;
use crate::SearchResult;

/// Static provider priority table, the primary merge sort key.
///
/// Higher is better. Providers not listed here sort below all listed ones.
pub fn provider_priority(source: &str) -> u8 {
    match source {
        "Google" => 100,
        "GitHub" => 95,
        "Stack Overflow" => 90,
        "Wikipedia" => 85,
        "DuckDuckGo" => 80,
        "Hacker News" => 75,
        "Reddit" => 70,
        "Google News" => 65,
        "YouTube" => 60,
        "Google Images" => 55,
        "Google Scholar" => 50,
        _ => 0,
    }
}

/// Output of one merge pass.
#[derive(Debug)]
pub struct MergeOutput {
    /// Deduplicated results in final order, truncated to the limit.
    pub results: Vec<SearchResult>,
    /// Number of distinct results computed before truncation.
    pub total: usize,
}

/// Combines per-provider outcomes into one ordered, deduplicated,
/// size-bounded list.
#[derive(Debug, Default)]
pub struct Merger;

impl Merger {
    /// Creates a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merges all successful outcomes.
    ///
    /// Failed outcomes contribute nothing. Duplicates — exact `(title, url)`
    /// pairs — are dropped, first occurrence in provider-iteration order
    /// wins. The surviving set is sorted by descending provider priority,
    /// then descending relevance (stable for equal keys), and truncated to
    /// `limit` only after the full set has been computed.
    pub fn merge(&self, outcomes: Vec<ProviderOutcome>, limit: usize) -> MergeOutput {
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut combined: Vec<SearchResult> = Vec::new();

        for outcome in outcomes {
            let Ok(results) = outcome.outcome else {
                continue;
            };
            for result in results {
                if seen.insert(result.dedupe_key()) {
                    combined.push(result);
                }
            }
        }

        // Vec::sort_by is stable: equal keys keep their insertion order.
        combined.sort_by(|a, b| {
            provider_priority(&b.source)
                .cmp(&provider_priority(&a.source))
                .then_with(|| {
                    b.relevance
                        .partial_cmp(&a.relevance)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let total = combined.len();
        combined.truncate(limit);

        MergeOutput {
            results: combined,
            total,
        }
    }
}
