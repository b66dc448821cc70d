//! Search-vs-preview dispatch shared by every vocabulary.
//!
//! Short queries (fewer than [`SearchPolicy::min_query_len`] characters) are
//! served from the store's unfiltered preview; longer ones run a
//! case-insensitive substring search. Both are capped at
//! [`SearchPolicy::result_limit`] rows.

use std::time::Instant;

use tracing::debug;

use crate::defaults;
use crate::error::Result;
use crate::models::{CategoryItem, Vocabulary};
use crate::traits::VocabularyRepository;

/// Dispatch thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Queries with fewer characters than this are served by preview.
    pub min_query_len: usize,
    /// Maximum rows returned by either path.
    pub result_limit: i64,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            min_query_len: defaults::SEARCH_MIN_QUERY_LEN,
            result_limit: defaults::SEARCH_RESULT_LIMIT,
        }
    }
}

/// Which store operation a query resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'q> {
    Preview,
    Search(&'q str),
}

impl SearchPolicy {
    pub fn new(min_query_len: usize, result_limit: i64) -> Self {
        Self {
            min_query_len,
            result_limit,
        }
    }

    /// Decide between preview and search. Length is counted in characters.
    pub fn decide<'q>(&self, query: &'q str) -> Lookup<'q> {
        if query.chars().count() < self.min_query_len {
            Lookup::Preview
        } else {
            Lookup::Search(query)
        }
    }

    /// Run the query against `store` for `vocabulary`.
    ///
    /// Storage errors are returned unchanged; there is no retry.
    pub async fn resolve(
        &self,
        store: &dyn VocabularyRepository,
        vocabulary: Vocabulary,
        query: &str,
    ) -> Result<Vec<CategoryItem>> {
        let start = Instant::now();
        let lookup = self.decide(query);

        let items = match lookup {
            Lookup::Preview => store.preview(vocabulary, self.result_limit).await?,
            Lookup::Search(substring) => {
                store
                    .search(vocabulary, substring, self.result_limit)
                    .await?
            }
        };

        let op = match lookup {
            Lookup::Preview => "preview",
            Lookup::Search(_) => "search",
        };
        debug!(
            subsystem = "core",
            component = "search_dispatcher",
            op,
            vocabulary = vocabulary.as_str(),
            result_count = items.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Vocabulary lookup resolved"
        );

        Ok(items)
    }
}
