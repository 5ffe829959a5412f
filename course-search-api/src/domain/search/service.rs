//! Search service: turns requests into engine calls and shapes the results.

use std::future::Future;

use itertools::Itertools;
use tracing::error;

use super::query::{build_query, QueryOptions};
use super::sort::resolve_sort;
use super::traits::{CompletionLookup, EngineSearch, Result, SearchEngine};
use super::types::{CourseDocument, CourseField, SearchRequest, SuggestionGroups};

/// Name of the completion suggester in suggest requests and responses.
pub const SUGGESTION_GROUP: &str = "course-suggest";

/// Configuration for the search service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Wire `minPrice`/`maxPrice` into a range filter
    pub apply_price_filter: bool,
    /// Maximum number of suggestions returned
    pub suggestion_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            apply_price_filter: false,
            suggestion_size: 10,
        }
    }
}

impl SearchConfig {
    fn query_options(&self) -> QueryOptions {
        QueryOptions {
            apply_price_filter: self.apply_price_filter,
        }
    }
}

/// Search and autocomplete over the course index.
///
/// Neither operation surfaces engine failures: they are logged and an empty result is
/// returned, so callers cannot tell "no matches" from "engine unavailable".
///
/// # Examples
///
/// ```ignore
/// let service = SearchService::new(engine, SearchConfig::default());
/// let courses = service.search_courses(&request).await;
/// let suggestions = service.suggest("Rob").await;
/// ```
pub struct SearchService<E>
where
    E: SearchEngine,
{
    engine: E,
    config: SearchConfig,
}

impl<E> SearchService<E>
where
    E: SearchEngine,
{
    pub fn new(engine: E, config: SearchConfig) -> Self {
        Self { engine, config }
    }

    #[allow(dead_code)]
    pub fn with_defaults(engine: E) -> Self {
        Self::new(engine, SearchConfig::default())
    }

    /// Execute a filtered, sorted, paginated search.
    pub async fn search_courses(&self, request: &SearchRequest) -> Vec<CourseDocument> {
        let composed = build_query(request, &self.config.query_options());
        let search = EngineSearch {
            query: &composed.query,
            sort: resolve_sort(&request.sort),
            from: request.offset(),
            size: request.size,
        };

        fail_soft("search", self.engine.search(&search)).await
    }

    /// Complete a prefix into at most `suggestion_size` distinct suggestions.
    pub async fn suggest(&self, prefix: &str) -> Vec<String> {
        if prefix.trim().is_empty() {
            return vec![];
        }

        let lookup = CompletionLookup {
            prefix,
            field: CourseField::Suggest,
            group: SUGGESTION_GROUP,
            size: self.config.suggestion_size,
            skip_duplicates: true,
        };

        let groups = fail_soft("suggest", self.engine.complete(&lookup)).await;
        flatten_suggestions(&groups, SUGGESTION_GROUP, self.config.suggestion_size)
    }
}

/// Runs an engine call; on failure logs it and yields the empty default instead.
async fn fail_soft<T, F>(operation: &'static str, call: F) -> T
where
    T: Default,
    F: Future<Output = Result<T>>,
{
    match call.await {
        Ok(value) => value,
        Err(e) => {
            error!(operation, error = %e, "Search engine call failed, returning empty result");
            T::default()
        }
    }
}

/// Flattens the options of one suggestion group into distinct texts, keeping engine order.
pub fn flatten_suggestions(groups: &SuggestionGroups, group: &str, limit: usize) -> Vec<String> {
    let Some(entries) = groups.get(group) else {
        return vec![];
    };

    entries
        .iter()
        .flat_map(|entry| entry.options.iter())
        .unique()
        .take(limit)
        .cloned()
        .collect()
}
