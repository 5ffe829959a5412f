//! Trait definitions for search domain abstractions.
//!
//! The engine is injected into the service through [`SearchEngine`], so the service can be
//! tested against an in-memory engine.

use std::sync::Arc;

use async_trait::async_trait;

use super::query::Query;
use super::types::{CourseDocument, CourseField, IndexReport, ResolvedSort, SuggestionGroups};

/// Error type for search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search engine error: {0}")]
    EngineError(String),

    #[error("Invalid engine response: {0}")]
    ParsingError(String),

    #[error("Seed file error: {0}")]
    SeedError(String),
}

impl From<elastic::ElasticError> for SearchError {
    fn from(e: elastic::ElasticError) -> Self {
        match e {
            elastic::ElasticError::ParsingError(msg) => SearchError::ParsingError(msg),
            other => SearchError::EngineError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// A fully resolved, paginated search.
#[derive(Debug, Clone)]
pub struct EngineSearch<'a> {
    pub query: &'a Query,
    pub sort: ResolvedSort,
    pub from: u64,
    pub size: u32,
}

/// A prefix-completion lookup against a completion field.
#[derive(Debug, Clone)]
pub struct CompletionLookup<'a> {
    pub prefix: &'a str,
    pub field: CourseField,
    /// Name the suggestions are grouped under in the response
    pub group: &'a str,
    pub size: usize,
    pub skip_duplicates: bool,
}

/// Operations the gateway needs from the search engine.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Execute a query and return the matched documents in engine order.
    async fn search(&self, request: &EngineSearch<'_>) -> Result<Vec<CourseDocument>>;

    /// Execute a completion lookup and return the raw suggestion groups.
    async fn complete(&self, lookup: &CompletionLookup<'_>) -> Result<SuggestionGroups>;

    /// Create the course index if it does not exist yet.
    ///
    /// Returns true if the index was created.
    async fn ensure_index(&self) -> Result<bool>;

    /// Insert or fully replace documents, keyed by id.
    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<IndexReport>;
}

#[async_trait]
impl<T> SearchEngine for Arc<T>
where
    T: SearchEngine + ?Sized,
{
    async fn search(&self, request: &EngineSearch<'_>) -> Result<Vec<CourseDocument>> {
        (**self).search(request).await
    }

    async fn complete(&self, lookup: &CompletionLookup<'_>) -> Result<SuggestionGroups> {
        (**self).complete(lookup).await
    }

    async fn ensure_index(&self) -> Result<bool> {
        (**self).ensure_index().await
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<IndexReport> {
        (**self).index_documents(docs).await
    }
}
