//! Elasticsearch engine implementation on top of the `elastic` client.

use async_trait::async_trait;
use elastic::{ElasticClient, SearchResponse, SuggestResponse};
use serde_json::{json, Value};
use tracing::info;

use crate::domain::search::traits::{CompletionLookup, EngineSearch, Result, SearchEngine};
use crate::domain::search::types::{
    CourseDocument, IndexReport, SuggestionEntry, SuggestionGroups,
};

/// Date format of `nextSessionDate`, with a bare date accepted as well.
pub const SESSION_DATE_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ss'Z'||yyyy-MM-dd";

/// Course index backed by an Elasticsearch cluster.
#[derive(Clone)]
pub struct ElasticSearchEngine {
    client: ElasticClient,
    index: String,
}

impl ElasticSearchEngine {
    pub fn new(client: ElasticClient, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }
}

/// Renders the `_search` body: query, single-field sort and offset pagination.
pub fn search_body(search: &EngineSearch<'_>) -> Value {
    json!({
        "query": search.query.to_dsl(),
        "sort": [
            { search.sort.field.as_ref(): { "order": search.sort.order.to_string() } }
        ],
        "from": search.from,
        "size": search.size,
    })
}

/// Renders a suggest-only `_search` body with a single completion suggester.
pub fn completion_body(lookup: &CompletionLookup<'_>) -> Value {
    json!({
        "_source": false,
        "suggest": {
            lookup.group: {
                "prefix": lookup.prefix,
                "completion": {
                    "field": lookup.field.as_ref(),
                    "skip_duplicates": lookup.skip_duplicates,
                    "size": lookup.size,
                }
            }
        }
    })
}

/// Settings and mappings for the course index.
pub fn index_definition() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "title": { "type": "text" },
                "description": { "type": "text" },
                "category": { "type": "keyword" },
                "type": { "type": "keyword" },
                "gradeRange": { "type": "keyword" },
                "minAge": { "type": "integer" },
                "maxAge": { "type": "integer" },
                "price": { "type": "double" },
                "nextSessionDate": { "type": "date", "format": SESSION_DATE_FORMAT },
                "suggest": { "type": "completion" }
            }
        }
    })
}

/// Hits in rank order. A source stored without an `id` takes the hit's `_id`.
fn into_courses(response: SearchResponse<CourseDocument>) -> Vec<CourseDocument> {
    response
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| {
            let mut course = hit.source?;
            if course.id.is_empty() {
                course.id = hit.id;
            }
            Some(course)
        })
        .collect()
}

fn into_groups(response: SuggestResponse) -> SuggestionGroups {
    response
        .suggest
        .into_iter()
        .map(|(name, entries)| {
            let entries = entries
                .into_iter()
                .map(|entry| SuggestionEntry {
                    options: entry.options.into_iter().map(|o| o.text).collect(),
                })
                .collect();
            (name, entries)
        })
        .collect()
}

#[async_trait]
impl SearchEngine for ElasticSearchEngine {
    async fn search(&self, request: &EngineSearch<'_>) -> Result<Vec<CourseDocument>> {
        let body = search_body(request);
        let response = self
            .client
            .search::<CourseDocument>(&self.index, &body)
            .await?;

        Ok(into_courses(response))
    }

    async fn complete(&self, lookup: &CompletionLookup<'_>) -> Result<SuggestionGroups> {
        let body = completion_body(lookup);
        let response = self.client.suggest(&self.index, &body).await?;

        Ok(into_groups(response))
    }

    async fn ensure_index(&self) -> Result<bool> {
        if self.client.index_exists(&self.index).await? {
            return Ok(false);
        }

        self.client
            .create_index(&self.index, &index_definition())
            .await?;
        info!(index = %self.index, "Created search index");
        Ok(true)
    }

    async fn index_documents(&self, docs: &[CourseDocument]) -> Result<IndexReport> {
        let response = self
            .client
            .bulk_index(&self.index, docs.iter().map(|doc| (doc.id.as_str(), doc)))
            .await?;
        self.client.refresh(&self.index).await?;

        let failed = response.failures();
        Ok(IndexReport {
            indexed: response.items.len().saturating_sub(failed.len()),
            failed,
        })
    }
}
