//! Course search over an Elasticsearch index.
//!
//! # Architecture
//!
//! - [`query`] turns a [`SearchRequest`] into a typed [`Query`](query::Query) tree and its DSL
//! - `sort` maps a sort token to an engine sort key
//! - [`SearchService`] runs searches and completions through a [`SearchEngine`], failing soft
//! - [`seed_index`] loads a JSON seed file into the index at startup
//!
//! # Example
//!
//! ```ignore
//! use course_search_api::domain::search::{ElasticSearchEngine, SearchConfig, SearchService};
//!
//! let engine = ElasticSearchEngine::new(client, "courses");
//! let service = SearchService::new(engine, SearchConfig::default());
//!
//! let courses = service.search_courses(&request).await;
//! let suggestions = service.suggest("Rob").await;
//! ```

mod loader;
mod service;
mod sort;
mod traits;
mod types;

pub mod engine;
pub mod query;

pub use engine::ElasticSearchEngine;
pub use loader::seed_index;
pub use service::{SearchConfig, SearchService};
pub use traits::SearchEngine;
pub use types::{normalize_session_date, CourseDocument, SearchRequest, DEFAULT_PAGE_SIZE};
