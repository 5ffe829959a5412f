use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError, DisplayFromStr};
use tracing::instrument;

use crate::{
    domain::search::{normalize_session_date, CourseDocument, SearchRequest, DEFAULT_PAGE_SIZE},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/suggest", get(suggest))
}

/// Query parameters of `GET /api/search`.
///
/// Malformed values are treated as absent instead of rejecting the request.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    q: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    min_age: Option<i32>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    max_age: Option<i32>,
    category: Option<String>,
    #[serde(rename = "type")]
    course_type: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    min_price: Option<f64>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    max_price: Option<f64>,
    start_date: Option<String>,
    sort: Option<String>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    page: Option<i64>,
    #[serde_as(as = "DefaultOnError<Option<DisplayFromStr>>")]
    #[serde(default)]
    size: Option<i64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl From<SearchParams> for SearchRequest {
    fn from(params: SearchParams) -> Self {
        let defaults = SearchRequest::default();

        Self {
            text: non_empty(params.q),
            min_age: params.min_age,
            max_age: params.max_age,
            category: non_empty(params.category),
            course_type: non_empty(params.course_type),
            min_price: finite(params.min_price),
            max_price: finite(params.max_price),
            start_date: params.start_date.as_deref().and_then(normalize_session_date),
            sort: non_empty(params.sort).unwrap_or(defaults.sort),
            page: params
                .page
                .map(|page| u32::try_from(page.max(0)).unwrap_or(u32::MAX))
                .unwrap_or(defaults.page),
            size: params
                .size
                .filter(|size| *size > 0)
                .map(|size| u32::try_from(size).unwrap_or(u32::MAX))
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SuggestParams {
    q: Option<String>,
}

#[instrument(name = "GET /api/search", skip(app_state))]
async fn search(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<CourseDocument>> {
    let request = SearchRequest::from(params);
    let results = app_state.search_service().search_courses(&request).await;

    Json(results)
}

#[instrument(name = "GET /api/search/suggest", skip(app_state))]
async fn suggest(
    State(app_state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<Vec<String>> {
    let prefix = params.q.unwrap_or_default();
    let suggestions = app_state.search_service().suggest(&prefix).await;

    Json(suggestions)
}
