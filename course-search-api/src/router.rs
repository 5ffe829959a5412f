use axum::{http::Method, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes, routes::ApiError};

pub fn create(app_state: AppState, cors_allowed_origins: &[String]) -> Router<()> {
    let allowed_origins = cors_allowed_origins.to_vec();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or_default();
            allowed_origins.iter().any(|allowed| allowed == origin_str)
        }));

    Router::new()
        .route("/", get(|| async { "Course search is up" }))
        .nest("/api/search", routes::search::router())
        .fallback(|| async { ApiError::not_found("No such route") })
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
