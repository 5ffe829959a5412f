use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use elastic::ElasticClient;
use tracing::info;
use tracing_subscriber::{fmt, fmt::time::UtcTime, prelude::*, EnvFilter};

use crate::{
    app_state::DynSearchEngine,
    domain::search::{seed_index, ElasticSearchEngine, SearchService},
};

mod app_state;
mod config;
mod domain;
mod router;
mod routes;

pub(crate) use app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let settings = config::read_config().context("Failed to read configuration")?;

    let es = &settings.elasticsearch;
    let mut client = ElasticClient::new(es.url.clone(), es.timeout())
        .context("Failed to build Elasticsearch client")?;
    if let Some(credentials) = es.credentials() {
        client = client.with_credentials(credentials);
    }
    info!(url = client.base_url(), index = %es.index, "Using Elasticsearch");

    let engine: DynSearchEngine = Arc::new(ElasticSearchEngine::new(client, es.index.clone()));

    if let Some(seed_file) = &settings.search.seed_file {
        seed_index(&engine, seed_file).await;
    }

    let search_service = SearchService::new(engine, (&settings.search).into());
    let app = router::create(
        AppState::new(search_service),
        &settings.application.cors_allowed_origins,
    );

    let addr: SocketAddr = format!("{}:{}", settings.application.host, settings.application.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("course_search_api=info,elastic=info,tower_http=debug")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_timer(UtcTime::rfc_3339()))
        .with(filter)
        .init();
}
