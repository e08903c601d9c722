use message_search::{
    api::{build_router, AppState},
    config::Config,
    fetch::MessageFetcher,
    loader::DataLoader,
    search::SearchEngine,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing; RUST_LOG overrides the configured level.
    let default_filter = format!(
        "message_search={},tower_http=info",
        config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting message-search v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(upstream = %config.upstream.messages_url(), "Upstream source");

    // Construct owned service instances; handlers receive them by reference
    // through the router state.
    let engine = Arc::new(SearchEngine::new(config.index.clone()));
    let fetcher = Arc::new(MessageFetcher::new(config.upstream.clone())?);
    let loader = Arc::new(DataLoader::new(
        fetcher,
        engine.clone(),
        config.refresh.interval(),
    ));

    // Initial load; a failure is logged and the service starts with an
    // empty snapshot, the periodic refresh will retry.
    match loader.load().await {
        Ok(indexed) => tracing::info!(indexed, "Initial load complete"),
        Err(e) => tracing::error!(error = %e, "Initial load failed; starting with empty index"),
    }

    loader.start_periodic();

    let app_state = AppState::new(engine, loader.clone(), config.server.max_page_size);
    let app = build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("HTTP API server listening on http://{}", addr);
    tracing::info!("   Health check: http://{}/health", addr);
    tracing::info!("   Search: http://{}/search?search_query=...", addr);
    tracing::info!("   Manual refresh: POST http://{}/reload", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully...");
    loader.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
