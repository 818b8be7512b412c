// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use recap_kpi::application::history_repository::HistoryRepository;
use recap_kpi::application::indicator_service::IndicatorService;
use recap_kpi::application::streaming_service::StreamingDashboardService;
use recap_kpi::domain::catalog::IndicatorCatalog;
use recap_kpi::infrastructure::config::{build_catalog, load_app_config, load_indicators_config};
use recap_kpi::infrastructure::csv_repository::CsvHistoryRepository;
use recap_kpi::presentation::app_state::AppState;
use recap_kpi::presentation::handlers::{
    get_dashboard, get_indicator, health_check, list_indicators, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration; an invalid indicator aborts startup
    let app_config = load_app_config().context("Failed to load config/app")?;
    let indicators_config = load_indicators_config().context("Failed to load config/indicators")?;
    let catalog = Arc::new(build_catalog(&indicators_config).context("Invalid indicator catalog")?);

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvHistoryRepository::new(app_config.data.dir.clone()));
    report_missing_sources(repository.as_ref(), &catalog).await;

    // Create services (application layer)
    let indicator_service = IndicatorService::new(repository.clone(), catalog.clone());
    let streaming_service = StreamingDashboardService::new(repository, catalog.clone());

    let state = Arc::new(AppState {
        indicator_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/indicators", get(list_indicators))
        .route("/indicators/:id", get(get_indicator))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!(
        "Starting recap-kpi service on {} with {} indicators from {}",
        addr,
        catalog.len(),
        app_config.data.dir.display()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

/// Warn about indicators whose history table is not present; they render as "no data"
async fn report_missing_sources(repository: &dyn HistoryRepository, catalog: &IndicatorCatalog) {
    match repository.list_sources().await {
        Ok(sources) => {
            for definition in catalog.iter() {
                if !sources.contains(&definition.source) {
                    tracing::warn!(
                        "History table '{}' for indicator {} not found",
                        definition.source,
                        definition.id
                    );
                }
            }
        }
        Err(e) => tracing::warn!("Could not list history tables: {:#}", e),
    }
}
