// HTTP request handlers
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::views::{DashboardView, DetailView, IndicatorSummary, StreamEventView};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the indicator catalog
pub async fn list_indicators(State(state): State<Arc<AppState>>) -> Json<Vec<IndicatorSummary>> {
    let summaries = state
        .indicator_service
        .catalog()
        .iter()
        .map(|definition| IndicatorSummary::from(definition.as_ref()))
        .collect();
    Json(summaries)
}

/// Overview dashboard: every card, grouped
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    let dashboard = state.indicator_service.get_dashboard().await;
    Json(DashboardView::from(dashboard))
}

/// Overview dashboard, streamed card by card as indicators are evaluated
pub async fn stream_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rx = state.streaming_service.stream_dashboard().await;
    stream_from_receiver(rx, StreamEventView::from)
}

/// Card and segmented chart for a single indicator
pub async fn get_indicator(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DetailView>, ApiError> {
    match state.indicator_service.get_indicator(&id).await? {
        Some(detail) => Ok(Json(DetailView::from(detail))),
        None => Err(ApiError::NotFound(id)),
    }
}
