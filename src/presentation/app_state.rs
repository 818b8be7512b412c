// Application state for HTTP handlers
use crate::application::indicator_service::IndicatorService;
use crate::application::streaming_service::StreamingDashboardService;

#[derive(Clone)]
pub struct AppState {
    pub indicator_service: IndicatorService,
    pub streaming_service: StreamingDashboardService,
}
