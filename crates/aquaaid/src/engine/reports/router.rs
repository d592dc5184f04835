use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::ReportSubmission;
use super::service::{ReportService, ReportServiceError};
use crate::engine::store::{StoreError, WaterReportStore};

/// Router builder exposing HTTP endpoints for report intake and the
/// overview.
pub fn report_router<S>(service: Arc<ReportService<S>>) -> Router
where
    S: WaterReportStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            post(submit_handler::<S>).get(overview_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
    axum::Json(submission): axum::Json<ReportSubmission>,
) -> Response
where
    S: WaterReportStore + 'static,
{
    match service.submit(submission) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report.to_view())).into_response(),
        Err(error @ (ReportServiceError::EmptyTitle | ReportServiceError::EmptyDescription)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => store_error_response(other),
    }
}

pub(crate) async fn overview_handler<S>(
    State(service): State<Arc<ReportService<S>>>,
) -> Response
where
    S: WaterReportStore + 'static,
{
    match service.overview() {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => store_error_response(error),
    }
}

fn store_error_response(error: ReportServiceError) -> Response {
    let status = match &error {
        ReportServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
