use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::WaterSample;
use super::service::{QualityService, QualityServiceError};
use crate::engine::store::{QualityReadingStore, StoreError};

/// Router builder exposing HTTP endpoints for sample analysis and reading
/// history.
pub fn quality_router<S>(service: Arc<QualityService<S>>) -> Router
where
    S: QualityReadingStore + 'static,
{
    Router::new()
        .route("/api/v1/quality/analyses", post(analyze_handler::<S>))
        .route("/api/v1/quality/readings", get(readings_handler::<S>))
        .with_state(service)
}

pub(crate) async fn analyze_handler<S>(
    State(service): State<Arc<QualityService<S>>>,
    axum::Json(sample): axum::Json<WaterSample>,
) -> Response
where
    S: QualityReadingStore + 'static,
{
    match service.analyze(sample) {
        Ok(analysis) => (StatusCode::OK, axum::Json(analysis)).into_response(),
        Err(QualityServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn readings_handler<S>(
    State(service): State<Arc<QualityService<S>>>,
) -> Response
where
    S: QualityReadingStore + 'static,
{
    match service.readings() {
        Ok(readings) => (StatusCode::OK, axum::Json(readings)).into_response(),
        Err(QualityServiceError::Store(StoreError::Unavailable(detail))) => {
            let payload = json!({
                "error": detail,
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
