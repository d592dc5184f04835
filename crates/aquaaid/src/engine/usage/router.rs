use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::calculator::CalculationRequest;
use super::domain::{Activity, RateBasis};
use super::service::{SaveUsageRequest, UsageService, UsageServiceError};
use crate::engine::store::{StoreError, UsageRecordStore};

/// Router builder exposing HTTP endpoints for calculations, saved records,
/// the rate table, and ledger summaries.
pub fn usage_router<S>(service: Arc<UsageService<S>>) -> Router
where
    S: UsageRecordStore + 'static,
{
    Router::new()
        .route("/api/v1/usage/calculations", post(calculate_handler::<S>))
        .route(
            "/api/v1/usage/records",
            post(save_handler::<S>).get(records_handler::<S>),
        )
        .route("/api/v1/usage/activities", get(activities_handler))
        .route("/api/v1/usage/summary", post(summary_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    #[serde(default)]
    csv: Option<String>,
}

#[derive(Debug, Serialize)]
struct ActivityRateView {
    activity: Activity,
    label: &'static str,
    liters: f64,
    basis: RateBasis,
    unit: &'static str,
}

pub(crate) async fn calculate_handler<S>(
    State(service): State<Arc<UsageService<S>>>,
    axum::Json(request): axum::Json<CalculationRequest>,
) -> Response
where
    S: UsageRecordStore + 'static,
{
    match service.calculate(&request) {
        Ok(calculation) => (StatusCode::OK, axum::Json(calculation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_handler<S>(
    State(service): State<Arc<UsageService<S>>>,
    axum::Json(request): axum::Json<SaveUsageRequest>,
) -> Response
where
    S: UsageRecordStore + 'static,
{
    match service.save(request) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn records_handler<S>(
    State(service): State<Arc<UsageService<S>>>,
) -> Response
where
    S: UsageRecordStore + 'static,
{
    match service.records() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn activities_handler() -> Response {
    let rates = Activity::ordered()
        .into_iter()
        .map(|activity| {
            let rate = activity.rate();
            ActivityRateView {
                activity,
                label: activity.label(),
                liters: rate.liters,
                basis: rate.basis,
                unit: rate.basis.unit_label(),
            }
        })
        .collect::<Vec<_>>();
    (StatusCode::OK, axum::Json(rates)).into_response()
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<UsageService<S>>>,
    axum::Json(request): axum::Json<SummaryRequest>,
) -> Response
where
    S: UsageRecordStore + 'static,
{
    match service.summary(request.csv.as_deref()) {
        Ok((summary, source)) => {
            let payload = json!({
                "source": source,
                "summary": summary,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: UsageServiceError) -> Response {
    let status = match &error {
        UsageServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        UsageServiceError::Ledger(_) => StatusCode::BAD_REQUEST,
        UsageServiceError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        UsageServiceError::Store(StoreError::Rejected(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
