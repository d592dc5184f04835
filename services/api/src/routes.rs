use crate::infra::AppState;
use aquaaid::advisor::gateway::AdvisorGateway;
use aquaaid::advisor::{advisor_router, AdvisorService};
use aquaaid::engine::quality::{quality_router, QualityService};
use aquaaid::engine::reports::{report_router, ReportService};
use aquaaid::engine::store::{QualityReadingStore, UsageRecordStore, WaterReportStore};
use aquaaid::engine::usage::{usage_router, UsageService};
use aquaaid::onboarding::{welcome_router, WelcomeFlagStore};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_engine_routes<Q, U, R, G, W>(
    quality: Arc<QualityService<Q>>,
    usage: Arc<UsageService<U>>,
    reports: Arc<ReportService<R>>,
    advisor: Arc<AdvisorService<G>>,
    welcome: Arc<W>,
) -> axum::Router
where
    Q: QualityReadingStore + 'static,
    U: UsageRecordStore + 'static,
    R: WaterReportStore + 'static,
    G: AdvisorGateway + 'static,
    W: WelcomeFlagStore + 'static,
{
    quality_router(quality)
        .merge(usage_router(usage))
        .merge(report_router(reports))
        .merge(advisor_router(advisor))
        .merge(welcome_router(welcome))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
