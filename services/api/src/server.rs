use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryQualityStore, InMemoryReportStore, InMemoryUsageStore, InMemoryWelcomeStore,
};
use crate::routes::with_engine_routes;
use aquaaid::advisor::{AdvisorService, GeminiClient};
use aquaaid::config::AppConfig;
use aquaaid::engine::quality::{QualityService, QualityThresholds};
use aquaaid::engine::reports::ReportService;
use aquaaid::engine::usage::UsageService;
use aquaaid::error::AppError;
use aquaaid::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let quality_service = Arc::new(QualityService::new(
        Arc::new(InMemoryQualityStore::default()),
        QualityThresholds::standard(),
    ));
    let usage_service = Arc::new(UsageService::new(Arc::new(InMemoryUsageStore::default())));
    let report_service = Arc::new(ReportService::new(Arc::new(InMemoryReportStore::default())));
    let advisor_service = Arc::new(AdvisorService::new(Arc::new(GeminiClient::new(
        &config.advisor,
    ))));
    let welcome_store = Arc::new(InMemoryWelcomeStore::default());

    let app = with_engine_routes(
        quality_service,
        usage_service,
        report_service,
        advisor_service,
        welcome_store,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "water metrics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
