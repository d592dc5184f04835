use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{ReportId, ReportStatus, ReportSubmission, WaterReport};
use super::summary::ReportsOverview;
use crate::engine::store::{StoreError, WaterReportStore};

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error("report title must not be empty")]
    EmptyTitle,
    #[error("report description must not be empty")]
    EmptyDescription,
    #[error(transparent)]
    Store(#[from] StoreError),
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("wr-{id:06}"))
}

/// Service for report intake and the aggregate overview.
pub struct ReportService<S> {
    store: Arc<S>,
}

impl<S> ReportService<S>
where
    S: WaterReportStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate, stamp, and persist a new report. Every report enters the
    /// lifecycle as `Pending` no matter what the caller sends.
    pub fn submit(&self, submission: ReportSubmission) -> Result<WaterReport, ReportServiceError> {
        let title = submission.title.trim().to_string();
        if title.is_empty() {
            return Err(ReportServiceError::EmptyTitle);
        }
        let description = submission.description.trim().to_string();
        if description.is_empty() {
            return Err(ReportServiceError::EmptyDescription);
        }
        let location_name = submission
            .location_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let report = WaterReport {
            id: next_report_id(),
            report_type: submission.report_type,
            title,
            description,
            location_name,
            latitude: submission.latitude,
            longitude: submission.longitude,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        };
        Ok(self.store.insert(report)?)
    }

    /// Newest-first views plus the status breakdown.
    pub fn overview(&self) -> Result<ReportsOverview, ReportServiceError> {
        Ok(ReportsOverview::build(self.store.list()?))
    }
}
