use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ReportId, ReportStatus, ReportType, WaterReport};

/// Counts per lifecycle state. Tallying partitions the input set exactly:
/// the three buckets always sum to the set size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusBreakdown {
    pub fn tally(reports: &[WaterReport]) -> Self {
        let mut breakdown = Self::default();
        for report in reports {
            match report.status {
                ReportStatus::Pending => breakdown.pending += 1,
                ReportStatus::InProgress => breakdown.in_progress += 1,
                ReportStatus::Resolved => breakdown.resolved += 1,
            }
        }
        breakdown
    }

    pub const fn total(&self) -> usize {
        self.pending + self.in_progress + self.resolved
    }
}

/// Wire rendering of one report, labels included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub id: ReportId,
    pub report_type: ReportType,
    pub type_label: &'static str,
    pub status: ReportStatus,
    pub status_label: &'static str,
    pub title: String,
    pub description: String,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl WaterReport {
    pub fn to_view(&self) -> ReportView {
        ReportView {
            id: self.id.clone(),
            report_type: self.report_type,
            type_label: self.report_type.label(),
            status: self.status,
            status_label: self.status.label(),
            title: self.title.clone(),
            description: self.description.clone(),
            location_name: self.location_name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
        }
    }
}

/// Everything the reports page shows: newest-first views plus the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportsOverview {
    pub total: usize,
    pub breakdown: StatusBreakdown,
    pub reports: Vec<ReportView>,
}

impl ReportsOverview {
    pub fn build(mut reports: Vec<WaterReport>) -> Self {
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let breakdown = StatusBreakdown::tally(&reports);
        Self {
            total: reports.len(),
            breakdown,
            reports: reports.iter().map(WaterReport::to_view).collect(),
        }
    }
}
