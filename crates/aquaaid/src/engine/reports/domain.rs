use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Category of a community-submitted water issue. Closed set; unknown wire
/// values fail deserialization instead of passing through as raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Leak,
    Contamination,
    DrySource,
    PoorQuality,
    Other,
}

impl ReportType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Leak,
            Self::Contamination,
            Self::DrySource,
            Self::PoorQuality,
            Self::Other,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leak => "Water Leak",
            Self::Contamination => "Contamination",
            Self::DrySource => "Dry Source",
            Self::PoorQuality => "Poor Quality",
            Self::Other => "Other",
        }
    }
}

/// Lifecycle state of a report. The engine only ever creates `Pending`;
/// transitions happen in an external moderation process and `Resolved` is
/// terminal there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

/// Intake payload for a new report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportSubmission {
    pub report_type: ReportType,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Persisted report. Immutable from the engine's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterReport {
    pub id: ReportId,
    pub report_type: ReportType,
    pub title: String,
    pub description: String,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}
