//! Community water-issue reports: intake, lifecycle states, and the
//! aggregate overview. Status transitions happen in an external moderation
//! process; this engine creates reports as `pending` and counts them.

pub mod domain;
pub mod router;
pub mod service;
pub mod summary;

pub use domain::{ReportId, ReportStatus, ReportSubmission, ReportType, WaterReport};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};
pub use summary::{ReportView, ReportsOverview, StatusBreakdown};
