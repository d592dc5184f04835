//! Water quality classification over four sensor parameters.
//!
//! Samples are validated, checked against per-parameter safe ranges, and
//! mapped onto a four-tier verdict keyed by the number of breached
//! parameters. Every classified sample is persisted as a reading.

pub mod domain;
pub mod router;
pub(crate) mod rules;
pub mod service;

pub use domain::{ParameterIssue, QualityReading, QualityStatus, QualityVerdict, WaterSample};
pub use router::quality_router;
pub use rules::QualityThresholds;
pub use service::{InvalidReading, QualityAnalysis, QualityService, QualityServiceError};
