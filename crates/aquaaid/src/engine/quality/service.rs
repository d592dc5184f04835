use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use super::domain::{QualityReading, QualityVerdict, WaterSample};
use super::rules::{self, QualityThresholds};
use crate::engine::store::{QualityReadingStore, StoreError};

/// Validation failure for a submitted sample. Mirrors the intake form, where
/// a zero or non-numeric field never reaches the classifier.
#[derive(Debug, thiserror::Error)]
#[error("{field} must be a finite, non-zero number")]
pub struct InvalidReading {
    pub field: &'static str,
}

/// Error raised by the quality service.
#[derive(Debug, thiserror::Error)]
pub enum QualityServiceError {
    #[error(transparent)]
    Validation(#[from] InvalidReading),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a classification: the verdict, the record written to the store,
/// and a warning when the write failed (the verdict still stands).
#[derive(Debug, Clone, Serialize)]
pub struct QualityAnalysis {
    pub verdict: QualityVerdict,
    pub reading: QualityReading,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_warning: Option<String>,
}

/// Service composing sample validation, the threshold rules, and the reading
/// store.
pub struct QualityService<S> {
    store: Arc<S>,
    thresholds: QualityThresholds,
}

impl<S> QualityService<S>
where
    S: QualityReadingStore + 'static,
{
    pub fn new(store: Arc<S>, thresholds: QualityThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Classify a sample and persist the reading best-effort: a failed write
    /// is reported alongside the verdict, never instead of it.
    pub fn analyze(&self, sample: WaterSample) -> Result<QualityAnalysis, QualityServiceError> {
        validate_sample(&sample)?;

        let issues = rules::detect_issues(&sample, &self.thresholds);
        let verdict = rules::classify(&issues);
        let reading = QualityReading::from_sample(&sample, verdict.status, Utc::now());

        let save_warning = match self.store.insert(reading.clone()) {
            Ok(_) => None,
            Err(err) => {
                warn!(status = verdict.status.label(), error = %err, "quality reading not persisted");
                Some(format!("analysis complete, but the reading was not saved: {err}"))
            }
        };

        Ok(QualityAnalysis {
            verdict,
            reading,
            save_warning,
        })
    }

    /// All persisted readings in insertion order.
    pub fn readings(&self) -> Result<Vec<QualityReading>, QualityServiceError> {
        Ok(self.store.list()?)
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }
}

fn validate_sample(sample: &WaterSample) -> Result<(), InvalidReading> {
    for (field, value) in [
        ("ph", sample.ph),
        ("temperature", sample.temperature),
        ("turbidity", sample.turbidity),
        ("conductivity", sample.conductivity),
    ] {
        if !value.is_finite() || value == 0.0 {
            return Err(InvalidReading { field });
        }
    }
    Ok(())
}
