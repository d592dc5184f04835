use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::calculator::{
    self, CalculationRequest, UsageCalculation, UsageValidationError, WaterBill,
};
use super::domain::{UsageRecord, MANUAL_ENTRY_LABEL};
use super::ledger::{self, UsageLedgerError, UsageSummary};
use crate::engine::store::{StoreError, UsageRecordStore};

/// Error raised by the usage service.
#[derive(Debug, thiserror::Error)]
pub enum UsageServiceError {
    #[error(transparent)]
    Validation(#[from] UsageValidationError),
    #[error(transparent)]
    Ledger(#[from] UsageLedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Explicit save action; usually carries the figures from a prior
/// calculation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveUsageRequest {
    pub usage_liters: Option<f64>,
    pub activity_type: Option<String>,
    pub duration_minutes: Option<u32>,
}

/// Where the records behind a summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageDataSource {
    Csv,
    Store,
}

/// Service composing the calculator, the CSV ledger, and the record store.
pub struct UsageService<S> {
    store: Arc<S>,
}

impl<S> UsageService<S>
where
    S: UsageRecordStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Pure calculation; nothing is persisted.
    pub fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<UsageCalculation, UsageServiceError> {
        Ok(calculator::calculate(request)?)
    }

    /// Bill a meter reading pair at the flat tariff.
    pub fn bill(&self, previous: f64, current: f64) -> Result<WaterBill, UsageServiceError> {
        Ok(WaterBill::from_readings(previous, current)?)
    }

    /// Persist one record. The volume must come from a completed calculation;
    /// a missing or non-positive volume is rejected.
    pub fn save(&self, request: SaveUsageRequest) -> Result<UsageRecord, UsageServiceError> {
        let volume = request
            .usage_liters
            .filter(|liters| liters.is_finite() && *liters > 0.0)
            .ok_or(UsageValidationError::MissingVolume)?;

        let activity_type = request
            .activity_type
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| MANUAL_ENTRY_LABEL.to_string());

        let record = UsageRecord {
            usage_liters: volume,
            activity_type,
            duration_minutes: request.duration_minutes,
            recorded_at: Utc::now(),
        };
        Ok(self.store.insert(record)?)
    }

    /// All persisted records in insertion order.
    pub fn records(&self) -> Result<Vec<UsageRecord>, UsageServiceError> {
        Ok(self.store.list()?)
    }

    /// Summarize an uploaded CSV ledger when given one, otherwise the store
    /// contents.
    pub fn summary(
        &self,
        csv: Option<&str>,
    ) -> Result<(UsageSummary, UsageDataSource), UsageServiceError> {
        match csv {
            Some(export) => {
                let records = ledger::parse_records(export.as_bytes())?;
                Ok((UsageSummary::tally(&records), UsageDataSource::Csv))
            }
            None => {
                let records = self.store.list()?;
                Ok((UsageSummary::tally(&records), UsageDataSource::Store))
            }
        }
    }
}
