//! Water usage accounting: three calculation modes, flat-tariff billing,
//! saved consumption records, and ledger summaries.
//!
//! A calculation request resolves to exactly one mode (direct or activity
//! volume, meter delta, monthly projection). Saving is a separate explicit
//! action that persists one immutable record.

pub mod calculator;
pub mod domain;
pub(crate) mod ledger;
pub mod router;
pub mod service;

pub use calculator::{
    CalculationRequest, UsageCalculation, UsageValidationError, WaterBill,
    MONTHLY_PROJECTION_DAYS, TARIFF_SHILLINGS_PER_UNIT,
};
pub use domain::{
    Activity, CalculationMode, ConsumptionRate, RateBasis, UsageRecord, MANUAL_ENTRY_LABEL,
    METER_READING_LABEL, MONTHLY_CALCULATION_LABEL,
};
pub use ledger::{ActivityUsage, UsageLedgerError, UsageSummary};
pub use router::usage_router;
pub use service::{SaveUsageRequest, UsageDataSource, UsageService, UsageServiceError};
