use super::quality::QualityReading;
use super::reports::WaterReport;
use super::usage::UsageRecord;

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Storage abstraction over the quality readings table so services can be
/// exercised in isolation. Append-only: the engine never updates or deletes.
pub trait QualityReadingStore: Send + Sync {
    fn insert(&self, reading: QualityReading) -> Result<QualityReading, StoreError>;
    /// All readings in insertion order.
    fn list(&self) -> Result<Vec<QualityReading>, StoreError>;
}

/// Storage abstraction over the usage records table.
pub trait UsageRecordStore: Send + Sync {
    fn insert(&self, record: UsageRecord) -> Result<UsageRecord, StoreError>;
    /// All records in insertion order.
    fn list(&self) -> Result<Vec<UsageRecord>, StoreError>;
}

/// Storage abstraction over the issue reports table. Status transitions are
/// applied by an external moderation process, never through this trait.
pub trait WaterReportStore: Send + Sync {
    fn insert(&self, report: WaterReport) -> Result<WaterReport, StoreError>;
    /// All reports in insertion order.
    fn list(&self) -> Result<Vec<WaterReport>, StoreError>;
}
