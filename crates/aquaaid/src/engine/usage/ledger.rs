use std::collections::BTreeMap;
use std::io::Read;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::UsageRecord;

/// Failure while reading an exported usage ledger.
#[derive(Debug, thiserror::Error)]
pub enum UsageLedgerError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("row {row}: usage_liters {value} is not a positive volume")]
    InvalidVolume { row: usize, value: f64 },
}

/// Parse a CSV export with `activity_type, usage_liters, duration_minutes`
/// headers into usage records stamped at import time. Any invalid row fails
/// the whole import.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<UsageRecord>, UsageLedgerError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<LedgerRow>().enumerate() {
        let row = row?;
        if !row.usage_liters.is_finite() || row.usage_liters <= 0.0 {
            return Err(UsageLedgerError::InvalidVolume {
                row: index + 1,
                value: row.usage_liters,
            });
        }

        records.push(UsageRecord {
            usage_liters: row.usage_liters,
            activity_type: row.activity_type,
            duration_minutes: row.duration_minutes,
            recorded_at: Utc::now(),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    activity_type: String,
    usage_liters: f64,
    #[serde(default)]
    duration_minutes: Option<u32>,
}

/// Per-label slice of a summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityUsage {
    pub activity_type: String,
    pub record_count: usize,
    pub total_liters: f64,
}

/// Aggregate view over a set of usage records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    pub record_count: usize,
    pub total_liters: f64,
    pub cubic_meters: f64,
    pub by_activity: Vec<ActivityUsage>,
}

impl UsageSummary {
    /// Tally records by their `activity_type` tag, largest consumers first;
    /// equal volumes fall back to label order.
    pub fn tally(records: &[UsageRecord]) -> Self {
        let mut buckets: BTreeMap<&str, ActivityUsage> = BTreeMap::new();
        for record in records {
            buckets
                .entry(record.activity_type.as_str())
                .and_modify(|entry| {
                    entry.record_count += 1;
                    entry.total_liters += record.usage_liters;
                })
                .or_insert_with(|| ActivityUsage {
                    activity_type: record.activity_type.clone(),
                    record_count: 1,
                    total_liters: record.usage_liters,
                });
        }

        let mut by_activity: Vec<ActivityUsage> = buckets.into_values().collect();
        by_activity.sort_by(|a, b| b.total_liters.total_cmp(&a.total_liters));

        let total_liters: f64 = records.iter().map(|record| record.usage_liters).sum();
        Self {
            record_count: records.len(),
            total_liters,
            cubic_meters: total_liters / 1000.0,
            by_activity,
        }
    }
}
