use serde::{Deserialize, Serialize};

use super::domain::{
    Activity, CalculationMode, MANUAL_ENTRY_LABEL, METER_READING_LABEL, MONTHLY_CALCULATION_LABEL,
};

/// Flat currency rate charged per metered unit.
pub const TARIFF_SHILLINGS_PER_UNIT: f64 = 200.0;

/// Days assumed per month when projecting daily consumption.
pub const MONTHLY_PROJECTION_DAYS: f64 = 30.0;

/// Input rejected before any arithmetic or store call runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageValidationError {
    #[error("provide liters, an activity with a duration, meter readings, or a daily volume")]
    MissingInput,
    #[error("request mixes calculation modes; provide exactly one input group")]
    AmbiguousInput,
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("duration is required for activity calculations")]
    MissingDuration,
    #[error("duration must be a positive number of minutes")]
    NonPositiveDuration,
    #[error("after reading must be ≥ before reading")]
    MeterReadingsOutOfOrder,
    #[error("current reading must be ≥ previous reading")]
    BillReadingsOutOfOrder,
    #[error("calculate a water volume before saving")]
    MissingVolume,
}

/// One calculation request; exactly one input group must be populated.
///
/// Group one is the direct/activity pair (a literal liter value wins over an
/// activity), group two is the meter reading pair, group three is the daily
/// volume for a monthly projection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CalculationRequest {
    pub liters: Option<f64>,
    pub activity: Option<Activity>,
    pub duration_minutes: Option<f64>,
    pub meter_before: Option<f64>,
    pub meter_after: Option<f64>,
    pub daily_liters: Option<f64>,
}

/// Result of a calculation, carrying everything a save action needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageCalculation {
    pub mode: CalculationMode,
    pub volume_liters: f64,
    pub cubic_meters: f64,
    /// Tag a saved record gets: an activity key or one of the mode labels.
    pub activity_type: String,
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill: Option<WaterBill>,
}

/// Metered bill at the flat tariff. Units are whatever the meter reads in,
/// never converted to liters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterBill {
    pub previous_reading: f64,
    pub current_reading: f64,
    pub units_used: f64,
    pub total_shillings: f64,
}

impl WaterBill {
    /// Bill a reading pair, rejecting regressions so the total can never go
    /// negative.
    pub fn from_readings(previous: f64, current: f64) -> Result<Self, UsageValidationError> {
        require_finite("previous reading", previous)?;
        require_finite("current reading", current)?;
        require_non_negative("previous reading", previous)?;
        require_non_negative("current reading", current)?;
        if current < previous {
            return Err(UsageValidationError::BillReadingsOutOfOrder);
        }

        let units_used = current - previous;
        Ok(Self {
            previous_reading: previous,
            current_reading: current,
            units_used,
            total_shillings: units_used * TARIFF_SHILLINGS_PER_UNIT,
        })
    }

    /// One-line rendering used as advisor context.
    pub fn summary_line(&self) -> String {
        format!(
            "Previous reading: {} units, Current reading: {} units, Units used: {} units, \
             Total bill: {} shillings (@ 200 shillings/unit)",
            self.previous_reading, self.current_reading, self.units_used, self.total_shillings
        )
    }
}

/// Resolve the request to a single mode and run its arithmetic.
pub fn calculate(request: &CalculationRequest) -> Result<UsageCalculation, UsageValidationError> {
    let direct_group = request.liters.is_some()
        || request.activity.is_some()
        || request.duration_minutes.is_some();
    let meter_group = request.meter_before.is_some() || request.meter_after.is_some();
    let monthly_group = request.daily_liters.is_some();

    match (direct_group, meter_group, monthly_group) {
        (false, false, false) => Err(UsageValidationError::MissingInput),
        (true, false, false) => calculate_direct(request),
        (false, true, false) => calculate_meter(request),
        (false, false, true) => calculate_monthly(request),
        _ => Err(UsageValidationError::AmbiguousInput),
    }
}

fn calculate_direct(
    request: &CalculationRequest,
) -> Result<UsageCalculation, UsageValidationError> {
    if let Some(liters) = request.liters {
        require_finite("liters", liters)?;
        require_non_negative("liters", liters)?;
        let activity_type = match request.activity {
            Some(activity) => activity.key().to_string(),
            None => MANUAL_ENTRY_LABEL.to_string(),
        };
        return Ok(build(
            CalculationMode::Direct,
            liters,
            activity_type,
            request.duration_minutes,
            None,
        ));
    }

    let activity = request.activity.ok_or(UsageValidationError::MissingInput)?;
    let duration = request
        .duration_minutes
        .ok_or(UsageValidationError::MissingDuration)?;
    require_finite("duration", duration)?;
    if duration <= 0.0 {
        return Err(UsageValidationError::NonPositiveDuration);
    }

    // The rate table multiplies per-use rates by duration too; the basis tag
    // on the rate is informational only.
    let volume = activity.rate().liters * duration;
    Ok(build(
        CalculationMode::Activity,
        volume,
        activity.key().to_string(),
        Some(duration),
        None,
    ))
}

fn calculate_meter(request: &CalculationRequest) -> Result<UsageCalculation, UsageValidationError> {
    let before = request
        .meter_before
        .ok_or(UsageValidationError::MissingInput)?;
    let after = request
        .meter_after
        .ok_or(UsageValidationError::MissingInput)?;
    require_finite("before reading", before)?;
    require_finite("after reading", after)?;
    require_non_negative("before reading", before)?;
    require_non_negative("after reading", after)?;
    if after < before {
        return Err(UsageValidationError::MeterReadingsOutOfOrder);
    }

    // Meter readings are cubic meters; 1 m3 = 1000 L. The bill stays in
    // meter units.
    let volume = (after - before) * 1000.0;
    let bill = WaterBill::from_readings(before, after)?;
    Ok(build(
        CalculationMode::Meter,
        volume,
        METER_READING_LABEL.to_string(),
        None,
        Some(bill),
    ))
}

fn calculate_monthly(
    request: &CalculationRequest,
) -> Result<UsageCalculation, UsageValidationError> {
    let daily = request
        .daily_liters
        .ok_or(UsageValidationError::MissingInput)?;
    require_finite("daily liters", daily)?;
    require_non_negative("daily liters", daily)?;

    Ok(build(
        CalculationMode::Monthly,
        daily * MONTHLY_PROJECTION_DAYS,
        MONTHLY_CALCULATION_LABEL.to_string(),
        None,
        None,
    ))
}

fn build(
    mode: CalculationMode,
    volume_liters: f64,
    activity_type: String,
    duration_minutes: Option<f64>,
    bill: Option<WaterBill>,
) -> UsageCalculation {
    UsageCalculation {
        mode,
        volume_liters,
        cubic_meters: volume_liters / 1000.0,
        activity_type,
        duration_minutes: duration_minutes.map(|minutes| minutes as u32),
        bill,
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), UsageValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(UsageValidationError::NotFinite { field })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), UsageValidationError> {
    if value < 0.0 {
        Err(UsageValidationError::Negative { field })
    } else {
        Ok(())
    }
}
