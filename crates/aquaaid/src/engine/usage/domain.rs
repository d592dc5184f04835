use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label applied to records saved from meter-delta calculations.
pub const METER_READING_LABEL: &str = "Meter Reading";
/// Label applied to records saved from monthly projections.
pub const MONTHLY_CALCULATION_LABEL: &str = "Monthly Calculation";
/// Label applied to direct-entry records with no activity selected.
pub const MANUAL_ENTRY_LABEL: &str = "Manual Entry";

/// Which input group a calculation resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    Direct,
    Activity,
    Meter,
    Monthly,
}

/// How an activity's rate applies: per minute of use, or per use regardless
/// of duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateBasis {
    PerMinute,
    PerUse,
}

impl RateBasis {
    pub const fn unit_label(self) -> &'static str {
        match self {
            Self::PerMinute => "L/min",
            Self::PerUse => "L",
        }
    }
}

/// Liters consumed per minute or per use of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionRate {
    pub liters: f64,
    pub basis: RateBasis,
}

impl ConsumptionRate {
    const fn per_minute(liters: f64) -> Self {
        Self {
            liters,
            basis: RateBasis::PerMinute,
        }
    }

    const fn per_use(liters: f64) -> Self {
        Self {
            liters,
            basis: RateBasis::PerUse,
        }
    }
}

/// Household activities with a known consumption rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Shower,
    Bath,
    Toilet,
    WashingMachine,
    Dishwasher,
    BrushingTeeth,
    WashingHands,
    Cooking,
    Drinking,
    Garden,
}

impl Activity {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Shower,
            Self::Bath,
            Self::Toilet,
            Self::WashingMachine,
            Self::Dishwasher,
            Self::BrushingTeeth,
            Self::WashingHands,
            Self::Cooking,
            Self::Drinking,
            Self::Garden,
        ]
    }

    /// Wire key, also used as the `activity_type` tag on saved records.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Shower => "shower",
            Self::Bath => "bath",
            Self::Toilet => "toilet",
            Self::WashingMachine => "washing_machine",
            Self::Dishwasher => "dishwasher",
            Self::BrushingTeeth => "brushing_teeth",
            Self::WashingHands => "washing_hands",
            Self::Cooking => "cooking",
            Self::Drinking => "drinking",
            Self::Garden => "garden",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shower => "Shower",
            Self::Bath => "Bath",
            Self::Toilet => "Toilet Flush",
            Self::WashingMachine => "Washing Machine",
            Self::Dishwasher => "Dishwasher",
            Self::BrushingTeeth => "Brushing Teeth",
            Self::WashingHands => "Washing Hands",
            Self::Cooking => "Cooking",
            Self::Drinking => "Drinking",
            Self::Garden => "Watering Garden",
        }
    }

    pub const fn rate(self) -> ConsumptionRate {
        match self {
            Self::Shower => ConsumptionRate::per_minute(9.0),
            Self::Bath => ConsumptionRate::per_use(80.0),
            Self::Toilet => ConsumptionRate::per_use(6.0),
            Self::WashingMachine => ConsumptionRate::per_use(50.0),
            Self::Dishwasher => ConsumptionRate::per_use(20.0),
            Self::BrushingTeeth => ConsumptionRate::per_minute(2.0),
            Self::WashingHands => ConsumptionRate::per_minute(1.5),
            Self::Cooking => ConsumptionRate::per_minute(5.0),
            Self::Drinking => ConsumptionRate::per_use(2.0),
            Self::Garden => ConsumptionRate::per_minute(10.0),
        }
    }
}

/// Store record for one saved consumption figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub usage_liters: f64,
    /// Activity key or one of the mode labels.
    pub activity_type: String,
    pub duration_minutes: Option<u32>,
    pub recorded_at: DateTime<Utc>,
}
