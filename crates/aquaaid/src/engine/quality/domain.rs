use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw sensor readings submitted for classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub ph: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Nephelometric turbidity units.
    pub turbidity: f64,
    /// Microsiemens per centimeter.
    pub conductivity: f64,
}

/// Four-tier safety verdict over a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QualityStatus::Excellent => "excellent",
            QualityStatus::Good => "good",
            QualityStatus::Fair => "fair",
            QualityStatus::Poor => "poor",
        }
    }

    /// Display accent clients use when rendering the verdict.
    pub const fn color_tag(self) -> &'static str {
        match self {
            QualityStatus::Excellent => "green",
            QualityStatus::Good => "blue",
            QualityStatus::Fair => "yellow",
            QualityStatus::Poor => "red",
        }
    }
}

/// Threshold breach detected in a sample; each parameter contributes at most
/// one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterIssue {
    PhOutOfRange,
    TemperatureTooHigh,
    ExcessTurbidity,
    UnusualMineralContent,
}

impl ParameterIssue {
    pub const fn description(self) -> &'static str {
        match self {
            ParameterIssue::PhOutOfRange => "pH out of safe range",
            ParameterIssue::TemperatureTooHigh => "temperature too high",
            ParameterIssue::ExcessTurbidity => "water too cloudy",
            ParameterIssue::UnusualMineralContent => "unusual mineral content",
        }
    }
}

/// Safety verdict returned to the caller alongside the persisted reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityVerdict {
    pub status: QualityStatus,
    pub color_tag: &'static str,
    pub message: String,
}

/// Store record for an analyzed sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReading {
    pub ph: f64,
    pub temperature: f64,
    pub turbidity: f64,
    pub conductivity: f64,
    pub quality_status: QualityStatus,
    pub recorded_at: DateTime<Utc>,
}

impl QualityReading {
    pub fn from_sample(
        sample: &WaterSample,
        status: QualityStatus,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ph: sample.ph,
            temperature: sample.temperature,
            turbidity: sample.turbidity,
            conductivity: sample.conductivity,
            quality_status: status,
            recorded_at,
        }
    }
}
