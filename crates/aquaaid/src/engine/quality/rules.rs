use super::domain::{ParameterIssue, QualityStatus, QualityVerdict, WaterSample};

/// Safe-range limits applied to each sensor parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub ph_min: f64,
    pub ph_max: f64,
    pub temperature_max: f64,
    pub turbidity_max: f64,
    pub conductivity_min: f64,
    pub conductivity_max: f64,
}

impl QualityThresholds {
    /// Limits the product ships with, aligned with common drinking-water
    /// guidance.
    pub const fn standard() -> Self {
        Self {
            ph_min: 6.5,
            ph_max: 8.5,
            temperature_max: 30.0,
            turbidity_max: 5.0,
            conductivity_min: 50.0,
            conductivity_max: 1500.0,
        }
    }
}

/// Check every parameter against its range; order-independent, each parameter
/// contributes at most one issue.
pub(crate) fn detect_issues(
    sample: &WaterSample,
    thresholds: &QualityThresholds,
) -> Vec<ParameterIssue> {
    let mut issues = Vec::new();

    if sample.ph < thresholds.ph_min || sample.ph > thresholds.ph_max {
        issues.push(ParameterIssue::PhOutOfRange);
    }
    if sample.temperature > thresholds.temperature_max {
        issues.push(ParameterIssue::TemperatureTooHigh);
    }
    if sample.turbidity > thresholds.turbidity_max {
        issues.push(ParameterIssue::ExcessTurbidity);
    }
    if sample.conductivity < thresholds.conductivity_min
        || sample.conductivity > thresholds.conductivity_max
    {
        issues.push(ParameterIssue::UnusualMineralContent);
    }

    issues
}

/// Map an issue list onto the four-tier verdict. The tier depends only on how
/// many parameters breached their range, never on which ones.
pub(crate) fn classify(issues: &[ParameterIssue]) -> QualityVerdict {
    let described = issues
        .iter()
        .map(|issue| issue.description())
        .collect::<Vec<_>>()
        .join(", ");

    let (status, message) = match issues.len() {
        0 => (
            QualityStatus::Excellent,
            "Water quality is excellent! All parameters are within safe ranges.".to_string(),
        ),
        1 => (
            QualityStatus::Good,
            format!("Water quality is acceptable but {described}. Consider treatment."),
        ),
        2 => (
            QualityStatus::Fair,
            format!("Water quality needs attention: {described}. Treatment recommended."),
        ),
        _ => (
            QualityStatus::Poor,
            format!("Water quality is poor: {described}. Treatment required before use."),
        ),
    };

    QualityVerdict {
        status,
        color_tag: status.color_tag(),
        message,
    }
}
