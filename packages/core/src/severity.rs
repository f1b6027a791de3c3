// ABOUTME: Fixed seven-level severity scale used to render moderation categories
// ABOUTME: Maps raw service values to labels and colors, falling back to Unknown for anything off-scale

use serde_json::Value;
use std::fmt;

/// Label shown for values outside the 0..=6 scale
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Neutral color shown for values outside the 0..=6 scale
pub const NEUTRAL_COLOR: &str = "#6c757d";

/// One step of the ordinal severity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityLevel {
    Safe,
    Low,
    Medium,
    High,
    VeryHigh,
    Extreme,
    Critical,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 7] = [
        SeverityLevel::Safe,
        SeverityLevel::Low,
        SeverityLevel::Medium,
        SeverityLevel::High,
        SeverityLevel::VeryHigh,
        SeverityLevel::Extreme,
        SeverityLevel::Critical,
    ];

    /// Look up a level by its ordinal, `None` when outside 0..=6
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityLevel::Safe => "Safe",
            SeverityLevel::Low => "Low",
            SeverityLevel::Medium => "Medium",
            SeverityLevel::High => "High",
            SeverityLevel::VeryHigh => "Very High",
            SeverityLevel::Extreme => "Extreme",
            SeverityLevel::Critical => "Critical",
        }
    }

    /// Hex color, paired: Safe/Low green, Medium/High amber, Very High orange, Extreme/Critical red
    pub fn color(self) -> &'static str {
        match self {
            SeverityLevel::Safe | SeverityLevel::Low => "#28a745",
            SeverityLevel::Medium | SeverityLevel::High => "#ffc107",
            SeverityLevel::VeryHigh => "#fd7e14",
            SeverityLevel::Extreme | SeverityLevel::Critical => "#dc3545",
        }
    }
}

/// A category severity as reported by the service.
///
/// The service is trusted only structurally, so anything that is not an
/// integral number in range becomes `Unknown` instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Level(SeverityLevel),
    Unknown,
}

impl Severity {
    pub fn from_value(value: &Value) -> Self {
        integral(value)
            .and_then(SeverityLevel::from_ordinal)
            .map(Severity::Level)
            .unwrap_or(Severity::Unknown)
    }

    pub fn level(self) -> Option<SeverityLevel> {
        match self {
            Severity::Level(level) => Some(level),
            Severity::Unknown => None,
        }
    }

    pub fn label(self) -> &'static str {
        self.level().map(SeverityLevel::label).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn color(self) -> &'static str {
        self.level().map(SeverityLevel::color).unwrap_or(NEUTRAL_COLOR)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for a raw severity value
pub fn label(value: &Value) -> &'static str {
    Severity::from_value(value).label()
}

/// Color for a raw severity value
pub fn color(value: &Value) -> &'static str {
    Severity::from_value(value).color()
}

// 2 and 2.0 are the same ordinal; 2.5, "2", true and null are not.
fn integral(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
