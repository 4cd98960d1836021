//! Measurement types and conversion constants
//!
//! Types for the person-info height and weight fields and the fixed factors
//! the conversions use.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Conversion Constants
// ============================================================================

/// Centimeters per foot
pub const CM_PER_FOOT: f64 = 30.48;
/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;
/// Centimeters per meter (API heights in metric are meters)
pub const CM_PER_METER: f64 = 100.0;
/// Pounds per kilogram. Fixed at 2.2, not 2.20462: stored profiles depend on it.
pub const LBS_PER_KG: f64 = 2.2;

// ============================================================================
// Measurement System
// ============================================================================

/// Imperial/metric toggle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    #[default]
    Imperial,
    Metric,
}

impl MeasurementSystem {
    /// Value sent in the `measurement` field of profile requests
    pub fn api_value(&self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "imp",
            MeasurementSystem::Metric => "met",
        }
    }

    /// Title shown on the toggle
    pub fn title(&self) -> &'static str {
        match self {
            MeasurementSystem::Imperial => "IMPERIAL",
            MeasurementSystem::Metric => "METRIC",
        }
    }

    /// Parse from an API value or a user-facing name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "imp" | "imperial" => Some(MeasurementSystem::Imperial),
            "met" | "metric" => Some(MeasurementSystem::Metric),
            _ => None,
        }
    }

    pub fn from_metric_flag(is_metric: bool) -> Self {
        if is_metric {
            MeasurementSystem::Metric
        } else {
            MeasurementSystem::Imperial
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, MeasurementSystem::Metric)
    }

    pub fn weight_unit(&self) -> WeightUnit {
        match self {
            MeasurementSystem::Imperial => WeightUnit::Pounds,
            MeasurementSystem::Metric => WeightUnit::Kilograms,
        }
    }

    pub fn height_unit(&self) -> HeightUnit {
        match self {
            MeasurementSystem::Imperial => HeightUnit::Feet,
            MeasurementSystem::Metric => HeightUnit::Centimeters,
        }
    }
}

// ============================================================================
// Units
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[serde(alias = "kg")]
    Kilograms,
    #[serde(alias = "lbs", alias = "lb")]
    Pounds,
}

impl WeightUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Pounds => "lbs",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            WeightUnit::Kilograms => WeightUnit::Pounds,
            WeightUnit::Pounds => WeightUnit::Kilograms,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" => Some(WeightUnit::Kilograms),
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Pounds),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[serde(alias = "cm")]
    Centimeters,
    #[serde(alias = "ft")]
    Feet,
}

impl HeightUnit {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Centimeters => "cm",
            HeightUnit::Feet => "ft",
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A height split into whole feet and inches.
///
/// `inches` is normally in `0..=11`, but rounding in
/// [`height_to_feet_inches`](super::height_to_feet_inches) can produce 12.
/// No rollover into `feet` is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: u32,
}

impl FeetInches {
    pub fn new(feet: u32, inches: u32) -> Self {
        Self { feet, inches }
    }

    /// The `"feet.inches"` text the form keeps for imperial heights,
    /// e.g. `"5.6"` or `"5.10"`
    pub fn compact(&self) -> String {
        format!("{}.{}", self.feet, self.inches)
    }
}

impl fmt::Display for FeetInches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}' {}''", self.feet, self.inches)
    }
}

/// Height in either of the two form representations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum HeightValue {
    Centimeters { value: f64 },
    FeetInches { feet: u32, inches: u32 },
}

impl HeightValue {
    pub fn centimeters(value: f64) -> Self {
        HeightValue::Centimeters { value }
    }

    pub fn feet_inches(feet: u32, inches: u32) -> Self {
        HeightValue::FeetInches { feet, inches }
    }

    /// Canonical centimeter value
    pub fn to_centimeters(&self) -> f64 {
        match *self {
            HeightValue::Centimeters { value } => value,
            HeightValue::FeetInches { feet, inches } => super::feet_inches_to_height(feet, inches),
        }
    }

    /// Convert into the representation for `unit`
    pub fn convert(&self, unit: HeightUnit) -> Self {
        match (*self, unit) {
            (HeightValue::Centimeters { value }, HeightUnit::Feet) => {
                let fi = super::height_to_feet_inches(value);
                HeightValue::FeetInches { feet: fi.feet, inches: fi.inches }
            }
            (HeightValue::FeetInches { .. }, HeightUnit::Centimeters) => {
                HeightValue::centimeters(self.to_centimeters())
            }
            (same, _) => same,
        }
    }

    /// Text shown in the height field
    pub fn display(&self) -> String {
        match *self {
            HeightValue::Centimeters { value } => super::format_centimeters(value),
            HeightValue::FeetInches { feet, inches } => FeetInches::new(feet, inches).to_string(),
        }
    }

    /// Parse field text in the given unit. Unparseable text becomes zero.
    pub fn parse(text: &str, unit: HeightUnit) -> Self {
        match unit {
            HeightUnit::Centimeters => HeightValue::centimeters(super::parse_number(text)),
            HeightUnit::Feet => {
                let fi = super::parse_feet_inches(text);
                HeightValue::FeetInches { feet: fi.feet, inches: fi.inches }
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            HeightValue::Centimeters { value } => value == 0.0,
            HeightValue::FeetInches { feet, inches } => feet == 0 && inches == 0,
        }
    }
}

/// Weight in kilograms or pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum WeightValue {
    Kilograms(f64),
    Pounds(f64),
}

impl WeightValue {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        match unit {
            WeightUnit::Kilograms => WeightValue::Kilograms(value),
            WeightUnit::Pounds => WeightValue::Pounds(value),
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            WeightValue::Kilograms(v) | WeightValue::Pounds(v) => v,
        }
    }

    pub fn unit(&self) -> WeightUnit {
        match self {
            WeightValue::Kilograms(_) => WeightUnit::Kilograms,
            WeightValue::Pounds(_) => WeightUnit::Pounds,
        }
    }

    pub fn convert(&self, unit: WeightUnit) -> Self {
        if self.unit() == unit {
            return *self;
        }
        WeightValue::new(super::convert_weight(self.value(), self.unit()), unit)
    }

    /// Two-decimal text shown in the weight field
    pub fn display(&self) -> String {
        super::format_weight(self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_system_units() {
        assert_eq!(MeasurementSystem::Imperial.weight_unit(), WeightUnit::Pounds);
        assert_eq!(MeasurementSystem::Imperial.height_unit(), HeightUnit::Feet);
        assert_eq!(MeasurementSystem::Metric.weight_unit(), WeightUnit::Kilograms);
        assert_eq!(MeasurementSystem::Metric.height_unit(), HeightUnit::Centimeters);
    }

    #[test]
    fn test_measurement_system_parse() {
        assert_eq!(MeasurementSystem::from_str("imp"), Some(MeasurementSystem::Imperial));
        assert_eq!(MeasurementSystem::from_str("Metric"), Some(MeasurementSystem::Metric));
        assert_eq!(MeasurementSystem::from_str("met"), Some(MeasurementSystem::Metric));
        assert_eq!(MeasurementSystem::from_str("stone"), None);
        assert_eq!(MeasurementSystem::Imperial.api_value(), "imp");
    }

    #[test]
    fn test_feet_inches_display() {
        let fi = FeetInches::new(5, 6);
        assert_eq!(fi.to_string(), "5' 6''");
        assert_eq!(fi.compact(), "5.6");
        assert_eq!(FeetInches::new(5, 10).compact(), "5.10");
    }

    #[test]
    fn test_weight_value_convert() {
        let kg = WeightValue::Kilograms(70.0);
        let lbs = kg.convert(WeightUnit::Pounds);
        assert_eq!(lbs.unit(), WeightUnit::Pounds);
        assert!((lbs.value() - 154.0).abs() < 1e-9);
        assert_eq!(lbs.display(), "154.00");
        assert_eq!(kg.convert(WeightUnit::Kilograms), kg);
    }

    #[test]
    fn test_height_value_display_round_trip() {
        let height = HeightValue::feet_inches(5, 11);
        let parsed = HeightValue::parse(&height.display(), HeightUnit::Feet);
        assert_eq!(parsed, height);
        assert!((parsed.to_centimeters() - height.to_centimeters()).abs() < 1e-9);

        let cm = HeightValue::centimeters(167.64);
        let parsed = HeightValue::parse(&cm.display(), HeightUnit::Centimeters);
        assert!((parsed.to_centimeters() - 167.64).abs() < 1e-9);
    }

    #[test]
    fn test_height_value_serde_shape() {
        let json = serde_json::to_value(HeightValue::feet_inches(5, 6)).unwrap();
        assert_eq!(json, serde_json::json!({"unit": "feet_inches", "feet": 5, "inches": 6}));
    }
}
