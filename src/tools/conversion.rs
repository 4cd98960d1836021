//! Conversion Tools
//!
//! Stateless height/weight conversion tools.

use serde::Serialize;

use crate::measurement::{
    convert_weight, feet_inches_to_height, format_centimeters, format_weight,
    height_to_feet_inches, HeightValue, MeasurementSystem, WeightUnit,
};
use crate::models::{FormSnapshot, PersonInfoForm};

#[derive(Debug, Serialize)]
pub struct ConvertWeightResponse {
    pub from: WeightUnit,
    pub to: WeightUnit,
    pub input: f64,
    pub value: f64,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct FeetInchesResponse {
    pub centimeters: f64,
    pub feet: u32,
    pub inches: u32,
    pub display: String,
    /// Set when rounding produced 12 inches, which is not rolled over
    pub twelve_inches: bool,
}

#[derive(Debug, Serialize)]
pub struct CentimetersResponse {
    pub feet: u32,
    pub inches: u32,
    pub centimeters: f64,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub before: FormSnapshot,
    pub after: FormSnapshot,
}

/// Convert a weight out of `from` into the other unit
pub fn convert_weight_value(value: f64, from: &str) -> Result<ConvertWeightResponse, String> {
    let unit = WeightUnit::from_str(from)
        .ok_or_else(|| format!("Invalid weight unit: '{}'. Valid units: kg, lbs", from))?;
    let converted = convert_weight(value, unit);

    Ok(ConvertWeightResponse {
        from: unit,
        to: unit.other(),
        input: value,
        value: converted,
        display: format_weight(converted),
    })
}

pub fn centimeters_to_feet_inches(centimeters: f64) -> FeetInchesResponse {
    let fi = height_to_feet_inches(centimeters);
    if fi.inches == 12 {
        tracing::warn!(centimeters, feet = fi.feet, "height rounded to 12 inches");
    }

    FeetInchesResponse {
        centimeters,
        feet: fi.feet,
        inches: fi.inches,
        display: fi.to_string(),
        twelve_inches: fi.inches == 12,
    }
}

pub fn feet_inches_to_centimeters(feet: u32, inches: u32) -> CentimetersResponse {
    let centimeters = feet_inches_to_height(feet, inches);
    CentimetersResponse {
        feet,
        inches,
        centimeters,
        display: format_centimeters(centimeters),
    }
}

/// Run the form toggle on the given field values.
///
/// `weight` and `height` are in the units of `from`; the height is form
/// text (`5' 6''`, `5.6`, `167.64`).
pub fn toggle_measurement(
    from: &str,
    weight: Option<f64>,
    height: Option<&str>,
    to_metric: bool,
) -> Result<ToggleResponse, String> {
    let system = MeasurementSystem::from_str(from).ok_or_else(|| {
        format!("Invalid measurement system: '{}'. Valid: imperial, metric", from)
    })?;

    let mut form = PersonInfoForm::new(system);
    if let Some(w) = weight {
        form.set_weight(w);
    }
    if let Some(text) = height {
        form.confirm_height(text);
    }

    let before = form.snapshot();
    form.toggle(to_metric);

    Ok(ToggleResponse {
        before,
        after: form.snapshot(),
    })
}

/// Canonical centimeters for form text in `system`
pub fn height_text_to_centimeters(text: &str, system: MeasurementSystem) -> f64 {
    HeightValue::parse(text, system.height_unit()).to_centimeters()
}
