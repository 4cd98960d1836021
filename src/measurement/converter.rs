//! Height and weight conversion functions
//!
//! Conversions between the imperial and metric representations of the
//! person-info form. Input text comes from pickers and is parsed leniently:
//! anything unparseable becomes zero.

use super::units::{
    FeetInches, HeightUnit, WeightUnit, CM_PER_FOOT, CM_PER_METER, INCHES_PER_FOOT, LBS_PER_KG,
};

// ============================================================================
// Weight
// ============================================================================

/// Convert a weight out of the `from` unit into the other unit.
///
/// Kilograms are multiplied by 2.2, pounds are divided by 2.2. No rounding
/// is applied; use [`format_weight`] for display.
pub fn convert_weight(value: f64, from: WeightUnit) -> f64 {
    match from {
        WeightUnit::Kilograms => value * LBS_PER_KG,
        WeightUnit::Pounds => value / LBS_PER_KG,
    }
}

/// Format a weight with two decimals, e.g. `"154.00"`
pub fn format_weight(value: f64) -> String {
    format!("{:.2}", value)
}

// ============================================================================
// Height
// ============================================================================

/// Split a centimeter height into feet and rounded inches.
///
/// Rounding can yield `inches == 12` (e.g. 182.5 cm gives `5' 12''`); the
/// value is returned without rolling over into the next foot.
pub fn height_to_feet_inches(centimeters: f64) -> FeetInches {
    feet_to_feet_inches(centimeters / CM_PER_FOOT)
}

/// Split a decimal feet value into whole feet and rounded inches
pub fn feet_to_feet_inches(total_feet: f64) -> FeetInches {
    let feet = total_feet.trunc();
    let inches = (total_feet.fract() * INCHES_PER_FOOT).round();
    FeetInches::new(feet as u32, inches as u32)
}

/// Convert feet and inches to centimeters.
///
/// Inches 10 and 11 go through plain arithmetic. Every other value is
/// rebuilt as the compact `"feet.inches"` number and its fractional digits
/// are read back as inches, so `5.6` means six inches. The two branches
/// round differently and are kept apart to reproduce stored values.
pub fn feet_inches_to_height(feet: u32, inches: u32) -> f64 {
    match inches {
        10 | 11 => f64::from(feet) * CM_PER_FOOT + (CM_PER_FOOT / INCHES_PER_FOOT) * f64::from(inches),
        _ => compact_to_decimal_feet(compact_value(feet, inches)) * CM_PER_FOOT,
    }
}

/// Convert feet and inches to decimal feet, the unit imperial heights are
/// submitted in. Same branch split as [`feet_inches_to_height`].
pub fn feet_inches_to_decimal_feet(feet: u32, inches: u32) -> f64 {
    match inches {
        10 | 11 => f64::from(feet) + f64::from(inches) / INCHES_PER_FOOT,
        _ => compact_to_decimal_feet(compact_value(feet, inches)),
    }
}

/// Read the fractional digits of a compact feet value as inches.
///
/// `5.6` becomes `5 + 6/12`. The digits are taken from the shortest textual
/// form of the number, so `5.0` contributes no inches.
pub fn compact_to_decimal_feet(compact: f64) -> f64 {
    let whole = compact.trunc();
    let text = compact.to_string();
    let inches = text
        .split_once('.')
        .and_then(|(_, digits)| digits.parse::<i64>().ok())
        .unwrap_or(0);
    whole + inches as f64 / INCHES_PER_FOOT
}

/// Convert a height as stored on the server into the other system.
///
/// Server heights are meters in metric and decimal feet in imperial.
/// Converting to [`HeightUnit::Feet`] takes meters, converting to
/// [`HeightUnit::Centimeters`] takes feet and returns meters.
pub fn convert_api_height(value: f64, to: HeightUnit) -> f64 {
    match to {
        HeightUnit::Feet => value * CM_PER_METER / CM_PER_FOOT,
        HeightUnit::Centimeters => value * CM_PER_FOOT / CM_PER_METER,
    }
}

/// Format a centimeter height, e.g. `"167.64"`. Whole centimeters, as
/// loaded from a stored profile, print without decimals.
pub fn format_centimeters(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn compact_value(feet: u32, inches: u32) -> f64 {
    parse_number(&FeetInches::new(feet, inches).compact())
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a numeric field. Empty, malformed, or non-finite input is zero.
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse an imperial height field.
///
/// Accepts the display form (`5' 6''`), the compact form (`5.6`, `5.10`)
/// and whole feet (`6`). Unparseable parts are zero.
pub fn parse_feet_inches(text: &str) -> FeetInches {
    let trimmed = text.trim();

    if let Some((feet, rest)) = trimmed.split_once('\'') {
        let inches = rest.trim().trim_end_matches('\'').trim_end_matches('"').trim();
        return FeetInches::new(parse_whole(feet), parse_whole(inches));
    }

    match trimmed.split_once('.') {
        Some((feet, inches)) => FeetInches::new(parse_whole(feet), parse_whole(inches)),
        None => FeetInches::new(parse_whole(trimmed), 0),
    }
}

fn parse_whole(text: &str) -> u32 {
    text.trim().parse::<u32>().unwrap_or(0)
}
