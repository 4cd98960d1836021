//! Measurement conversion module
//!
//! Handles imperial/metric height and weight conversion for the person-info form.

pub mod converter;
pub mod units;

pub use converter::{
    compact_to_decimal_feet, convert_api_height, convert_weight, feet_inches_to_decimal_feet,
    feet_inches_to_height, feet_to_feet_inches, format_centimeters, format_weight,
    height_to_feet_inches, parse_feet_inches, parse_number,
};
pub use units::{
    FeetInches, HeightUnit, HeightValue, MeasurementSystem, WeightUnit, WeightValue, CM_PER_FOOT,
    CM_PER_METER, INCHES_PER_FOOT, LBS_PER_KG,
};
