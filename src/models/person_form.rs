//! Person-info form state
//!
//! Owns the height and weight fields of the person-info form together with
//! the imperial/metric toggle, and turns them into a `UserInputModel`.

use serde::Serialize;

use crate::measurement::{
    convert_api_height, convert_weight, feet_inches_to_decimal_feet, feet_to_feet_inches,
    parse_number, HeightUnit, HeightValue, MeasurementSystem, WeightUnit, WeightValue,
    CM_PER_METER,
};
use crate::models::{UserInputModel, UserModel};

/// In-memory state of the person-info form
#[derive(Debug, Clone, Default)]
pub struct PersonInfoForm {
    measurement: MeasurementSystem,
    weight: Option<WeightValue>,
    height: Option<HeightValue>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub female_state: Option<String>,
    pub birth: Option<i64>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    /// Family-member forms hide the email field
    pub needs_email: bool,
}

/// Field texts and labels as the form shows them
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub measurement: MeasurementSystem,
    pub weight_label: String,
    pub height_label: String,
    pub weight_text: Option<String>,
    pub height_text: Option<String>,
    pub weight: Option<WeightValue>,
    pub height: Option<HeightValue>,
}

impl PersonInfoForm {
    pub fn new(measurement: MeasurementSystem) -> Self {
        Self {
            measurement,
            needs_email: true,
            ..Default::default()
        }
    }

    pub fn measurement(&self) -> MeasurementSystem {
        self.measurement
    }

    pub fn weight(&self) -> Option<WeightValue> {
        self.weight
    }

    pub fn height(&self) -> Option<HeightValue> {
        self.height
    }

    pub fn weight_unit(&self) -> WeightUnit {
        self.measurement.weight_unit()
    }

    pub fn height_unit(&self) -> HeightUnit {
        self.measurement.height_unit()
    }

    /// Switch the system without converting existing values
    pub fn set_measurement_system(&mut self, measurement: MeasurementSystem) {
        self.measurement = measurement;
    }

    pub fn set_weight(&mut self, value: f64) {
        self.weight = Some(WeightValue::new(value, self.weight_unit()));
    }

    pub fn set_height(&mut self, height: HeightValue) {
        self.height = Some(height.convert(self.height_unit()));
    }

    /// Weight picker confirmation
    pub fn confirm_weight(&mut self, text: &str) {
        self.set_weight(parse_number(text));
    }

    /// Height picker confirmation
    pub fn confirm_height(&mut self, text: &str) {
        self.height = Some(HeightValue::parse(text, self.height_unit()));
    }

    /// Flip the imperial/metric toggle, converting weight and height.
    ///
    /// A zero weight is left alone, as is a missing height.
    pub fn toggle(&mut self, to_metric: bool) {
        let target = MeasurementSystem::from_metric_flag(to_metric);
        if target == self.measurement {
            tracing::debug!(?target, "measurement toggle unchanged");
            return;
        }

        let weight = self.weight.map(|w| w.value()).unwrap_or(0.0);
        let converted = if to_metric {
            convert_weight(weight, WeightUnit::Pounds)
        } else {
            convert_weight(weight, WeightUnit::Kilograms)
        };
        if converted != 0.0 {
            self.weight = Some(WeightValue::new(converted, target.weight_unit()));
        } else if let Some(w) = self.weight {
            self.weight = Some(WeightValue::new(w.value(), target.weight_unit()));
        }

        if let Some(height) = self.height {
            self.height = Some(height.convert(target.height_unit()));
        }

        tracing::debug!(
            from = ?self.measurement,
            to = ?target,
            weight = ?self.weight,
            height = ?self.height,
            "converted person info measurements"
        );
        self.measurement = target;
    }

    /// Load a server profile into the form.
    ///
    /// `session_system` is the measurement system of the signed-in account.
    /// Values are shown in that system; a profile stored in the other one
    /// (a family member, for example) is converted first.
    pub fn configure(&mut self, user: &UserModel, session_system: MeasurementSystem) {
        self.first_name = user.first_name.clone();
        self.last_name = user.last_name.clone();
        self.email = user.email.clone();
        self.gender = user.gender.clone();
        self.female_state = user.female_state.clone();
        self.birth = user.birth;
        self.climate = user.climate.clone();
        self.activity = user.activity.clone();
        self.activity_duration = user.activity_duration.clone();
        self.measurement = session_system;

        let needs_conversion = user
            .measurement_system()
            .map(|stored| stored != session_system)
            .unwrap_or(false);

        if let Some(weight) = user.weight {
            let unit = session_system.weight_unit();
            let current = if needs_conversion {
                convert_weight(weight, unit.other())
            } else {
                weight
            };
            self.weight = Some(WeightValue::new(current, unit));
        }

        if let Some(height) = user.height {
            let unit = session_system.height_unit();
            let current = if needs_conversion {
                convert_api_height(height, unit)
            } else {
                height
            };
            self.height = Some(match unit {
                HeightUnit::Feet => {
                    let fi = feet_to_feet_inches(current);
                    HeightValue::feet_inches(fi.feet, fi.inches)
                }
                HeightUnit::Centimeters => {
                    HeightValue::centimeters((current * CM_PER_METER).trunc())
                }
            });
        }
    }

    /// Build the submission payload
    pub fn user_input(&self) -> UserInputModel {
        let height = self.height.map(|h| match h {
            HeightValue::Centimeters { value } => value / CM_PER_METER,
            HeightValue::FeetInches { feet, inches } => feet_inches_to_decimal_feet(feet, inches),
        });

        UserInputModel {
            gender: self.gender.clone(),
            female_state: self.female_state.clone(),
            birth: self.birth,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            climate: self.climate.clone(),
            activity: self.activity.clone(),
            activity_duration: self.activity_duration.clone(),
            measurement: Some(self.measurement.api_value().to_string()),
            height,
            weight: self.weight.map(|w| w.value()),
        }
    }

    pub fn weight_label(&self) -> String {
        format!("WEIGHT ({})", self.weight_unit().abbreviation().to_uppercase())
    }

    pub fn height_label(&self) -> String {
        format!("HEIGHT ({})", self.height_unit().abbreviation().to_uppercase())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            measurement: self.measurement,
            weight_label: self.weight_label(),
            height_label: self.height_label(),
            weight_text: self.weight.map(|w| w.display()),
            height_text: self.height.map(|h| h.display()),
            weight: self.weight,
            height: self.height,
        }
    }

    /// Names must not be blank or contain digits
    pub fn check_name_fields(&self) -> (bool, bool) {
        (is_valid_name(&self.first_name), is_valid_name(&self.last_name))
    }

    /// Whether every required field is filled in
    pub fn is_valid(&self) -> bool {
        let (first_ok, last_ok) = self.check_name_fields();
        let email_ok = !self.needs_email
            || self.email.as_deref().map(|e| e.contains('@')).unwrap_or(false);
        let weight_ok = self.weight.map(|w| w.value() > 0.0).unwrap_or(false);
        let height_ok = self.height.map(|h| !h.is_zero()).unwrap_or(false);

        first_ok && last_ok && email_ok && self.gender.is_some() && self.birth.is_some()
            && weight_ok && height_ok
    }
}

fn is_valid_name(name: &Option<String>) -> bool {
    match name.as_deref() {
        Some(n) => !n.trim().is_empty() && !n.chars().any(|c| c.is_ascii_digit()),
        None => false,
    }
}
