//! Profile payload models
//!
//! `UserInputModel` is what the person-info form submits; `UserModel` is the
//! profile the server returns.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::measurement::MeasurementSystem;

/// Person info submitted to the personal-information, intake-form and
/// family-member endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInputModel {
    pub gender: Option<String>,
    pub female_state: Option<String>,
    /// Birth date in milliseconds since the Unix epoch
    pub birth: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    /// `"imp"` or `"met"`
    pub measurement: Option<String>,
    /// Meters in metric, decimal feet in imperial
    pub height: Option<f64>,
    /// Kilograms in metric, pounds in imperial
    pub weight: Option<f64>,
}

impl UserInputModel {
    /// JSON body for profile requests. Missing text fields are sent as
    /// empty strings and missing numbers as zero.
    pub fn request_body(&self) -> Value {
        json!({
            "gender": self.gender.as_deref().unwrap_or(""),
            "femaleState": self.female_state.as_deref().unwrap_or(""),
            "birth": self.birth.unwrap_or(0),
            "firstName": self.first_name.as_deref().unwrap_or(""),
            "lastName": self.last_name.as_deref().unwrap_or(""),
            "email": self.email.as_deref().unwrap_or(""),
            "climate": self.climate.as_deref().unwrap_or(""),
            "activity": self.activity.as_deref().unwrap_or(""),
            "activityDuration": self.activity_duration.as_deref().unwrap_or(""),
            "measurement": self.measurement.as_deref().unwrap_or(""),
            "height": self.height.unwrap_or(0.0),
            "weight": self.weight.unwrap_or(0.0),
        })
    }

    pub fn measurement_system(&self) -> Option<MeasurementSystem> {
        self.measurement.as_deref().and_then(MeasurementSystem::from_str)
    }
}

/// Profile returned by `GET /users/profile` and the family-member list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserModel {
    #[serde(alias = "_id")]
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub female_state: Option<String>,
    pub birth: Option<i64>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    pub measurement: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl UserModel {
    pub fn measurement_system(&self) -> Option<MeasurementSystem> {
        self.measurement.as_deref().and_then(MeasurementSystem::from_str)
    }
}

impl From<UserInputModel> for UserModel {
    fn from(input: UserInputModel) -> Self {
        Self {
            id: None,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            gender: input.gender,
            female_state: input.female_state,
            birth: input.birth,
            climate: input.climate,
            activity: input.activity,
            activity_duration: input.activity_duration,
            measurement: input.measurement,
            height: input.height,
            weight: input.weight,
        }
    }
}
