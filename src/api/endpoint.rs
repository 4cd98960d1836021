//! Personal-information REST endpoints

use reqwest::Method;
use serde_json::{json, Value};

use crate::measurement::MeasurementSystem;
use crate::models::UserInputModel;

/// Notification time sent with user settings (one day, in ms)
const NOTIFICATION_TIME_MS: i64 = 86_400_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    GetUserProfile,
    UpdatePersonalInformation(UserInputModel),
    IntakeForm(UserInputModel),
    UpdateUserSettings { measurement: MeasurementSystem },
    GetFamilyMembers,
    AddFamilyMember(UserInputModel),
    UpdateFamilyMember { id: String, model: UserInputModel },
    DeleteFamilyMember { id: String },
}

impl Endpoint {
    /// Path and query, appended to the base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::GetUserProfile => "/users/profile".to_string(),
            Endpoint::UpdatePersonalInformation(_) => "/users/personal-information".to_string(),
            Endpoint::IntakeForm(_) => "/users/intake-form".to_string(),
            Endpoint::UpdateUserSettings { .. } => "/users/settings".to_string(),
            Endpoint::GetFamilyMembers => "/users/family-members".to_string(),
            Endpoint::AddFamilyMember(_) => "/users/family-member".to_string(),
            Endpoint::UpdateFamilyMember { id, .. } => {
                format!("/users/personal-information?family_id={}", id)
            }
            Endpoint::DeleteFamilyMember { id } => format!("/users/family-members/{}", id),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::GetUserProfile | Endpoint::GetFamilyMembers => Method::GET,
            Endpoint::AddFamilyMember(_) => Method::POST,
            Endpoint::UpdatePersonalInformation(_)
            | Endpoint::IntakeForm(_)
            | Endpoint::UpdateUserSettings { .. }
            | Endpoint::UpdateFamilyMember { .. } => Method::PUT,
            Endpoint::DeleteFamilyMember { .. } => Method::DELETE,
        }
    }

    /// JSON body, if the endpoint sends one
    pub fn body(&self) -> Option<Value> {
        match self {
            Endpoint::UpdatePersonalInformation(model)
            | Endpoint::IntakeForm(model)
            | Endpoint::AddFamilyMember(model)
            | Endpoint::UpdateFamilyMember { model, .. } => Some(model.request_body()),
            Endpoint::UpdateUserSettings { measurement } => Some(json!({
                "measurement": measurement.api_value(),
                "language": "eng",
                "country": "us",
                "currency": "usDollar",
                "notificationTime": NOTIFICATION_TIME_MS,
            })),
            Endpoint::GetUserProfile
            | Endpoint::GetFamilyMembers
            | Endpoint::DeleteFamilyMember { .. } => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GetUserProfile => "get_user_profile",
            Endpoint::UpdatePersonalInformation(_) => "update_personal_information",
            Endpoint::IntakeForm(_) => "intake_form",
            Endpoint::UpdateUserSettings { .. } => "update_user_settings",
            Endpoint::GetFamilyMembers => "get_family_members",
            Endpoint::AddFamilyMember(_) => "add_family_member",
            Endpoint::UpdateFamilyMember { .. } => "update_family_member",
            Endpoint::DeleteFamilyMember { .. } => "delete_family_member",
        }
    }
}
