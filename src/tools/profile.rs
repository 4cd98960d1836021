//! Profile Sync Tools
//!
//! Send cached person info to the server and pull the server profile back.

use serde::Serialize;

use crate::api::{ApiClient, ApiError, Endpoint};
use crate::db::Database;
use crate::models::{PersonInfo, UserInputModel, UserModel};

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub endpoint: &'static str,
    pub family_id: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct FetchProfileResponse {
    pub profile: UserModel,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteFamilyMemberResponse {
    pub success: bool,
    pub family_id: String,
    /// Whether a cached row was removed along with the server record
    pub cache_removed: bool,
}

#[derive(Debug, Serialize)]
pub struct FamilyMembersResponse {
    pub members: Vec<UserModel>,
    pub total: usize,
}

/// Pick the endpoint a cached row is submitted through
pub fn submit_endpoint(family_id: Option<&str>, intake: bool, model: UserInputModel) -> Endpoint {
    match (family_id, intake) {
        (Some(id), _) => Endpoint::UpdateFamilyMember {
            id: id.to_string(),
            model,
        },
        (None, true) => Endpoint::IntakeForm(model),
        (None, false) => Endpoint::UpdatePersonalInformation(model),
    }
}

/// Submit the cached person info for `family_id` (owner if `None`).
///
/// `intake` sends the owner's info through the first-run intake form
/// instead of the personal-information update.
pub async fn submit_person_info(
    db: &Database,
    client: &ApiClient,
    family_id: Option<&str>,
    intake: bool,
) -> Result<SubmitResponse, String> {
    let info = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
        PersonInfo::get(&conn, family_id)
            .map_err(|e| format!("Failed to get person info: {}", e))?
    }
    .ok_or_else(|| "No person info cached; call save_person_info first".to_string())?;

    let model = info.to_user_input();
    let body = model.request_body();
    let endpoint = submit_endpoint(family_id, intake, model);

    client
        .send(&endpoint)
        .await
        .map_err(|e| format!("Failed to submit person info: {}", e))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    PersonInfo::mark_synced(&conn, family_id)
        .map_err(|e| format!("Failed to mark person info synced: {}", e))?;

    Ok(SubmitResponse {
        success: true,
        endpoint: endpoint.name(),
        family_id: family_id.map(String::from),
        body,
    })
}

/// Fetch the signed-in user's profile and cache it as the owner's row
pub async fn fetch_user_profile(
    db: &Database,
    client: &ApiClient,
) -> Result<FetchProfileResponse, String> {
    let profile: UserModel = client
        .send_json(&Endpoint::GetUserProfile)
        .await
        .map_err(|e| format!("Failed to fetch profile: {}", e))?;

    let cached = cache_profile(db, None, &profile)?;
    Ok(FetchProfileResponse { profile, cached })
}

pub async fn get_family_members(client: &ApiClient) -> Result<FamilyMembersResponse, String> {
    let members: Vec<UserModel> = client
        .send_json(&Endpoint::GetFamilyMembers)
        .await
        .map_err(|e: ApiError| format!("Failed to fetch family members: {}", e))?;
    let total = members.len();
    Ok(FamilyMembersResponse { members, total })
}

/// Delete a family member on the server, then drop its cached row
pub async fn delete_family_member(
    db: &Database,
    client: &ApiClient,
    family_id: &str,
) -> Result<DeleteFamilyMemberResponse, String> {
    client
        .send(&Endpoint::DeleteFamilyMember { id: family_id.to_string() })
        .await
        .map_err(|e| format!("Failed to delete family member: {}", e))?;

    let cache_removed = drop_cached_member(db, family_id)?;
    Ok(DeleteFamilyMemberResponse {
        success: true,
        family_id: family_id.to_string(),
        cache_removed,
    })
}

/// Remove a member's cached row. A member that was never cached is not an error.
fn drop_cached_member(db: &Database, family_id: &str) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    PersonInfo::delete(&conn, Some(family_id)).map_err(|e| {
        tracing::error!(family_id, error = %e, "failed to drop cached family member");
        format!("Family member deleted on the server but its cached info was not removed: {}", e)
    })
}

/// Store a server profile; profiles without a measurement system are skipped
fn cache_profile(db: &Database, family_id: Option<&str>, profile: &UserModel) -> Result<bool, String> {
    if profile.measurement_system().is_none() {
        tracing::warn!(family_id = ?family_id, "profile has no measurement system, not cached");
        return Ok(false);
    }

    let input = UserInputModel {
        gender: profile.gender.clone(),
        female_state: profile.female_state.clone(),
        birth: profile.birth,
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        email: profile.email.clone(),
        climate: profile.climate.clone(),
        activity: profile.activity.clone(),
        activity_duration: profile.activity_duration.clone(),
        measurement: profile.measurement.clone(),
        height: profile.height,
        weight: profile.weight,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    PersonInfo::upsert(&conn, family_id, &input)
        .map_err(|e| format!("Failed to cache profile: {}", e))?;
    PersonInfo::mark_synced(&conn, family_id)
        .map_err(|e| format!("Failed to mark profile synced: {}", e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_submit_endpoint_selection() {
        let model = UserInputModel::default();
        assert_eq!(submit_endpoint(None, false, model.clone()).name(), "update_personal_information");
        assert_eq!(submit_endpoint(None, true, model.clone()).name(), "intake_form");
        assert_eq!(
            submit_endpoint(Some("f1"), true, model).path(),
            "/users/personal-information?family_id=f1"
        );
    }

    #[test]
    fn test_cache_profile() {
        let db = test_db();
        let profile = UserModel {
            first_name: Some("Ada".to_string()),
            measurement: Some("met".to_string()),
            height: Some(1.7),
            weight: Some(70.0),
            ..Default::default()
        };
        assert!(cache_profile(&db, None, &profile).unwrap());

        let row = db.with_conn(|conn| PersonInfo::get(conn, None)).unwrap().unwrap();
        assert_eq!(row.height, Some(1.7));
        assert!(row.synced_at.is_some());

        let unknown = UserModel::default();
        assert!(!cache_profile(&db, Some("f1"), &unknown).unwrap());
    }

    #[test]
    fn test_drop_cached_member() {
        let db = test_db();
        let member = UserInputModel {
            measurement: Some("imp".to_string()),
            ..Default::default()
        };
        db.with_conn(|conn| PersonInfo::upsert(conn, Some("f1"), &member)).unwrap();

        assert!(drop_cached_member(&db, "f1").unwrap());
        assert!(!drop_cached_member(&db, "f1").unwrap());
    }

    #[test]
    fn test_drop_cached_member_reports_database_errors() {
        let db = test_db();
        db.with_conn(|conn| Ok(conn.execute_batch("DROP TABLE person_info")?)).unwrap();

        let err = drop_cached_member(&db, "f1").unwrap_err();
        assert!(err.contains("cached info was not removed"));
    }

    #[tokio::test]
    async fn test_submit_without_cached_info() {
        let db = test_db();
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = submit_person_info(&db, &client, None, false).await.unwrap_err();
        assert!(err.contains("save_person_info"));
    }
}
