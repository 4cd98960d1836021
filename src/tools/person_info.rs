//! Person Info Tools
//!
//! Tools for filling in the person-info form and caching the result.

use serde::Serialize;

use crate::db::Database;
use crate::measurement::MeasurementSystem;
use crate::models::{FormSnapshot, PersonInfo, PersonInfoForm};
use crate::tools::conversion::height_text_to_centimeters;

/// Form field values as entered
#[derive(Debug, Clone, Default)]
pub struct PersonInfoInput {
    pub measurement: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub female_state: Option<String>,
    pub birth: Option<i64>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    /// Weight in the units of `measurement`
    pub weight: Option<f64>,
    /// Height field text (`5' 6''`, `5.6`, `170`)
    pub height: Option<String>,
}

/// Cached row together with how the form shows it
#[derive(Debug, Serialize)]
pub struct PersonInfoDetail {
    pub info: PersonInfo,
    pub form: FormSnapshot,
    pub height_cm: Option<f64>,
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct ListPersonInfoResponse {
    pub people: Vec<PersonInfo>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub family_id: Option<String>,
}

fn detail(info: PersonInfo, form: &PersonInfoForm) -> PersonInfoDetail {
    let height_cm = form.height().map(|h| h.to_centimeters());
    PersonInfoDetail {
        info,
        form: form.snapshot(),
        height_cm,
        valid: form.is_valid(),
    }
}

/// Validate the form values and cache them for `family_id` (owner if `None`)
pub fn save_person_info(
    db: &Database,
    family_id: Option<&str>,
    input: PersonInfoInput,
) -> Result<PersonInfoDetail, String> {
    let system = MeasurementSystem::from_str(&input.measurement).ok_or_else(|| {
        format!(
            "Invalid measurement system: '{}'. Valid: imperial, metric",
            input.measurement
        )
    })?;

    let mut form = PersonInfoForm::new(system);
    form.needs_email = family_id.is_none();
    form.first_name = input.first_name;
    form.last_name = input.last_name;
    form.email = input.email;
    form.gender = input.gender;
    form.female_state = input.female_state;
    form.birth = input.birth;
    form.climate = input.climate;
    form.activity = input.activity;
    form.activity_duration = input.activity_duration;
    if let Some(w) = input.weight {
        form.set_weight(w);
    }
    if let Some(h) = input.height.as_deref() {
        form.confirm_height(h);
        tracing::debug!(
            text = h,
            centimeters = height_text_to_centimeters(h, system),
            "height confirmed"
        );
    }

    let (first_ok, last_ok) = form.check_name_fields();
    if !first_ok || !last_ok {
        return Err("Invalid name! Names must not be blank or contain digits".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let info = PersonInfo::upsert(&conn, family_id, &form.user_input())
        .map_err(|e| format!("Failed to save person info: {}", e))?;

    tracing::info!(family_id = ?family_id, measurement = ?system, "saved person info");
    Ok(detail(info, &form))
}

/// Load a cached row and show it in `session_system`
pub fn get_person_info(
    db: &Database,
    family_id: Option<&str>,
    session_system: MeasurementSystem,
) -> Result<Option<PersonInfoDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let info = PersonInfo::get(&conn, family_id)
        .map_err(|e| format!("Failed to get person info: {}", e))?;

    Ok(info.map(|info| {
        let mut form = PersonInfoForm::new(session_system);
        form.needs_email = info.family_id.is_none();
        form.configure(&info.to_user_model(), session_system);
        detail(info, &form)
    }))
}

pub fn list_person_info(db: &Database) -> Result<ListPersonInfoResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let people = PersonInfo::list(&conn)
        .map_err(|e| format!("Failed to list person info: {}", e))?;
    let total = people.len();
    Ok(ListPersonInfoResponse { people, total })
}

pub fn delete_person_info(db: &Database, family_id: Option<&str>) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = PersonInfo::delete(&conn, family_id)
        .map_err(|e| format!("Failed to delete person info: {}", e))?;

    if !deleted {
        return Err(match family_id {
            Some(id) => format!("No person info cached for family member: {}", id),
            None => "No person info cached for the account owner".to_string(),
        });
    }

    Ok(DeleteResponse {
        success: true,
        family_id: family_id.map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::measurement::HeightValue;

    fn test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    fn imperial_input() -> PersonInfoInput {
        PersonInfoInput {
            measurement: "imperial".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            gender: Some("female".to_string()),
            birth: Some(-4_780_000_000_000),
            weight: Some(154.0),
            height: Some("5' 10''".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_imperial_stores_decimal_feet() {
        let db = test_db();
        let detail = save_person_info(&db, None, imperial_input()).unwrap();
        assert_eq!(detail.info.measurement, MeasurementSystem::Imperial);
        assert_eq!(detail.info.height, Some(5.0 + 10.0 / 12.0));
        assert_eq!(detail.info.weight, Some(154.0));
        assert_eq!(detail.form.height_text.as_deref(), Some("5' 10''"));
        assert!((detail.height_cm.unwrap() - 177.8).abs() < 1e-6);
        assert!(detail.valid);
    }

    #[test]
    fn test_save_rejects_bad_names_and_systems() {
        let db = test_db();
        let mut input = imperial_input();
        input.first_name = Some("Ada1".to_string());
        assert!(save_person_info(&db, None, input).is_err());

        let mut input = imperial_input();
        input.measurement = "cubits".to_string();
        assert!(save_person_info(&db, None, input).is_err());
    }

    #[test]
    fn test_get_in_other_system() {
        let db = test_db();
        save_person_info(&db, None, imperial_input()).unwrap();

        let detail = get_person_info(&db, None, MeasurementSystem::Metric).unwrap().unwrap();
        assert!((detail.form.weight.unwrap().value() - 70.0).abs() < 0.1);
        // 5' 10'' is 1.778 m, truncated to whole centimeters
        assert_eq!(detail.form.height, Some(HeightValue::centimeters(177.0)));
    }

    #[test]
    fn test_get_same_system() {
        let db = test_db();
        let mut input = imperial_input();
        input.height = Some("5' 6''".to_string());
        save_person_info(&db, None, input).unwrap();

        let detail = get_person_info(&db, None, MeasurementSystem::Imperial).unwrap().unwrap();
        assert_eq!(detail.form.height_text.as_deref(), Some("5' 6''"));
        assert_eq!(detail.form.weight_text.as_deref(), Some("154.00"));
    }

    #[test]
    fn test_list_and_delete() {
        let db = test_db();
        save_person_info(&db, None, imperial_input()).unwrap();
        let mut member = imperial_input();
        member.email = None;
        save_person_info(&db, Some("fam-1"), member).unwrap();

        assert_eq!(list_person_info(&db).unwrap().total, 2);
        assert!(delete_person_info(&db, Some("fam-1")).unwrap().success);
        assert!(delete_person_info(&db, Some("fam-1")).is_err());
        assert_eq!(list_person_info(&db).unwrap().total, 1);
    }

    #[test]
    fn test_get_missing() {
        let db = test_db();
        assert!(get_person_info(&db, Some("nobody"), MeasurementSystem::Metric)
            .unwrap()
            .is_none());
    }
}
