//! Cached person info
//!
//! Local copy of the account owner's and family members' submitted info.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::measurement::MeasurementSystem;
use crate::models::{UserInputModel, UserModel};

/// A cached person-info row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonInfo {
    pub id: i64,
    /// `None` for the account owner
    pub family_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub female_state: Option<String>,
    pub birth: Option<i64>,
    pub climate: Option<String>,
    pub activity: Option<String>,
    pub activity_duration: Option<String>,
    pub measurement: MeasurementSystem,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl PersonInfo {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let measurement: String = row.get("measurement")?;
        Ok(Self {
            id: row.get("id")?,
            family_id: row.get("family_id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            gender: row.get("gender")?,
            female_state: row.get("female_state")?,
            birth: row.get("birth")?,
            climate: row.get("climate")?,
            activity: row.get("activity")?,
            activity_duration: row.get("activity_duration")?,
            measurement: MeasurementSystem::from_str(&measurement).unwrap_or_default(),
            height: row.get("height")?,
            weight: row.get("weight")?,
            synced_at: row.get("synced_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the owner's row (`family_id = None`) or a family member's row
    pub fn get(conn: &Connection, family_id: Option<&str>) -> DbResult<Option<Self>> {
        // `IS` matches the owner's NULL family_id
        let mut stmt = conn.prepare("SELECT * FROM person_info WHERE family_id IS ?1")?;

        let result = stmt.query_row([family_id], Self::from_row);
        match result {
            Ok(info) => Ok(Some(info)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all cached rows, owner first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM person_info ORDER BY family_id IS NOT NULL, last_name, first_name",
        )?;
        let rows = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert or replace the row for `family_id`. Clears `synced_at`.
    pub fn upsert(
        conn: &Connection,
        family_id: Option<&str>,
        input: &UserInputModel,
    ) -> DbResult<Self> {
        let measurement = input
            .measurement_system()
            .unwrap_or_default()
            .api_value();

        let tx = conn.unchecked_transaction()?;
        let updated = tx.execute(
            r#"
            UPDATE person_info SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                gender = ?5,
                female_state = ?6,
                birth = ?7,
                climate = ?8,
                activity = ?9,
                activity_duration = ?10,
                measurement = ?11,
                height = ?12,
                weight = ?13,
                synced_at = NULL,
                updated_at = datetime('now')
            WHERE family_id IS ?1
            "#,
            params![
                family_id,
                input.first_name,
                input.last_name,
                input.email,
                input.gender,
                input.female_state,
                input.birth,
                input.climate,
                input.activity,
                input.activity_duration,
                measurement,
                input.height,
                input.weight,
            ],
        )?;

        if updated == 0 {
            tx.execute(
                r#"
                INSERT INTO person_info (
                    family_id, first_name, last_name, email, gender, female_state, birth,
                    climate, activity, activity_duration, measurement, height, weight
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    family_id,
                    input.first_name,
                    input.last_name,
                    input.email,
                    input.gender,
                    input.female_state,
                    input.birth,
                    input.climate,
                    input.activity,
                    input.activity_duration,
                    measurement,
                    input.height,
                    input.weight,
                ],
            )?;
        }
        tx.commit()?;

        Self::get(conn, family_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Record a successful submission to the server
    pub fn mark_synced(conn: &Connection, family_id: Option<&str>) -> DbResult<bool> {
        let rows = conn.execute(
            "UPDATE person_info SET synced_at = datetime('now') WHERE family_id IS ?1",
            [family_id],
        )?;
        Ok(rows > 0)
    }

    pub fn delete(conn: &Connection, family_id: Option<&str>) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM person_info WHERE family_id IS ?1",
            [family_id],
        )?;
        Ok(rows > 0)
    }

    pub fn to_user_input(&self) -> UserInputModel {
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
            height: self.height,
            weight: self.weight,
        }
    }

    pub fn to_user_model(&self) -> UserModel {
        let mut user = UserModel::from(self.to_user_input());
        user.id = self.family_id.clone();
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn input(first_name: &str, measurement: &str, height: f64, weight: f64) -> UserInputModel {
        UserInputModel {
            first_name: Some(first_name.to_string()),
            last_name: Some("Lovelace".to_string()),
            measurement: Some(measurement.to_string()),
            height: Some(height),
            weight: Some(weight),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_missing() {
        let conn = test_conn();
        assert!(PersonInfo::get(&conn, None).unwrap().is_none());
    }

    #[test]
    fn test_upsert_owner_and_update() {
        let conn = test_conn();
        let first = PersonInfo::upsert(&conn, None, &input("Ada", "met", 1.7, 70.0)).unwrap();
        assert_eq!(first.family_id, None);
        assert_eq!(first.measurement, MeasurementSystem::Metric);
        assert_eq!(first.height, Some(1.7));

        let second = PersonInfo::upsert(&conn, None, &input("Ada", "imp", 5.5, 154.0)).unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.measurement, MeasurementSystem::Imperial);
        assert_eq!(second.weight, Some(154.0));
        assert_eq!(PersonInfo::list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_family_members_listed_after_owner() {
        let conn = test_conn();
        PersonInfo::upsert(&conn, Some("fam-1"), &input("Byron", "imp", 4.0, 60.0)).unwrap();
        PersonInfo::upsert(&conn, None, &input("Ada", "met", 1.7, 70.0)).unwrap();

        let rows = PersonInfo::list(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].family_id, None);
        assert_eq!(rows[1].family_id.as_deref(), Some("fam-1"));
    }

    #[test]
    fn test_mark_synced_and_reset_on_upsert() {
        let conn = test_conn();
        PersonInfo::upsert(&conn, None, &input("Ada", "met", 1.7, 70.0)).unwrap();
        assert!(PersonInfo::mark_synced(&conn, None).unwrap());
        assert!(PersonInfo::get(&conn, None).unwrap().unwrap().synced_at.is_some());

        PersonInfo::upsert(&conn, None, &input("Ada", "met", 1.71, 70.0)).unwrap();
        assert!(PersonInfo::get(&conn, None).unwrap().unwrap().synced_at.is_none());
        assert!(!PersonInfo::mark_synced(&conn, Some("nobody")).unwrap());
    }

    #[test]
    fn test_family_id_self_is_not_the_owner() {
        let conn = test_conn();
        PersonInfo::upsert(&conn, None, &input("Ada", "met", 1.7, 70.0)).unwrap();
        let member = PersonInfo::upsert(&conn, Some("self"), &input("Byron", "imp", 4.0, 60.0)).unwrap();
        assert_eq!(member.family_id.as_deref(), Some("self"));

        let owner = PersonInfo::get(&conn, None).unwrap().unwrap();
        assert_eq!(owner.first_name.as_deref(), Some("Ada"));
        assert_ne!(owner.id, member.id);
        assert_eq!(PersonInfo::list(&conn).unwrap().len(), 2);

        assert!(PersonInfo::delete(&conn, Some("self")).unwrap());
        assert!(PersonInfo::get(&conn, None).unwrap().is_some());
    }

    #[test]
    fn test_delete() {
        let conn = test_conn();
        PersonInfo::upsert(&conn, Some("fam-1"), &input("Byron", "imp", 4.0, 60.0)).unwrap();
        assert!(PersonInfo::delete(&conn, Some("fam-1")).unwrap());
        assert!(!PersonInfo::delete(&conn, Some("fam-1")).unwrap());
    }

    #[test]
    fn test_to_user_model() {
        let conn = test_conn();
        let row = PersonInfo::upsert(&conn, Some("fam-1"), &input("Byron", "imp", 4.5, 60.0)).unwrap();
        let user = row.to_user_model();
        assert_eq!(user.id.as_deref(), Some("fam-1"));
        assert_eq!(user.measurement_system(), Some(MeasurementSystem::Imperial));
        assert_eq!(user.height, Some(4.5));
    }
}
