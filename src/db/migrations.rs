//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: person info cache
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- One row for the account owner (family_id NULL),
        -- one per family member
        CREATE TABLE person_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            family_id TEXT,
            first_name TEXT,
            last_name TEXT,
            email TEXT,
            gender TEXT,
            female_state TEXT,
            birth INTEGER,                       -- ms since epoch
            climate TEXT,
            activity TEXT,
            activity_duration TEXT,
            measurement TEXT NOT NULL CHECK(measurement IN ('imp', 'met')) DEFAULT 'imp',
            height REAL,                         -- meters (met) or decimal feet (imp)
            weight REAL,                         -- kg (met) or lbs (imp)
            synced_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX idx_person_info_family ON person_info(family_id)
            WHERE family_id IS NOT NULL;
        CREATE UNIQUE INDEX idx_person_info_owner ON person_info((family_id IS NULL))
            WHERE family_id IS NULL;
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Whether the schema is at the version this build expects
pub fn is_current(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? == SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(is_current(&conn).unwrap());
    }

    #[test]
    fn test_measurement_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO person_info (measurement) VALUES ('stone')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_single_owner_row() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO person_info (measurement) VALUES ('imp')", []).unwrap();
        assert!(conn
            .execute("INSERT INTO person_info (measurement) VALUES ('met')", [])
            .is_err());

        conn.execute("INSERT INTO person_info (family_id) VALUES ('self')", []).unwrap();
        assert!(conn
            .execute("INSERT INTO person_info (family_id) VALUES ('self')", [])
            .is_err());
    }
}
