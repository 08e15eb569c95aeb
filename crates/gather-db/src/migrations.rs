//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are
//! forward-only.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Schema version recorded in the database (0 for a fresh file).
pub fn current_version(conn: &Connection) -> Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)
}

/// Run all pending migrations.
///
/// Only the initial schema exists so far; a database at version 1 is
/// current.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version = current_version(conn)?;

    if current_version == 0 {
        tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
        conn.execute_batch(schema::SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(DbError::Migration(format!(
            "Database version {current_version} is newer than supported {SCHEMA_VERSION}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch("PRAGMA foreign_keys = ON;").expect("pragma");
        conn
    }

    #[test]
    fn test_fresh_migration() {
        let conn = fresh();
        run(&conn).expect("migrate");

        assert_eq!(current_version(&conn).expect("version"), SCHEMA_VERSION);
    }

    #[test]
    fn test_idempotent_migration() {
        let conn = fresh();
        run(&conn).expect("first run");
        conn.execute(
            "INSERT INTO study_groups (id, name, created_at) VALUES (x'01', 'kept', 0)",
            [],
        )
        .expect("insert");

        run(&conn).expect("second run should be no-op");
        assert_eq!(current_version(&conn).expect("version"), SCHEMA_VERSION);
        let kept: i64 = conn
            .query_row("SELECT COUNT(*) FROM study_groups", [], |row| row.get(0))
            .expect("count");
        assert_eq!(kept, 1);
    }

    #[test]
    fn test_newer_database_rejected() {
        let conn = fresh();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .expect("bump version");
        assert!(matches!(run(&conn), Err(DbError::Migration(_))));
    }

    #[test]
    fn test_tables_created() {
        let conn = fresh();
        run(&conn).expect("migrate");

        let expected_tables = [
            "users",
            "study_groups",
            "group_members",
            "invite_codes",
            "studies",
            "study_sessions",
            "study_passages",
            "study_questions",
            "group_studies",
            "group_sessions",
            "study_question_responses",
            "study_passage_likes",
            "study_passage_comments",
            "study_session_notes",
        ];

        for table in &expected_tables {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap_or_else(|_| panic!("table {table} check"));
            assert_eq!(count, 1, "Table '{table}' should exist");
        }
    }
}
