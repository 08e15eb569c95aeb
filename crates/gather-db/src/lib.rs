//! # gather-db
//!
//! Storage layer for the Gather backend: one SQLite database holding
//! groups, studies, their content and group-scoped social rows.
//!
//! ## Schema
//!
//! - WAL mode, foreign keys enforced on every connection
//! - Ids are UUID v4 stored as 16-byte blobs
//! - All timestamps are Unix epoch seconds
//! - Schema version stored in `PRAGMA user_version`
//!
//! Uniqueness constraints are the only deduplication mechanism; callers
//! detect a lost insert race through [`DbError::Duplicate`].

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod store;

use rusqlite::Connection;
use std::path::Path;

pub use store::Store;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Foreign key or check constraint failure.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Unique or primary key constraint failure.
    #[error("duplicate row: {0}")]
    Duplicate(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DbError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DbError::Duplicate(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi;

        if let rusqlite::Error::SqliteFailure(failure, detail) = &err {
            let detail = detail.clone().unwrap_or_default();
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return DbError::Duplicate(detail);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                | ffi::SQLITE_CONSTRAINT_CHECK
                | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    return DbError::Constraint(detail);
                }
                _ => {}
            }
        }
        DbError::Sqlite(err)
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the database at the given path.
///
/// Configures pragmas and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open a private in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas. Foreign keys are per-connection, so every
/// new connection passes through here.
pub(crate) fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 5000;
         PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Unix seconds are stored as SQLite INTEGER (i64).
pub(crate) fn ts(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}
