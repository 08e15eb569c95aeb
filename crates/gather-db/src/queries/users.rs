//! User profile query functions.

use gather_types::UserProfile;
use rusqlite::{Connection, OptionalExtension};

use super::get_ts;
use crate::{ts, Result};

fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserProfile> {
    let display_name: String = row.get(2)?;
    Ok(UserProfile {
        id: row.get(0)?,
        subject: row.get(1)?,
        initials: UserProfile::initials_of(&display_name),
        display_name,
        created_at: get_ts(row, 3)?,
        updated_at: get_ts(row, 4)?,
    })
}

/// Insert a profile. A second profile for the same subject is `Duplicate`.
pub fn insert(conn: &Connection, profile: &UserProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, subject, display_name, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            profile.id,
            profile.subject,
            profile.display_name,
            ts(profile.created_at),
            ts(profile.updated_at),
        ],
    )?;
    Ok(())
}

pub fn find_by_subject(conn: &Connection, subject: &str) -> Result<Option<UserProfile>> {
    let profile = conn
        .query_row(
            "SELECT id, subject, display_name, created_at, updated_at FROM users WHERE subject = ?1",
            [subject],
            from_row,
        )
        .optional()?;
    Ok(profile)
}

/// Returns false when no profile exists for the subject.
pub fn update_display_name(
    conn: &Connection,
    subject: &str,
    display_name: &str,
    now: u64,
) -> Result<bool> {
    let n = conn.execute(
        "UPDATE users SET display_name = ?2, updated_at = ?3 WHERE subject = ?1",
        rusqlite::params![subject, display_name, ts(now)],
    )?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures;

    fn profile(subject: &str, name: &str) -> UserProfile {
        UserProfile {
            id: gather_types::new_id(),
            subject: subject.to_string(),
            display_name: name.to_string(),
            initials: UserProfile::initials_of(name),
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_subject_unique() {
        let conn = fixtures::db();
        insert(&conn, &profile("alice", "Alice")).expect("insert");
        let err = insert(&conn, &profile("alice", "Other")).expect_err("dup");
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_update_display_name_recomputes_initials() {
        let conn = fixtures::db();
        assert!(!update_display_name(&conn, "bob", "Bob", 2000).expect("update"));

        insert(&conn, &profile("bob", "User")).expect("insert");
        assert!(update_display_name(&conn, "bob", "Bob Ross", 2000).expect("update"));

        let stored = find_by_subject(&conn, "bob").expect("find").expect("present");
        assert_eq!(stored.display_name, "Bob Ross");
        assert_eq!(stored.initials, "BR");
        assert_eq!(stored.updated_at, 2000);
    }
}
