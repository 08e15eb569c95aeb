//! Database query functions organized by table.

pub mod comments;
pub mod groups;
pub mod invites;
pub mod likes;
pub mod links;
pub mod members;
pub mod notes;
pub mod passages;
pub mod questions;
pub mod responses;
pub mod sessions;
pub mod studies;
pub mod users;

/// Read an INTEGER timestamp column.
pub(crate) fn get_ts(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

/// Read a nullable INTEGER timestamp column.
pub(crate) fn get_opt_ts(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<u64>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(|v| v.max(0) as u64))
}

/// Seed rows shared by the query tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use gather_types::{
        new_id, Group, GroupId, GroupMember, GroupRole, GroupSession, GroupSessionId, GroupStudy,
        PassageId, QuestionId, SessionId, Study, StudyId, StudyPassage, StudyQuestion,
        StudySession,
    };
    use rusqlite::Connection;

    pub fn db() -> Connection {
        crate::open_memory().expect("open test db")
    }

    pub fn group(conn: &Connection, name: &str) -> GroupId {
        let group = Group {
            id: new_id(),
            name: name.to_string(),
            description: None,
            created_at: 1000,
        };
        super::groups::insert(conn, &group).expect("insert group");
        group.id
    }

    pub fn member(conn: &Connection, group_id: GroupId, sub: &str, role: GroupRole) {
        let member = GroupMember {
            id: new_id(),
            group_id,
            user_sub: sub.to_string(),
            role,
            created_at: 1000,
        };
        super::members::insert(conn, &member).expect("insert member");
    }

    pub fn study(conn: &Connection, group_id: GroupId) -> StudyId {
        let study = Study {
            id: new_id(),
            group_id,
            title: "Romans".to_string(),
            description: None,
            is_archived: false,
            created_at: 1000,
            updated_at: 1000,
        };
        super::studies::insert(conn, &study).expect("insert study");
        study.id
    }

    pub fn session(conn: &Connection, study_id: StudyId, position: i64) -> SessionId {
        let session = StudySession {
            id: new_id(),
            study_id,
            title: format!("Week {position}"),
            description: None,
            position,
            created_at: 1000,
            updated_at: 1000,
        };
        super::sessions::insert(conn, &session).expect("insert session");
        session.id
    }

    pub fn passage(conn: &Connection, session_id: SessionId) -> PassageId {
        let passage = StudyPassage {
            id: new_id(),
            session_id,
            book: "Romans".to_string(),
            chapter: 8,
            start_verse: Some(28),
            end_verse: Some(39),
            version: Some("ESV".to_string()),
            text: None,
            created_at: 1000,
        };
        super::passages::insert(conn, &passage).expect("insert passage");
        passage.id
    }

    pub fn question(conn: &Connection, session_id: SessionId, position: i64) -> QuestionId {
        let question = StudyQuestion {
            id: new_id(),
            session_id,
            question: "What stands out?".to_string(),
            position,
            created_at: 1000,
        };
        super::questions::insert(conn, &question).expect("insert question");
        question.id
    }

    /// A group with one study, one session and its group binding.
    pub struct Scope {
        pub group: GroupId,
        pub study: StudyId,
        pub session: SessionId,
        pub group_session: GroupSessionId,
    }

    pub fn scope(conn: &Connection) -> Scope {
        let group = group(conn, "scope");
        let study = study(conn, group);
        let session = session(conn, study, 1);
        let group_study = GroupStudy {
            id: new_id(),
            group_id: group,
            study_id: study,
            created_at: 1000,
        };
        super::links::insert_group_study(conn, &group_study).expect("insert group study");
        let group_session = GroupSession {
            id: new_id(),
            group_study_id: group_study.id,
            study_session_id: session,
            created_at: 1000,
        };
        super::links::insert_group_session(conn, &group_session).expect("insert group session");
        Scope {
            group,
            study,
            session,
            group_session: group_session.id,
        }
    }
}
