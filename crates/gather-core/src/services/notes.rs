//! Session notes, scoped to a subject within a group.

use gather_db::queries::notes;
use gather_types::{new_id, GroupId, NoteBody, NoteId, SessionId, StudySessionNote};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_author, require_member};
use crate::materialize::ensure_group_session;
use crate::resolve::{self, require_group, EntityRef};
use crate::{validate, Actor, Entity, Result, ServiceError};

pub fn list_notes(
    conn: &Connection,
    session_id: SessionId,
    group_id: GroupId,
) -> Result<Vec<StudySessionNote>> {
    resolve::lineage(conn, EntityRef::Session(session_id))?;
    require_group(conn, group_id)?;
    Ok(notes::list(conn, session_id, group_id)?)
}

pub fn create_note(
    conn: &Connection,
    actor: &Actor,
    session_id: SessionId,
    group_id: GroupId,
    body: &NoteBody,
) -> Result<StudySessionNote> {
    validate::required("note", &body.note, None)?;

    resolve::lineage(conn, EntityRef::Session(session_id))?;
    require_group(conn, group_id)?;
    require_member(conn, group_id, &actor.subject)?;

    let group_session = ensure_group_session(conn, group_id, session_id, actor.at)?;
    let note = StudySessionNote {
        id: new_id(),
        session_id,
        group_id,
        group_session_id: group_session.id,
        user_sub: actor.subject.clone(),
        note: body.note.clone(),
        created_at: actor.at,
        updated_at: actor.at,
    };
    notes::insert(conn, &note)?;

    info!(group_id = %group_id, subject = %actor.subject, note_id = %note.id, "note created");
    Ok(note)
}

pub fn update_note(
    conn: &Connection,
    actor: &Actor,
    note_id: NoteId,
    body: &NoteBody,
) -> Result<StudySessionNote> {
    let existing = find(conn, note_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    validate::required("note", &body.note, None)?;

    notes::update_text(conn, note_id, &body.note, actor.at)?;
    find(conn, note_id)
}

pub fn delete_note(conn: &Connection, actor: &Actor, note_id: NoteId) -> Result<()> {
    let existing = find(conn, note_id)?;
    require_author(&existing.user_sub, &actor.subject)?;
    notes::delete(conn, note_id)?;

    info!(group_id = %existing.group_id, subject = %actor.subject, note_id = %note_id, "note deleted");
    Ok(())
}

fn find(conn: &Connection, note_id: NoteId) -> Result<StudySessionNote> {
    notes::find(conn, note_id)?.ok_or(ServiceError::NotFound(Entity::Note))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing, Denial};

    fn body(text: &str) -> NoteBody {
        NoteBody {
            note: text.to_string(),
        }
    }

    #[test]
    fn test_note_lifecycle() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let bob = testing::join(&conn, world.group, "bob");

        let note = create_note(&conn, &bob, world.session, world.group, &body("Pray for Sam"))
            .expect("create");
        let updated = update_note(&conn, &bob, note.id, &body("Pray for Sam and Jo"))
            .expect("update");
        assert_eq!(updated.note, "Pray for Sam and Jo");
        assert_eq!(list_notes(&conn, world.session, world.group).expect("list").len(), 1);

        let err = delete_note(&conn, &testing::leader(), note.id).expect_err("not author");
        assert!(matches!(err, ServiceError::Forbidden(Denial::AuthorRequired)));
        delete_note(&conn, &bob, note.id).expect("delete");
    }

    #[test]
    fn test_missing_session_before_membership() {
        let conn = testing::db();
        let world = testing::world(&conn);
        let err = create_note(
            &conn,
            &Actor::new("stranger", 1),
            gather_types::new_id(),
            world.group,
            &body("x"),
        )
        .expect_err("missing");
        assert_eq!(err.discriminator(), "session_not_found");
    }
}
