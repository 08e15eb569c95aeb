//! Scripture passages attached to a session.

use gather_db::queries::passages;
use gather_types::{new_id, NewPassage, PassageId, PassagePatch, SessionId, StudyPassage};
use rusqlite::Connection;
use tracing::info;

use crate::authority::require_leader_of;
use crate::resolve::{self, EntityRef};
use crate::validate::{self, BOOK_MAX, VERSION_MAX};
use crate::{Actor, Entity, Result, ServiceError};

pub fn list_passages(conn: &Connection, session_id: SessionId) -> Result<Vec<StudyPassage>> {
    resolve::lineage(conn, EntityRef::Session(session_id))?;
    Ok(passages::list(conn, session_id)?)
}

pub fn create_passage(
    conn: &Connection,
    actor: &Actor,
    session_id: SessionId,
    new: &NewPassage,
) -> Result<StudyPassage> {
    let lineage = require_leader_of(conn, EntityRef::Session(session_id), &actor.subject)?;
    validate::required("book", &new.book, Some(BOOK_MAX))?;
    validate::optional("version", new.version.as_deref(), VERSION_MAX)?;

    let passage = StudyPassage {
        id: new_id(),
        session_id,
        book: new.book.clone(),
        chapter: new.chapter,
        start_verse: new.start_verse,
        end_verse: new.end_verse,
        version: new.version.clone(),
        text: new.text.clone(),
        created_at: actor.at,
    };
    passages::insert(conn, &passage)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, passage_id = %passage.id, "passage created");
    Ok(passage)
}

pub fn update_passage(
    conn: &Connection,
    actor: &Actor,
    passage_id: PassageId,
    patch: &PassagePatch,
) -> Result<StudyPassage> {
    require_leader_of(conn, EntityRef::Passage(passage_id), &actor.subject)?;
    validate::patched("book", patch.book.as_deref(), Some(BOOK_MAX))?;
    validate::optional("version", patch.version.as_deref(), VERSION_MAX)?;

    passages::update(conn, passage_id, patch)?;
    passages::find(conn, passage_id)?.ok_or(ServiceError::NotFound(Entity::Passage))
}

pub fn delete_passage(conn: &Connection, actor: &Actor, passage_id: PassageId) -> Result<()> {
    let lineage = require_leader_of(conn, EntityRef::Passage(passage_id), &actor.subject)?;
    passages::delete(conn, passage_id)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, passage_id = %passage_id, "passage deleted");
    Ok(())
}
