//! Ownership resolution.
//!
//! Every entity hangs off a fixed parent chain ending at a group:
//!
//! ```text
//! response -> question -> session -> study -> group
//! like | comment -> passage -> session -> study -> group
//! note -> session -> study -> group
//! ```
//!
//! Resolution walks the chain one lookup at a time and reports the first
//! missing link by name.

use gather_db::queries::{
    comments, groups, likes, notes, passages, questions, responses, sessions, studies,
};
use gather_types::{
    CommentId, GroupId, LikeId, NoteId, PassageId, QuestionId, ResponseId, SessionId, StudyId,
};
use rusqlite::Connection;

use crate::{Entity, Result, ServiceError};

/// Reference to any entity that has an owning group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Group(GroupId),
    Study(StudyId),
    Session(SessionId),
    Passage(PassageId),
    Question(QuestionId),
    Response(ResponseId),
    Like(LikeId),
    Comment(CommentId),
    Note(NoteId),
}

/// Ancestors collected while resolving. `study_id` and `session_id` are
/// set when the walk passed through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lineage {
    pub group_id: GroupId,
    pub study_id: Option<StudyId>,
    pub session_id: Option<SessionId>,
}

/// Walk `entity` up to its group, recording the study and session passed.
pub fn lineage(conn: &Connection, entity: EntityRef) -> Result<Lineage> {
    let mut study_id = None;
    let mut session_id = None;
    let mut cursor = entity;

    loop {
        cursor = match cursor {
            EntityRef::Response(id) => {
                EntityRef::Question(link(responses::question_of(conn, id)?, Entity::Response)?)
            }
            EntityRef::Like(id) => {
                EntityRef::Passage(link(likes::passage_of(conn, id)?, Entity::Like)?)
            }
            EntityRef::Comment(id) => {
                EntityRef::Passage(link(comments::passage_of(conn, id)?, Entity::Comment)?)
            }
            EntityRef::Note(id) => {
                EntityRef::Session(link(notes::session_of(conn, id)?, Entity::Note)?)
            }
            EntityRef::Passage(id) => {
                EntityRef::Session(link(passages::session_of(conn, id)?, Entity::Passage)?)
            }
            EntityRef::Question(id) => {
                EntityRef::Session(link(questions::session_of(conn, id)?, Entity::Question)?)
            }
            EntityRef::Session(id) => {
                let parent = link(sessions::study_of(conn, id)?, Entity::Session)?;
                session_id = Some(id);
                EntityRef::Study(parent)
            }
            EntityRef::Study(id) => {
                let parent = link(studies::group_of(conn, id)?, Entity::Study)?;
                study_id = Some(id);
                EntityRef::Group(parent)
            }
            EntityRef::Group(id) => {
                if !groups::exists(conn, id)? {
                    return Err(ServiceError::NotFound(Entity::Group));
                }
                return Ok(Lineage {
                    group_id: id,
                    study_id,
                    session_id,
                });
            }
        };
    }
}

/// The group that owns `entity`.
pub fn resolve_group_for(conn: &Connection, entity: EntityRef) -> Result<GroupId> {
    Ok(lineage(conn, entity)?.group_id)
}

/// Fail with `NotFound(Group)` unless the group exists.
pub fn require_group(conn: &Connection, group_id: GroupId) -> Result<()> {
    if groups::exists(conn, group_id)? {
        Ok(())
    } else {
        Err(ServiceError::NotFound(Entity::Group))
    }
}

fn link<T>(parent: Option<T>, missing: Entity) -> Result<T> {
    parent.ok_or(ServiceError::NotFound(missing))
}
