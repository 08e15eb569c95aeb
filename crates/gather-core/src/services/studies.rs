//! Studies. Leaders of the owning group manage them; any authenticated
//! caller may read.

use gather_db::queries::studies;
use gather_types::{new_id, GroupId, NewStudy, Study, StudyId, StudyPatch};
use rusqlite::Connection;
use tracing::info;

use crate::authority::{require_leader, require_leader_of};
use crate::resolve::{require_group, EntityRef};
use crate::validate::{self, TITLE_MAX};
use crate::{Actor, Entity, Result, ServiceError};

pub fn list_studies(conn: &Connection, group_id: GroupId) -> Result<Vec<Study>> {
    require_group(conn, group_id)?;
    Ok(studies::list(conn, group_id)?)
}

pub fn get_study(conn: &Connection, study_id: StudyId) -> Result<Study> {
    studies::find(conn, study_id)?.ok_or(ServiceError::NotFound(Entity::Study))
}

pub fn create_study(
    conn: &Connection,
    actor: &Actor,
    group_id: GroupId,
    new: &NewStudy,
) -> Result<Study> {
    require_group(conn, group_id)?;
    require_leader(conn, group_id, &actor.subject)?;
    validate::required("title", &new.title, Some(TITLE_MAX))?;

    let study = Study {
        id: new_id(),
        group_id,
        title: new.title.clone(),
        description: new.description.clone(),
        is_archived: false,
        created_at: actor.at,
        updated_at: actor.at,
    };
    studies::insert(conn, &study)?;

    info!(group_id = %group_id, subject = %actor.subject, study_id = %study.id, "study created");
    Ok(study)
}

/// Overwrite only the fields present in `patch`.
pub fn update_study(
    conn: &Connection,
    actor: &Actor,
    study_id: StudyId,
    patch: &StudyPatch,
) -> Result<Study> {
    require_leader_of(conn, EntityRef::Study(study_id), &actor.subject)?;
    validate::patched("title", patch.title.as_deref(), Some(TITLE_MAX))?;

    studies::update(conn, study_id, patch, actor.at)?;
    get_study(conn, study_id)
}

pub fn delete_study(conn: &Connection, actor: &Actor, study_id: StudyId) -> Result<()> {
    let lineage = require_leader_of(conn, EntityRef::Study(study_id), &actor.subject)?;
    studies::delete(conn, study_id)?;

    info!(group_id = %lineage.group_id, subject = %actor.subject, study_id = %study_id, "study deleted");
    Ok(())
}
