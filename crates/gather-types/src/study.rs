//! Studies and the content attached to their sessions.

use serde::{Deserialize, Serialize};

use crate::{GroupId, PassageId, QuestionId, SessionId, StudyId};

/// A curriculum owned by exactly one group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct Study {
    #[ts(type = "string")]
    pub id: StudyId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    pub title: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

/// One ordered unit of a study. `position` is unique within the study.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudySession {
    #[ts(type = "string")]
    pub id: SessionId,
    #[ts(type = "string")]
    pub study_id: StudyId,
    pub title: String,
    pub description: Option<String>,
    pub position: i64,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Scripture reference attached to a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudyPassage {
    #[ts(type = "string")]
    pub id: PassageId,
    #[ts(type = "string")]
    pub session_id: SessionId,
    pub book: String,
    pub chapter: i64,
    pub start_verse: Option<i64>,
    pub end_verse: Option<i64>,
    pub version: Option<String>,
    pub text: Option<String>,
    pub created_at: u64,
}

/// Discussion question; `position` suggests an order but need not be unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudyQuestion {
    #[ts(type = "string")]
    pub id: QuestionId,
    #[ts(type = "string")]
    pub session_id: SessionId,
    pub question: String,
    pub position: i64,
    pub created_at: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewStudy {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update: only `Some` fields overwrite.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StudyPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_archived: Option<bool>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewSession {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Appended after the current maximum when absent.
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

/// One entry of a bulk reorder request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPosition {
    pub id: SessionId,
    pub position: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPassage {
    pub book: String,
    pub chapter: i64,
    #[serde(default)]
    pub start_verse: Option<i64>,
    #[serde(default)]
    pub end_verse: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PassagePatch {
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub chapter: Option<i64>,
    #[serde(default)]
    pub start_verse: Option<i64>,
    #[serde(default)]
    pub end_verse: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuestionPatch {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}
