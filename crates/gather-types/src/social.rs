//! Group-scoped social content and the join rows that bind a group to a
//! study or session it engages with.

use serde::{Deserialize, Serialize};

use crate::{
    CommentId, GroupId, GroupSessionId, GroupStudyId, LikeId, NoteId, PassageId, QuestionId,
    ResponseId, SessionId, StudyId, Subject,
};

/// A group's instantiation of a study. Unique per `(group_id, study_id)`;
/// only ever created lazily.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct GroupStudy {
    #[ts(type = "string")]
    pub id: GroupStudyId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    #[ts(type = "string")]
    pub study_id: StudyId,
    pub created_at: u64,
}

/// A group's instantiation of one session. Unique per
/// `(group_study_id, study_session_id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct GroupSession {
    #[ts(type = "string")]
    pub id: GroupSessionId,
    #[ts(type = "string")]
    pub group_study_id: GroupStudyId,
    #[ts(type = "string")]
    pub study_session_id: SessionId,
    pub created_at: u64,
}

/// Answer to a question within one group, optionally threaded under a
/// parent response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudyQuestionResponse {
    #[ts(type = "string")]
    pub id: ResponseId,
    #[ts(type = "string")]
    pub question_id: QuestionId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    #[ts(type = "string")]
    pub group_session_id: GroupSessionId,
    #[ts(type = "string | null")]
    pub parent_response_id: Option<ResponseId>,
    pub user_sub: Subject,
    pub response: String,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudyPassageLike {
    #[ts(type = "string")]
    pub id: LikeId,
    #[ts(type = "string")]
    pub passage_id: PassageId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    #[ts(type = "string")]
    pub group_session_id: GroupSessionId,
    pub user_sub: Subject,
    pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudyPassageComment {
    #[ts(type = "string")]
    pub id: CommentId,
    #[ts(type = "string")]
    pub passage_id: PassageId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    #[ts(type = "string")]
    pub group_session_id: GroupSessionId,
    pub user_sub: Subject,
    pub comment: String,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
pub struct StudySessionNote {
    #[ts(type = "string")]
    pub id: NoteId,
    #[ts(type = "string")]
    pub session_id: SessionId,
    #[ts(type = "string")]
    pub group_id: GroupId,
    #[ts(type = "string")]
    pub group_session_id: GroupSessionId,
    pub user_sub: Subject,
    pub note: String,
    pub created_at: u64,
    pub updated_at: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewResponse {
    pub response: String,
    #[serde(default)]
    pub parent_response_id: Option<ResponseId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseBody {
    pub response: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommentBody {
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteBody {
    pub note: String,
}
