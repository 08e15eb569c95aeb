//! Response, like, comment and note command handlers.
//!
//! Creates take the acting group as `group_id`; the caller must be a member
//! of that group.

use std::sync::Arc;

use gather_core::services::{comments, likes, notes, responses};
use gather_core::Actor;
use gather_types::{CommentBody, NewResponse, NoteBody, ResponseBody};
use serde_json::Value;

use crate::commands::{id, payload, run, Result};
use crate::DaemonState;

pub async fn list_responses(state: &Arc<DaemonState>, params: &Value) -> Result {
    let question_id = id(params, "question_id")?;
    let group_id = id(params, "group_id")?;
    run(state, move |conn| responses::list_responses(conn, question_id, group_id)).await
}

pub async fn create_response(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let question_id = id(params, "question_id")?;
    let group_id = id(params, "group_id")?;
    let new: NewResponse = payload(params)?;
    run(state, move |conn| {
        responses::create_response(conn, &actor, question_id, group_id, &new)
    })
    .await
}

pub async fn update_response(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let response_id = id(params, "response_id")?;
    let body: ResponseBody = payload(params)?;
    run(state, move |conn| responses::update_response(conn, &actor, response_id, &body)).await
}

pub async fn delete_response(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let response_id = id(params, "response_id")?;
    run(state, move |conn| responses::delete_response(conn, &actor, response_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

pub async fn list_likes(state: &Arc<DaemonState>, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    let group_id = id(params, "group_id")?;
    run(state, move |conn| likes::list_likes(conn, passage_id, group_id)).await
}

pub async fn create_like(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    let group_id = id(params, "group_id")?;
    run(state, move |conn| likes::create_like(conn, &actor, passage_id, group_id)).await
}

pub async fn delete_like(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let like_id = id(params, "like_id")?;
    run(state, move |conn| likes::delete_like(conn, &actor, like_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

pub async fn list_comments(state: &Arc<DaemonState>, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    let group_id = id(params, "group_id")?;
    run(state, move |conn| comments::list_comments(conn, passage_id, group_id)).await
}

pub async fn create_comment(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let passage_id = id(params, "passage_id")?;
    let group_id = id(params, "group_id")?;
    let body: CommentBody = payload(params)?;
    run(state, move |conn| {
        comments::create_comment(conn, &actor, passage_id, group_id, &body)
    })
    .await
}

pub async fn update_comment(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let comment_id = id(params, "comment_id")?;
    let body: CommentBody = payload(params)?;
    run(state, move |conn| comments::update_comment(conn, &actor, comment_id, &body)).await
}

pub async fn delete_comment(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let comment_id = id(params, "comment_id")?;
    run(state, move |conn| comments::delete_comment(conn, &actor, comment_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

pub async fn list_notes(state: &Arc<DaemonState>, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    let group_id = id(params, "group_id")?;
    run(state, move |conn| notes::list_notes(conn, session_id, group_id)).await
}

pub async fn create_note(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let session_id = id(params, "session_id")?;
    let group_id = id(params, "group_id")?;
    let body: NoteBody = payload(params)?;
    run(state, move |conn| {
        notes::create_note(conn, &actor, session_id, group_id, &body)
    })
    .await
}

pub async fn update_note(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let note_id = id(params, "note_id")?;
    let body: NoteBody = payload(params)?;
    run(state, move |conn| notes::update_note(conn, &actor, note_id, &body)).await
}

pub async fn delete_note(state: &Arc<DaemonState>, actor: Actor, params: &Value) -> Result {
    let note_id = id(params, "note_id")?;
    run(state, move |conn| notes::delete_note(conn, &actor, note_id)).await?;
    Ok(serde_json::json!({"deleted": true}))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::testing;

    fn ok(resp: crate::rpc::RpcResponse) -> Value {
        assert!(resp.error.is_none(), "call failed: {:?}", resp.error);
        resp.result.expect("result")
    }

    /// Group, study, session, passage and question owned by alice.
    async fn seed(state: &std::sync::Arc<crate::DaemonState>) -> (Value, Value, Value, Value) {
        let group = ok(testing::call(state, "alice", "create_group", json!({"name": "Romans"})).await);
        let study = ok(testing::call(
            state,
            "alice",
            "create_study",
            json!({"group_id": group["id"], "title": "Romans"}),
        )
        .await);
        let session = ok(testing::call(
            state,
            "alice",
            "create_session",
            json!({"study_id": study["id"], "title": "Chapter 8"}),
        )
        .await);
        let passage = ok(testing::call(
            state,
            "alice",
            "create_passage",
            json!({
                "session_id": session["id"],
                "book": "Romans",
                "chapter": 8,
                "start_verse": 1,
                "version": "ESV",
            }),
        )
        .await);
        let question = ok(testing::call(
            state,
            "alice",
            "create_question",
            json!({"session_id": session["id"], "question": "What is life in the Spirit?"}),
        )
        .await);
        (group, session, passage, question)
    }

    #[tokio::test]
    async fn test_like_is_idempotent_response_is_not() {
        let state = testing::state();
        let (group, _session, passage, question) = seed(&state).await;

        let first = ok(testing::call(
            &state,
            "alice",
            "create_like",
            json!({"passage_id": passage["id"], "group_id": group["id"]}),
        )
        .await);
        let second = ok(testing::call(
            &state,
            "alice",
            "create_like",
            json!({"passage_id": passage["id"], "group_id": group["id"]}),
        )
        .await);
        assert_eq!(first["id"], second["id"]);

        let params = json!({
            "question_id": question["id"],
            "group_id": group["id"],
            "response": "Freedom from condemnation",
        });
        ok(testing::call(&state, "alice", "create_response", params.clone()).await);
        let err = testing::call(&state, "alice", "create_response", params)
            .await
            .error
            .expect("duplicate");
        assert_eq!(err.code, -32009);
        assert_eq!(err.data.expect("data")["reason"], "duplicate_response");
    }

    #[tokio::test]
    async fn test_outsider_and_missing_content() {
        let state = testing::state();
        let (group, session, passage, _question) = seed(&state).await;

        let err = testing::call(
            &state,
            "carol",
            "create_comment",
            json!({"passage_id": passage["id"], "group_id": group["id"], "comment": "hi"}),
        )
        .await
        .error
        .expect("not a member");
        assert_eq!(err.data.expect("data")["reason"], "not_member");

        let err = testing::call(
            &state,
            "carol",
            "create_note",
            json!({"session_id": uuid::Uuid::new_v4(), "group_id": group["id"], "note": "hi"}),
        )
        .await
        .error
        .expect("missing session");
        assert_eq!(err.code, -32004);

        let note = ok(testing::call(
            &state,
            "alice",
            "create_note",
            json!({"session_id": session["id"], "group_id": group["id"], "note": "Pray"}),
        )
        .await);
        let err = testing::call(
            &state,
            "alice",
            "update_note",
            json!({"note_id": note["id"]}),
        )
        .await
        .error
        .expect("missing body");
        assert_eq!(err.code, -32602);
    }
}
