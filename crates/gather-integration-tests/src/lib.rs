//! Integration test crate for the Gather backend.
//!
//! Flows under `tests/` drive the service layer against a real
//! [`gather_db::Store`], one transaction per operation, the same way the
//! daemon does. This library only holds the fixtures they share.

use gather_core::services::{groups, passages, questions, sessions, studies};
use gather_core::Actor;
use gather_db::Store;
use gather_types::{
    Group, NewGroup, NewPassage, NewQuestion, NewSession, NewStudy, Study, StudyPassage,
    StudyQuestion, StudySession,
};

/// Fixed clock for deterministic timestamps.
pub const TEST_TIMESTAMP: u64 = 1_700_000_000;

pub fn actor(subject: &str) -> Actor {
    Actor::new(subject, TEST_TIMESTAMP)
}

/// A group led by `alice` with one study, session, passage and question.
pub struct Seed {
    pub group: Group,
    pub study: Study,
    pub session: StudySession,
    pub passage: StudyPassage,
    pub question: StudyQuestion,
}

pub fn seed(store: &Store) -> gather_core::Result<Seed> {
    let alice = actor("alice");
    store.transaction(|tx| {
        let group = groups::create_group(
            tx,
            &alice,
            &NewGroup {
                name: "Tuesday Night".into(),
                description: Some("Young adults".into()),
            },
        )?;
        let study = studies::create_study(
            tx,
            &alice,
            group.id,
            &NewStudy {
                title: "Romans".into(),
                description: None,
            },
        )?;
        let session = sessions::create_session(
            tx,
            &alice,
            study.id,
            &NewSession {
                title: "Life in the Spirit".into(),
                description: None,
                position: None,
            },
        )?;
        let passage = passages::create_passage(
            tx,
            &alice,
            session.id,
            &NewPassage {
                book: "Romans".into(),
                chapter: 8,
                start_verse: Some(1),
                end_verse: Some(11),
                version: Some("ESV".into()),
                text: None,
            },
        )?;
        let question = questions::create_question(
            tx,
            &alice,
            session.id,
            &NewQuestion {
                question: "What does 'no condemnation' mean to you?".into(),
                position: None,
            },
        )?;
        Ok(Seed {
            group,
            study,
            session,
            passage,
            question,
        })
    })
}

/// Add `subject` to `group` as a plain member.
pub fn join(store: &Store, group: &Group, subject: &str) -> gather_core::Result<Actor> {
    let member = actor(subject);
    store.transaction(|tx| groups::join_group(tx, &member, group.id))?;
    Ok(member)
}

/// Row count of one table.
pub fn count(store: &Store, table: &str) -> i64 {
    store
        .with_connection(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .map_err(gather_db::DbError::from)
        })
        .unwrap_or(-1)
}
