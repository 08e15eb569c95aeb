//! SQL schema definitions.
//!
//! Every parent reference is `ON DELETE CASCADE`: deleting a group removes
//! its memberships, invites, studies and everything beneath them, including
//! social rows other groups recorded against its content.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Identity
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    subject TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- ============================================================
-- Groups & Memberships
-- ============================================================

CREATE TABLE IF NOT EXISTS study_groups (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS group_members (
    id BLOB PRIMARY KEY,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    user_sub TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('member', 'leader')),
    created_at INTEGER NOT NULL,
    UNIQUE (group_id, user_sub)
);

CREATE INDEX IF NOT EXISTS idx_group_members_sub ON group_members(user_sub);

CREATE TABLE IF NOT EXISTS invite_codes (
    id BLOB PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    created_by TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_invite_codes_group ON invite_codes(group_id);

-- ============================================================
-- Studies & Content
-- ============================================================

CREATE TABLE IF NOT EXISTS studies (
    id BLOB PRIMARY KEY,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    is_archived INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_studies_group ON studies(group_id);

CREATE TABLE IF NOT EXISTS study_sessions (
    id BLOB PRIMARY KEY,
    study_id BLOB NOT NULL REFERENCES studies(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    position INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE (study_id, position)
);

CREATE TABLE IF NOT EXISTS study_passages (
    id BLOB PRIMARY KEY,
    session_id BLOB NOT NULL REFERENCES study_sessions(id) ON DELETE CASCADE,
    book TEXT NOT NULL,
    chapter INTEGER NOT NULL,
    start_verse INTEGER,
    end_verse INTEGER,
    version TEXT,
    text TEXT,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_study_passages_session ON study_passages(session_id);

CREATE TABLE IF NOT EXISTS study_questions (
    id BLOB PRIMARY KEY,
    session_id BLOB NOT NULL REFERENCES study_sessions(id) ON DELETE CASCADE,
    question TEXT NOT NULL,
    position INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_study_questions_session ON study_questions(session_id);

-- ============================================================
-- Lazy group bindings
-- ============================================================

CREATE TABLE IF NOT EXISTS group_studies (
    id BLOB PRIMARY KEY,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    study_id BLOB NOT NULL REFERENCES studies(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    UNIQUE (group_id, study_id)
);

CREATE TABLE IF NOT EXISTS group_sessions (
    id BLOB PRIMARY KEY,
    group_study_id BLOB NOT NULL REFERENCES group_studies(id) ON DELETE CASCADE,
    study_session_id BLOB NOT NULL REFERENCES study_sessions(id) ON DELETE CASCADE,
    created_at INTEGER NOT NULL,
    UNIQUE (group_study_id, study_session_id)
);

-- ============================================================
-- Group-scoped social content
-- ============================================================

CREATE TABLE IF NOT EXISTS study_question_responses (
    id BLOB PRIMARY KEY,
    question_id BLOB NOT NULL REFERENCES study_questions(id) ON DELETE CASCADE,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    group_session_id BLOB NOT NULL REFERENCES group_sessions(id) ON DELETE CASCADE,
    parent_response_id BLOB REFERENCES study_question_responses(id) ON DELETE CASCADE,
    user_sub TEXT NOT NULL,
    response TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- NULL parents must collide, so the index keys on a non-NULL stand-in.
CREATE UNIQUE INDEX IF NOT EXISTS uq_question_response ON study_question_responses(
    question_id, group_id, user_sub, IFNULL(parent_response_id, x'')
);

CREATE TABLE IF NOT EXISTS study_passage_likes (
    id BLOB PRIMARY KEY,
    passage_id BLOB NOT NULL REFERENCES study_passages(id) ON DELETE CASCADE,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    group_session_id BLOB NOT NULL REFERENCES group_sessions(id) ON DELETE CASCADE,
    user_sub TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (passage_id, group_id, user_sub)
);

CREATE TABLE IF NOT EXISTS study_passage_comments (
    id BLOB PRIMARY KEY,
    passage_id BLOB NOT NULL REFERENCES study_passages(id) ON DELETE CASCADE,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    group_session_id BLOB NOT NULL REFERENCES group_sessions(id) ON DELETE CASCADE,
    user_sub TEXT NOT NULL,
    comment TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_passage_comments_scope ON study_passage_comments(passage_id, group_id);

CREATE TABLE IF NOT EXISTS study_session_notes (
    id BLOB PRIMARY KEY,
    session_id BLOB NOT NULL REFERENCES study_sessions(id) ON DELETE CASCADE,
    group_id BLOB NOT NULL REFERENCES study_groups(id) ON DELETE CASCADE,
    group_session_id BLOB NOT NULL REFERENCES group_sessions(id) ON DELETE CASCADE,
    user_sub TEXT NOT NULL,
    note TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_session_notes_scope ON study_session_notes(session_id, group_id);
"#;
