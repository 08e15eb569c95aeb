//! Per-entity lifecycle operations.
//!
//! Every create, update and delete resolves the target and its ancestors
//! (not-found) before checking authority against the resolved group
//! (forbidden), then writes. Social content is
//! scoped to a caller-supplied group and goes through
//! [`ensure_group_session`](crate::materialize::ensure_group_session)
//! before the insert.

pub mod comments;
pub mod groups;
pub mod invites;
pub mod likes;
pub mod notes;
pub mod passages;
pub mod profile;
pub mod questions;
pub mod responses;
pub mod sessions;
pub mod studies;
