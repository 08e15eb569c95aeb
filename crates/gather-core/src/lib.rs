//! # gather-core
//!
//! Policy layer for the Gather backend. Every operation takes an open
//! connection (normally a transaction from [`gather_db::Store`]) and the
//! acting [`Actor`], checks ownership and authority, and performs one
//! state transition.
//!
//! - [`resolve`] - walks any entity up to its owning group
//! - [`authority`] - membership and leader predicates
//! - [`materialize`] - lazy `GroupStudy` / `GroupSession` bindings
//! - [`services`] - per-entity lifecycle operations
//!
//! Missing ancestors are always reported before authorization failures:
//! an operation on a deleted study by a non-leader is `study_not_found`,
//! never `not_leader`.

pub mod authority;
pub mod error;
pub mod materialize;
pub mod resolve;
pub mod services;
pub mod validate;

use std::time::{SystemTime, UNIX_EPOCH};

use gather_types::Subject;

pub use error::{Conflict, Denial, Entity, Result, ServiceError};
pub use resolve::{EntityRef, Lineage};

/// The authenticated subject performing an operation, and the instant
/// used for every timestamp it writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub subject: Subject,
    pub at: u64,
}

impl Actor {
    pub fn new(subject: impl Into<Subject>, at: u64) -> Self {
        Self {
            subject: subject.into(),
            at,
        }
    }

    /// Actor stamped with the current wall-clock time.
    pub fn now(subject: impl Into<Subject>) -> Self {
        Self::new(subject, unix_now())
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
