//! Connection source shared by every request.
//!
//! A [`Store`] hands out one connection per unit of work. File stores keep
//! a small idle pool and rely on SQLite's busy timeout between writers.
//! Memory stores own a single connection and serialize callers on it.
//! All mutations go through [`Store::transaction`], which opens an
//! IMMEDIATE transaction, commits when the closure returns `Ok` and rolls
//! back on `Err` (or when the closure unwinds, since the transaction is
//! dropped uncommitted).

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{configure, DbError, Result};

/// Idle connections kept around between requests.
const MAX_IDLE: usize = 8;

enum Target {
    File {
        path: PathBuf,
        idle: Mutex<Vec<Connection>>,
    },
    /// Private in-memory database; callers take turns on it.
    Memory(Mutex<Connection>),
}

pub struct Store {
    target: Target,
}

impl Store {
    /// Open (creating if needed) the database file at `path` and migrate it.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = crate::open(path)?;
        tracing::debug!(path = %path.display(), "store opened");
        Ok(Self {
            target: Target::File {
                path: path.to_path_buf(),
                idle: Mutex::new(vec![conn]),
            },
        })
    }

    /// Open a fresh in-memory database private to this store.
    pub fn open_memory() -> Result<Self> {
        let conn = crate::open_memory()?;
        Ok(Self {
            target: Target::Memory(Mutex::new(conn)),
        })
    }

    /// Run `f` against a pooled connection.
    pub fn with_connection<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Connection) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        match &self.target {
            Target::File { path, idle } => {
                let pooled = idle.lock().ok().and_then(|mut idle| idle.pop());
                let mut conn = match pooled {
                    Some(conn) => conn,
                    None => connect(path)?,
                };
                let result = f(&mut conn);
                if let Ok(mut idle) = idle.lock() {
                    if idle.len() < MAX_IDLE {
                        idle.push(conn);
                    }
                }
                result
            }
            // A panic inside `f` drops its transaction uncommitted, so the
            // connection is still usable after poisoning.
            Target::Memory(shared) => {
                let mut conn = shared.lock().unwrap_or_else(PoisonError::into_inner);
                f(&mut conn)
            }
        }
    }

    /// Run `f` inside one IMMEDIATE transaction.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
        E: From<DbError>,
    {
        self.with_connection(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(DbError::from)?;
            let value = f(&tx)?;
            tx.commit().map_err(DbError::from)?;
            Ok(value)
        })
    }
}

fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    Ok(conn)
}
