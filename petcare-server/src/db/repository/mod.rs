//! Repository Module
//!
//! CRUD access to the embedded SurrealDB tables.
//!
//! ID convention: ids cross the API boundary as `"table:key"` strings and
//! are parsed with `str::parse::<RecordId>()`; repositories verify the table
//! part before touching the database.

pub mod item;
pub mod order;

// Re-exports
pub use item::{DecrementOutcome, ItemRepository};
pub use order::OrderRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse a client-supplied id in `"table:key"` form, verifying the table.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let rid: RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid id format: {id}")))?;
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected a {table} id, got: {id}"
        )));
    }
    Ok(rid)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
