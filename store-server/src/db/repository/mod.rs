//! Repository Module
//!
//! CRUD and query operations over the SurrealDB tables. Every repository
//! wraps a [`BaseRepository`] holding a cloned connection; write paths
//! that touch multiple records run as single multi-statement
//! transactions on that connection.

pub mod category;
pub mod discount;
pub mod history;
pub mod order;
pub mod product;
pub mod supplier;

pub use category::CategoryRepository;
pub use discount::DiscountRepository;
pub use history::HistoryRepository;
pub use order::{OrderRepository, assemble_view};
pub use product::ProductRepository;
pub use supplier::SupplierRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::{AppError, ErrorKind};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The record exists but its current state forbids the operation
    #[error("{0}")]
    State(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            // Repository messages are already complete sentences
            RepoError::NotFound(msg) => AppError::with_message(ErrorKind::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::State(msg) => AppError::unprocessable(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings on the wire, surrealdb::RecordId inside
//
//   - parse:      let id: RecordId = "product:abc".parse()?;
//   - construct:  RecordId::from_table_key("product", "abc")
//   - table name: id.table()
//   - bare key:   id.key().to_string()
//   - CRUD:       db.select(id) / db.delete(id) take RecordId directly
// =============================================================================

/// Parse a wire id into a RecordId for `table`.
///
/// Accepts both the full "table:id" form and the bare key; rejects ids
/// that point at a different table.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let record_id = if id.contains(':') {
        id.parse::<RecordId>()
            .map_err(|_| RepoError::Validation(format!("Invalid id '{id}'")))?
    } else {
        RecordId::from_table_key(table, id)
    };

    if record_id.table() != table {
        return Err(RepoError::Validation(format!(
            "Id '{id}' does not belong to table '{table}'"
        )));
    }

    Ok(record_id)
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
