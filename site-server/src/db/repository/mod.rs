//! Repository Module
//!
//! Free async functions over `&SqlitePool` (or a transaction for the
//! multi-step writes). Runtime-checked queries only.

pub mod area_tag;
pub mod reservation;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return RepoError::Duplicate(db_err.message().to_string());
        }
        tracing::error!(error = %err, "Database operation failed");
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            // 不向客户端暴露 SQL 细节
            RepoError::Database(_) => AppError::database("Database operation failed"),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Begin a write transaction (`BEGIN IMMEDIATE`).
///
/// Read-then-write transactions must take the write lock up front: a
/// deferred one fails with `SQLITE_BUSY_SNAPSHOT` if another writer commits
/// first, and `busy_timeout` does not cover that case.
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
