//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (fiado-ledger) ← what callers see                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `VersionConflict` is the one variant with ledger semantics: it is how the
//! optimistic concurrency guard surfaces, and the service layer maps it to
//! `LedgerError::ConcurrentMutation`.

use thiserror::Error;

/// Persistence operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A version-guarded update matched no row: the sale was mutated by
    /// someone else between read and write.
    #[error("sale {sale_id} was updated concurrently (stale version)")]
    VersionConflict { sale_id: String },

    /// Foreign key constraint violation.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::PoolExhausted
/// Other                       → StoreError::Internal
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                entity: "record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    StoreError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,

            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("pool is closed".to_string()),

            _ => StoreError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
