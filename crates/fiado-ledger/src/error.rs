//! # Service Error Types
//!
//! Everything a caller of the ledger service can see goes through
//! [`ServiceError`].
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fiado-core::LedgerError ──────────┐                                    │
//! │  fiado-store::StoreError ──────────┤                                    │
//! │    (VersionConflict is remapped    ├──► ServiceError ──► caller         │
//! │     to ConcurrentMutation)         │                                    │
//! │  InventoryUpdateError ─────────────┤                                    │
//! │  JournalWriteError ────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Collaborator errors (`InventoryUpdateError`, `JournalWriteError`) are
//! surfaced AFTER the ledger's own state is persisted. The operator sees the
//! failure; the sale is never rolled back for it. The journal boundary is
//! at-least-once by design of the commit ordering.

use thiserror::Error;

use fiado_core::LedgerError;
use fiado_store::StoreError;

// =============================================================================
// Collaborator Errors
// =============================================================================

/// A stock movement against the inventory system failed.
#[derive(Debug, Error)]
#[error("inventory update failed for product {product_id}: {message}")]
pub struct InventoryUpdateError {
    pub product_id: String,
    pub message: String,
}

/// Appending a record to the transaction journal failed.
#[derive(Debug, Error)]
#[error("journal write failed for sale {sale_id}: {message}")]
pub struct JournalWriteError {
    pub sale_id: String,
    pub message: String,
}

// =============================================================================
// Service Error
// =============================================================================

/// Errors surfaced by the ledger service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain rule violation (state machine, validation, concurrency).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Persistence failure.
    #[error(transparent)]
    Store(StoreError),

    /// Operation requires an open settlement session and there is none.
    #[error("no open settlement session for sale {sale_id}")]
    NoOpenSession { sale_id: String },

    /// At most one settlement session may be open per sale.
    #[error("a settlement session is already open for sale {sale_id}")]
    SessionAlreadyOpen { sale_id: String },

    /// Inventory collaborator failure (state already persisted).
    #[error(transparent)]
    Inventory(#[from] InventoryUpdateError),

    /// Journal collaborator failure (state already persisted).
    #[error(transparent)]
    Journal(#[from] JournalWriteError),
}

/// Store errors cross into the service with one translation: a stale-version
/// write is the storage face of concurrent mutation, so it surfaces as the
/// domain's `ConcurrentMutation` instead of a storage detail.
impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { sale_id } => {
                ServiceError::Ledger(LedgerError::ConcurrentMutation { sale_id })
            }
            other => ServiceError::Store(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================
