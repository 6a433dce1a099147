//! # Error Types
//!
//! Domain-specific error types for fiado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fiado-core errors (this file)                                         │
//! │  ├── LedgerError      - State machine / concurrency violations         │
//! │  └── ValidationError  - Input validation failures (fail closed)        │
//! │                                                                         │
//! │  fiado-store errors (separate crate)                                   │
//! │  └── StoreError       - Database operation failures                    │
//! │                                                                         │
//! │  fiado-ledger errors (service crate)                                   │
//! │  ├── InventoryUpdateError / JournalWriteError - collaborator failures  │
//! │  └── ServiceError     - Everything the caller sees                     │
//! │                                                                         │
//! │  Flow: ValidationError → LedgerError → ServiceError → Front-end        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (sale id, product id, quantities)
//! 3. Errors are enum variants, never String
//! 4. Validation and state errors reject BEFORE any mutation happens

use thiserror::Error;

use crate::money::Quantity;
use crate::types::ConsignmentStatus;

// =============================================================================
// Ledger Error
// =============================================================================

/// State machine and concurrency errors.
///
/// These represent operations attempted against a sale or session in the
/// wrong state. They are always raised before any field is mutated.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Operation attempted on a sale in a terminal or incompatible state.
    ///
    /// ## When This Occurs
    /// - Settling or returning against a PAID or CANCELLED sale
    /// - Opening a settlement session on a terminal sale
    /// - Cancelling an already terminal sale
    #[error("sale {sale_id} is {status}, cannot {operation}")]
    InvalidState {
        sale_id: String,
        status: ConsignmentStatus,
        operation: String,
    },

    /// Cancellation attempted after settlements were committed.
    ///
    /// A sale with received payments must be unwound through returns so the
    /// audit trail survives; it can never be cancelled outright.
    #[error("sale {sale_id} has committed settlements and cannot be cancelled")]
    PaymentsReceived { sale_id: String },

    /// A settlement session was committed twice.
    ///
    /// Sessions are one-shot: after a successful commit the session object is
    /// dead and every further operation on it fails here.
    #[error("settlement session for sale {sale_id} was already committed")]
    SessionCommitted { sale_id: String },

    /// The sale changed between session start (or return read) and commit.
    ///
    /// ## When This Occurs
    /// - A concurrent settlement or return advanced the sale's version
    /// - The repository rejected a version-guarded update
    #[error("sale {sale_id} was modified concurrently; reload and retry")]
    ConcurrentMutation { sale_id: String },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Used for early
/// validation before any ledger mutation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// A consignment cannot be created without items.
    #[error("consignment items must not be empty")]
    EmptyItems,

    /// A consignment exceeds the per-sale item cap.
    #[error("consignment has too many items (max {max})")]
    TooManyItems { max: usize },

    /// Item quantity exceeds the maximum allowed.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: Quantity, max: Quantity },

    /// The product is not part of this consignment.
    #[error("product {product_id} is not part of this consignment")]
    ItemNotOnSale { product_id: String },

    /// Returning more units of an item than remain un-returned.
    #[error(
        "return of {requested} for product {product_id} exceeds the {remaining} still out on consignment"
    )]
    ReturnExceedsRemaining {
        product_id: String,
        remaining: Quantity,
        requested: Quantity,
    },

    /// Tender index out of range for removal.
    #[error("tender index {index} out of range (session has {len} tenders)")]
    TenderIndexOutOfRange { index: usize, len: usize },

    /// Commit attempted with nothing collected.
    #[error("cannot commit a settlement with no collected amount")]
    NothingCollected,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
