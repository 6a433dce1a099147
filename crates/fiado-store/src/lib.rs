//! # fiado-store: Persistence Layer for the Consignment Ledger
//!
//! SQLite storage for consignment sales, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fiado-ledger (service layer)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                   fiado-store (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │    │
//! │  │   │     Store     │    │  Repositories  │    │  Migrations  │  │    │
//! │  │   │   (pool.rs)   │◄───│(consignment.rs)│    │  (embedded)  │  │    │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("path/to/fiado.db")).await?;
//! let sale = store.consignments().get("sale-id").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
pub use repository::consignment::{ConsignmentRepository, ReceivableQuery};
