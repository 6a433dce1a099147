//! # fiado-ledger: Consignment Sale & Settlement Service
//!
//! Orchestration layer of the fiado ledger: ties the pure domain
//! (fiado-core) to SQLite persistence (fiado-store) and to the host
//! application's collaborators behind the [`LedgerGateway`] trait.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Host application (PDV / back office)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  fiado-ledger (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐ │    │
//! │  │  │LedgerService │  │SessionRegistry│ │   ReturnProcessor     │ │    │
//! │  │  │ (service.rs) │  │ (sessions.rs) │ │    (returns.rs)       │ │    │
//! │  │  └──────┬───────┘  └──────────────┘  └───────────────────────┘ │    │
//! │  │         │                                                      │    │
//! │  │         ├────────► fiado-core   (rules, money, state machine)  │    │
//! │  │         ├────────► fiado-store  (version-guarded persistence)  │    │
//! │  │         └────────► dyn LedgerGateway (inventory, journal)      │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_ledger::{LedgerService, LedgerGateway};
//! use fiado_store::{Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("fiado.db")).await?;
//! let service = LedgerService::new(store, gateway);
//!
//! let sale = service.create_sale(input).await?;
//! service.open_settlement(&sale.id).await?;
//! service.add_tender(&sale.id, tender)?;
//! let receipt = service.commit_settlement(&sale.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod returns;
pub mod service;
pub mod sessions;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{InventoryUpdateError, JournalWriteError, ServiceError, ServiceResult};
pub use gateway::LedgerGateway;
pub use returns::{ReturnProcessor, ReturnReceipt};
pub use service::{LedgerService, SaleView, SessionView, SettlementReceipt};
pub use sessions::SessionRegistry;
