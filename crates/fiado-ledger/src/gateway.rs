//! # Ledger Gateway
//!
//! The seam between the ledger and the rest of the back office.
//!
//! ## Boundary Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LedgerService                                                          │
//! │       │                                                                 │
//! │       │  debit_inventory / credit_inventory / append_journal           │
//! │       ▼                                                                 │
//! │  dyn LedgerGateway ← implemented by the host application               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Inventory system, transaction journal, ...                            │
//! │                                                                         │
//! │  Ordering rules the service upholds:                                    │
//! │  • sale persisted BEFORE inventory debits (creation)                    │
//! │  • sale state persisted BEFORE the journal append (settlement)          │
//! │  • return audit row persisted BEFORE the inventory credit (return)     │
//! │                                                                         │
//! │  A gateway failure is surfaced to the operator but never rolls the     │
//! │  ledger back: the ledger is the source of truth, collaborators catch   │
//! │  up.                                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use crate::error::{InventoryUpdateError, JournalWriteError};
use fiado_core::{Quantity, TransactionRecord};

/// External collaborators of the consignment ledger.
///
/// Implementations are expected to be idempotent where possible: the journal
/// boundary is at-least-once, so a retried settlement may present the same
/// logical record twice under different IDs.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Debits stock when goods leave on consignment.
    async fn debit_inventory(
        &self,
        store_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> Result<(), InventoryUpdateError>;

    /// Credits stock when returned goods come back into the store.
    async fn credit_inventory(
        &self,
        store_id: &str,
        product_id: &str,
        quantity: Quantity,
    ) -> Result<(), InventoryUpdateError>;

    /// Appends one financial record to the transaction journal.
    async fn append_journal(&self, record: &TransactionRecord) -> Result<(), JournalWriteError>;
}
