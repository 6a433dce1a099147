//! # Fiado Core
//!
//! Pure business logic for the consignment ("fiado") sale and settlement
//! ledger. No I/O, no async, no database — every rule in this crate is
//! testable with plain unit tests.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           fiado-core                                    │
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │   money     │  │    types    │  │     sale     │  │  settlement  │  │
//! │  │ ─────────── │  │ ─────────── │  │ ──────────── │  │ ──────────── │  │
//! │  │ Money (i64  │  │ statuses,   │  │ Consignment- │  │ Settlement-  │  │
//! │  │ cents) and  │  │ items,      │  │ Sale state   │  │ Session:     │  │
//! │  │ Quantity    │  │ tenders,    │  │ machine +    │  │ tender       │  │
//! │  │ (i64 mils)  │  │ journal     │  │ balance      │  │ collection + │  │
//! │  │             │  │ records     │  │ invariant    │  │ commit math  │  │
//! │  └─────────────┘  └─────────────┘  └──────────────┘  └──────────────┘  │
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐                                       │
//! │  │ validation  │  │    error    │                                       │
//! │  └─────────────┘  └─────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Guarantees
//! - All money as integer cents, all quantities as integer thousandths:
//!   no floating point anywhere near a balance.
//! - `balance = max(0, net - paid - returned)` is always derived, never
//!   stored, never assignable.
//! - PAID and CANCELLED are terminal: no operation moves a sale out of them.
//! - `paid_value` and `returned_value` are monotonically non-decreasing.

pub mod error;
pub mod money;
pub mod sale;
pub mod settlement;
pub mod types;
pub mod validation;

pub use error::{LedgerError, LedgerResult, ValidationError};
pub use money::{Money, Quantity};
pub use sale::{ConsignmentSale, CreateConsignment, SaleRecord};
pub use settlement::{SettlementOutcome, SettlementSession};
pub use types::{
    CardDetails, ConsignmentItem, ConsignmentReturn, ConsignmentStatus, ReceivableEntry, Tender,
    TenderMethod, TransactionRecord,
};

// =============================================================================
// Limits
// =============================================================================

/// Maximum number of distinct items on one consignment sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity per item (9 999 whole units).
pub const MAX_ITEM_QUANTITY: Quantity = Quantity::from_units(9_999);

/// Maximum length for free text fields (observation, return reason).
pub const MAX_FREE_TEXT_LEN: usize = 500;
