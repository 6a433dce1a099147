//! # Domain Types
//!
//! Core domain types for the consignment ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │ ConsignmentItem  │   │     Tender       │   │ TransactionRecord│    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  product_id      │   │  method          │   │  id              │    │
//! │  │  sku / name      │   │  amount (Money)  │   │  consignment_id  │    │
//! │  │  quantity        │   │  card details    │   │  amount / method │    │
//! │  │  unit_price      │   └──────────────────┘   └──────────────────┘    │
//! │  │  item_discount   │                                                  │
//! │  └──────────────────┘   ┌──────────────────┐   ┌──────────────────┐    │
//! │                         │ConsignmentStatus │   │ConsignmentReturn │    │
//! │                         │  Open / Partial  │   │  audit record of │    │
//! │                         │  Paid / Cancelled│   │  one merchandise │    │
//! │                         └──────────────────┘   │  return event    │    │
//! │                                                └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `ConsignmentItem` freezes catalog data (sku, name, price, discount) at the
//! moment of sale. Later catalog price changes never alter historical sales,
//! and return credits always use the snapshot price.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, Quantity};

// =============================================================================
// Consignment Status
// =============================================================================

/// The status of a consignment sale.
///
/// ## State Machine
/// ```text
/// OPEN ──► PARTIAL ──► PAID (terminal)
///   │         │
///   └────┬────┘
///        ▼
///   CANCELLED (terminal, only while no settlement was committed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsignmentStatus {
    /// Goods are out, nothing received yet.
    Open,
    /// At least one settlement or return happened, balance still positive.
    Partial,
    /// Balance reached zero. Terminal.
    Paid,
    /// Explicitly cancelled before any settlement. Terminal.
    Cancelled,
}

impl ConsignmentStatus {
    /// Terminal states absorb: no settlement, return, or cancellation may
    /// follow them.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ConsignmentStatus::Paid | ConsignmentStatus::Cancelled)
    }
}

impl Default for ConsignmentStatus {
    fn default() -> Self {
        ConsignmentStatus::Open
    }
}

impl fmt::Display for ConsignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConsignmentStatus::Open => "OPEN",
            ConsignmentStatus::Partial => "PARTIAL",
            ConsignmentStatus::Paid => "PAID",
            ConsignmentStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Tender Method
// =============================================================================

/// How a settlement tender was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TenderMethod {
    /// Physical cash.
    Cash,
    /// Instant bank transfer.
    Pix,
    /// Debit card on external terminal.
    Debit,
    /// Credit card, optionally in installments.
    Credit,
}

impl fmt::Display for TenderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TenderMethod::Cash => "Cash",
            TenderMethod::Pix => "Pix",
            TenderMethod::Debit => "Debit",
            TenderMethod::Credit => "Credit",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Card Details
// =============================================================================

/// Card metadata attached to debit/credit tenders.
///
/// Carried into the transaction journal for settlement with the card
/// operator; the ledger itself does not interpret these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    /// Number of installments (1 = single charge).
    pub installments: u32,

    /// Card operator (acquirer) reference.
    pub operator_id: Option<String>,

    /// Card brand reference.
    pub brand_id: Option<String>,

    /// Authorization number from the external terminal.
    pub auth_number: Option<String>,
}

// =============================================================================
// Tender
// =============================================================================

/// One tender collected inside a settlement session.
///
/// Tenders live only inside an uncommitted `SettlementSession`; the sale
/// itself records the aggregate applied amount, never individual tenders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub method: TenderMethod,
    pub amount: Money,
    pub card: Option<CardDetails>,
}

// =============================================================================
// Consignment Item
// =============================================================================

/// An immutable snapshot of a catalog line at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentItem {
    /// Product ID (catalog reference, not dereferenced after creation).
    pub product_id: String,

    /// SKU at time of sale (frozen).
    pub sku: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Unit of measure ("UN", "KG", ...).
    pub unit: String,

    /// Quantity sold, fractional units supported.
    pub quantity: Quantity,

    /// Unit price at time of sale (frozen).
    pub unit_price: Money,

    /// Per-unit discount applied at sale time. Defaults to zero.
    pub item_discount: Money,

    /// Service items never move inventory (no debit at creation, no credit
    /// on return).
    pub is_service: bool,
}

impl ConsignmentItem {
    /// Unit price net of the per-unit discount, clamped at zero.
    #[inline]
    pub fn net_unit_price(&self) -> Money {
        (self.unit_price - self.item_discount).clamp_zero()
    }

    /// Line total before any discount (`unit_price × quantity`).
    #[inline]
    pub fn gross_line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Line total net of the per-unit discount, never negative.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.net_unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// The financial record appended to the Transaction Journal for one
/// committed settlement.
///
/// Exactly one record is produced per commit, carrying the aggregate applied
/// amount and a synthesized method label (`"Cash"`, or
/// `"Multiple (Cash, Pix)"` for split tenders). The tenders ride along so
/// card metadata (installments, operator, brand, authorization) reaches the
/// journal for acquirer settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub consignment_id: String,
    pub customer_id: String,
    pub store_id: String,
    /// Aggregate applied amount (change is never journaled).
    pub amount: Money,
    /// Synthesized method label.
    pub method: String,
    pub description: String,
    /// The tenders as collected, card details included.
    pub tenders: Vec<Tender>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

// =============================================================================
// Consignment Return
// =============================================================================

/// The canonical, immutable audit record of one merchandise return event.
///
/// Returns are recorded as separate events; the sale's item list is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentReturn {
    pub id: String,
    pub consignment_id: String,
    pub product_id: String,
    /// Product name snapshot for audit display.
    pub product_name: String,
    pub quantity: Quantity,
    /// Value credited against the balance, from the snapshot price.
    pub credit: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub reason: String,
}

// =============================================================================
// Receivable Entry
// =============================================================================

/// One row of the accounts-receivable read projection: a sale with an
/// outstanding balance. A query result, never a mutation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableEntry {
    pub sale_id: String,
    pub customer_id: String,
    pub store_id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub net_value: Money,
    pub paid_value: Money,
    pub returned_value: Money,
    pub balance: Money,
    pub status: ConsignmentStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================
