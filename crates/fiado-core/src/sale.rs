//! # ConsignmentSale Aggregate
//!
//! The heart of the ledger: a credit sale where goods leave inventory before
//! payment and a running balance is settled over time.
//!
//! ## Balance Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  balance == max(0, net_value - paid_value - returned_value)             │
//! │                                                                         │
//! │  The balance is NEVER stored. It is recomputed from its inputs on       │
//! │  every read. paid_value and returned_value only ever grow, and only     │
//! │  through apply_settlement / apply_return. There is no other write       │
//! │  path, so the invariant cannot drift.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Machine
//! ```text
//! OPEN ────► PARTIAL ────► PAID (terminal)
//!   │           │
//!   └─────┬─────┘  cancel() only while paid_value == 0
//!         ▼
//!     CANCELLED (terminal)
//! ```
//!
//! A settlement or return that leaves the balance above zero moves the sale
//! to PARTIAL; one that drives it to exactly zero (clamped) moves it to PAID.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::money::{Money, Quantity};
use crate::types::{ConsignmentItem, ConsignmentStatus};
use crate::validation;
use crate::MAX_SALE_ITEMS;

// =============================================================================
// Creation Input
// =============================================================================

/// Input for creating a consignment sale, as assembled by the PDV front-end
/// from its cart.
#[derive(Debug, Clone)]
pub struct CreateConsignment {
    /// The identified party credit is extended to. Required.
    pub customer_id: String,

    /// Vendor (salesperson) responsible for the sale. Required.
    pub vendor_id: String,

    /// Store unit the goods leave from. Required.
    pub store_id: String,

    /// Snapshot items, non-empty.
    pub items: Vec<ConsignmentItem>,

    /// Global discount on top of the per-item discounts.
    pub global_discount: Money,

    /// Free text, not interpreted.
    pub observation: Option<String>,
}

// =============================================================================
// Persisted Form
// =============================================================================

/// Raw persisted fields of a sale, used by the storage layer to rehydrate an
/// aggregate. Balance is intentionally absent: it is derived, never stored.
#[derive(Debug, Clone)]
pub struct SaleRecord {
    pub id: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub store_id: String,
    pub date: DateTime<Utc>,
    pub items: Vec<ConsignmentItem>,
    pub gross_value: Money,
    pub discount: Money,
    pub net_value: Money,
    pub paid_value: Money,
    pub returned_value: Money,
    pub status: ConsignmentStatus,
    pub observation: Option<String>,
    pub version: i64,
    /// Per-product returned quantities, aggregated from the return audit log.
    pub returned_quantities: BTreeMap<String, Quantity>,
}

// =============================================================================
// ConsignmentSale
// =============================================================================

/// The consignment sale aggregate.
///
/// All money fields are private: the only mutation paths are
/// [`apply_settlement`](ConsignmentSale::apply_settlement),
/// [`apply_return`](ConsignmentSale::apply_return) and
/// [`cancel`](ConsignmentSale::cancel), each of which re-derives the status
/// from the recomputed balance.
#[derive(Debug, Clone)]
pub struct ConsignmentSale {
    id: String,
    customer_id: String,
    vendor_id: String,
    store_id: String,
    date: DateTime<Utc>,
    items: Vec<ConsignmentItem>,
    gross_value: Money,
    discount: Money,
    net_value: Money,
    paid_value: Money,
    returned_value: Money,
    status: ConsignmentStatus,
    observation: Option<String>,
    /// Optimistic concurrency token, bumped by the store on every persisted
    /// mutation.
    version: i64,
    /// Returns must be bounded per item, not just as an aggregate value.
    returned_quantities: BTreeMap<String, Quantity>,
}

impl ConsignmentSale {
    /// Creates a new consignment sale from a PDV cart.
    ///
    /// ## Validation (fail closed, nothing is built on error)
    /// - `customer_id`, `vendor_id`, `store_id` required
    /// - items non-empty, at most [`MAX_SALE_ITEMS`]
    /// - every quantity positive and within bounds
    /// - prices and discounts non-negative
    ///
    /// ## Totals
    /// ```text
    /// gross    = Σ unit_price × quantity
    /// discount = global_discount + Σ item_discount × quantity
    /// net      = max(0, gross - discount)     ← fixed at creation
    /// ```
    ///
    /// Inventory debits are NOT issued here; the service layer does that
    /// through the `LedgerGateway` after the sale is persisted.
    pub fn create(input: CreateConsignment) -> LedgerResult<Self> {
        validation::validate_reference("customer_id", &input.customer_id)?;
        validation::validate_reference("vendor_id", &input.vendor_id)?;
        validation::validate_reference("store_id", &input.store_id)?;
        if let Some(obs) = &input.observation {
            validation::validate_free_text("observation", obs)?;
        }

        if input.items.is_empty() {
            return Err(ValidationError::EmptyItems.into());
        }
        if input.items.len() > MAX_SALE_ITEMS {
            return Err(ValidationError::TooManyItems {
                max: MAX_SALE_ITEMS,
            }
            .into());
        }
        validation::validate_money_not_negative("global discount", input.global_discount)?;

        for item in &input.items {
            validation::validate_reference("product_id", &item.product_id)?;
            validation::validate_quantity(item.quantity)?;
            validation::validate_money_not_negative("unit price", item.unit_price)?;
            validation::validate_money_not_negative("item discount", item.item_discount)?;
        }

        let gross_value: Money = input.items.iter().map(|i| i.gross_line_total()).sum();
        let item_discounts: Money = input
            .items
            .iter()
            .map(|i| i.item_discount.multiply_quantity(i.quantity))
            .sum();
        let discount = input.global_discount + item_discounts;
        let net_value = (gross_value - discount).clamp_zero();

        Ok(ConsignmentSale {
            id: Uuid::new_v4().to_string(),
            customer_id: input.customer_id,
            vendor_id: input.vendor_id,
            store_id: input.store_id,
            date: Utc::now(),
            items: input.items,
            gross_value,
            discount,
            net_value,
            paid_value: Money::zero(),
            returned_value: Money::zero(),
            status: ConsignmentStatus::Open,
            observation: input.observation,
            version: 0,
            returned_quantities: BTreeMap::new(),
        })
    }

    /// Restores a persisted aggregate. Storage layer only.
    pub fn rehydrate(record: SaleRecord) -> Self {
        ConsignmentSale {
            id: record.id,
            customer_id: record.customer_id,
            vendor_id: record.vendor_id,
            store_id: record.store_id,
            date: record.date,
            items: record.items,
            gross_value: record.gross_value,
            discount: record.discount,
            net_value: record.net_value,
            paid_value: record.paid_value,
            returned_value: record.returned_value,
            status: record.status,
            observation: record.observation,
            version: record.version,
            returned_quantities: record.returned_quantities,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn items(&self) -> &[ConsignmentItem] {
        &self.items
    }

    pub fn gross_value(&self) -> Money {
        self.gross_value
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn net_value(&self) -> Money {
        self.net_value
    }

    pub fn paid_value(&self) -> Money {
        self.paid_value
    }

    pub fn returned_value(&self) -> Money {
        self.returned_value
    }

    pub fn status(&self) -> ConsignmentStatus {
        self.status
    }

    pub fn observation(&self) -> Option<&str> {
        self.observation.as_deref()
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Looks up the snapshot item for a product on this sale.
    pub fn item(&self, product_id: &str) -> Option<&ConsignmentItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Total quantity of a product already returned on this sale.
    pub fn returned_quantity(&self, product_id: &str) -> Quantity {
        self.returned_quantities
            .get(product_id)
            .copied()
            .unwrap_or_else(Quantity::zero)
    }

    /// The outstanding balance, recomputed on every call.
    ///
    /// `max(0, net_value - paid_value - returned_value)` — never stored,
    /// never assigned, never accepted from a caller.
    pub fn balance(&self) -> Money {
        (self.net_value - self.paid_value - self.returned_value).clamp_zero()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Applies a committed settlement amount to the sale.
    ///
    /// Called by `SettlementSession::commit` with the already truncated
    /// applied amount (change never reaches this method).
    pub(crate) fn apply_settlement(&mut self, applied: Money) -> LedgerResult<()> {
        self.guard_mutable("settle")?;

        self.paid_value += applied;
        self.refresh_status();
        Ok(())
    }

    /// Applies a merchandise return of `quantity` units of `product_id`.
    ///
    /// ## Rules
    /// - the product must be on the sale
    /// - quantity must be positive
    /// - quantity must not exceed what was sold net of prior returns of the
    ///   same item
    ///
    /// ## Credit
    /// `(unit_price - item_discount) × quantity` from the ORIGINAL snapshot,
    /// never a current catalog price. Returns reduce the amount owed, never
    /// `paid_value`; if the credit would push past the net value the balance
    /// clamps at zero (no cash refund pathway exists).
    ///
    /// Returns the credited value on success.
    pub fn apply_return(
        &mut self,
        product_id: &str,
        quantity: Quantity,
    ) -> LedgerResult<Money> {
        self.guard_mutable("return")?;

        if !quantity.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "return quantity".to_string(),
            }
            .into());
        }

        let item = self
            .item(product_id)
            .ok_or_else(|| ValidationError::ItemNotOnSale {
                product_id: product_id.to_string(),
            })?;

        let already_returned = self.returned_quantity(product_id);
        let remaining = item.quantity - already_returned;
        if quantity > remaining {
            return Err(ValidationError::ReturnExceedsRemaining {
                product_id: product_id.to_string(),
                remaining,
                requested: quantity,
            }
            .into());
        }

        let credit = item.net_unit_price().multiply_quantity(quantity);

        self.returned_value += credit;
        *self
            .returned_quantities
            .entry(product_id.to_string())
            .or_insert_with(Quantity::zero) += quantity;
        self.refresh_status();

        Ok(credit)
    }

    /// Cancels the sale.
    ///
    /// Only reachable from OPEN or PARTIAL and only while no settlement was
    /// committed. A sale with received payments must be fully refunded
    /// through returns instead, preserving the audit trail.
    pub fn cancel(&mut self) -> LedgerResult<()> {
        self.guard_mutable("cancel")?;

        if self.paid_value.is_positive() {
            return Err(LedgerError::PaymentsReceived {
                sale_id: self.id.clone(),
            });
        }

        self.status = ConsignmentStatus::Cancelled;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Rejects mutations against terminal sales.
    fn guard_mutable(&self, operation: &str) -> LedgerResult<()> {
        if self.status.is_terminal() {
            return Err(LedgerError::InvalidState {
                sale_id: self.id.clone(),
                status: self.status,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Re-derives the status after a mutation: zero balance closes the debt,
    /// anything else is a partial.
    fn refresh_status(&mut self) {
        self.status = if self.balance().is_zero() {
            ConsignmentStatus::Paid
        } else {
            ConsignmentStatus::Partial
        };
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
