//! # Return Processor
//!
//! Orchestrates a merchandise return end to end.
//!
//! ## Processing Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load and rehydrate the sale                                         │
//! │  2. Apply the return in the domain (bounds, snapshot credit)            │
//! │  3. Persist: audit row + sale state, one version-guarded transaction    │
//! │  4. Credit inventory through the gateway (service items skipped)        │
//! │                                                                         │
//! │  The audit row lands BEFORE the stock move. If the inventory credit     │
//! │  fails, the return stands and the error is surfaced; stock is           │
//! │  reconciled from the audit log.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use fiado_core::{
    validation, ConsignmentReturn, ConsignmentStatus, LedgerError, Money, Quantity,
    ValidationError,
};
use fiado_store::ConsignmentRepository;

use crate::error::ServiceResult;
use crate::gateway::LedgerGateway;

// =============================================================================
// Return Receipt
// =============================================================================

/// What the operator gets back after a processed return.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceipt {
    /// The persisted audit record.
    pub record: ConsignmentReturn,

    /// The sale's balance after the credit.
    pub new_balance: Money,

    /// The sale's status after the credit.
    pub status: ConsignmentStatus,
}

// =============================================================================
// Return Processor
// =============================================================================

/// Processes merchandise returns against consignment sales.
#[derive(Clone)]
pub struct ReturnProcessor {
    repo: ConsignmentRepository,
    gateway: Arc<dyn LedgerGateway>,
}

impl ReturnProcessor {
    /// Creates a new return processor.
    pub fn new(repo: ConsignmentRepository, gateway: Arc<dyn LedgerGateway>) -> Self {
        ReturnProcessor { repo, gateway }
    }

    /// Processes a return of `quantity` units of `product_id` against a sale.
    ///
    /// The credit always comes from the sale's snapshot price, never the
    /// current catalog. Per-item bounds are enforced against the persisted
    /// return history, so they survive restarts.
    pub async fn process(
        &self,
        sale_id: &str,
        product_id: &str,
        quantity: Quantity,
        reason: String,
    ) -> ServiceResult<ReturnReceipt> {
        validation::validate_free_text("reason", &reason).map_err(LedgerError::from)?;

        let mut sale = self.repo.get(sale_id).await?;

        // Snapshot the item before the mutation borrows the sale.
        let item = sale
            .item(product_id)
            .cloned()
            .ok_or_else(|| LedgerError::Validation(ValidationError::ItemNotOnSale {
                product_id: product_id.to_string(),
            }))?;
        let credit = sale.apply_return(product_id, quantity)?;

        let record = ConsignmentReturn {
            id: Uuid::new_v4().to_string(),
            consignment_id: sale.id().to_string(),
            product_id: product_id.to_string(),
            product_name: item.name.clone(),
            quantity,
            credit,
            date: Utc::now(),
            reason,
        };

        self.repo.record_return(&sale, &record).await?;

        info!(
            sale = %sale.id(),
            product = %product_id,
            quantity = %quantity,
            credit = %credit,
            "Return recorded"
        );

        // Physical goods go back on the shelf; services have no stock to
        // credit.
        if !item.is_service {
            if let Err(err) = self
                .gateway
                .credit_inventory(sale.store_id(), product_id, quantity)
                .await
            {
                warn!(
                    sale = %sale.id(),
                    product = %product_id,
                    error = %err,
                    "Inventory credit failed after return was recorded"
                );
                return Err(err.into());
            }
        }

        Ok(ReturnReceipt {
            record,
            new_balance: sale.balance(),
            status: sale.status(),
        })
    }
}
