//! # Ledger Service
//!
//! The orchestration layer: every operator-facing operation of the
//! consignment ledger lives here.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_sale ───────► core create → persist → inventory debits         │
//! │  open_settlement ───► load → SettlementSession::open → registry        │
//! │  add/remove_tender ─► registry.with_session                            │
//! │  commit_settlement ─► take session → load → core commit →              │
//! │                       version-guarded persist → journal append         │
//! │  abandon_settlement ► registry.remove (sale untouched)                 │
//! │  process_return ────► ReturnProcessor                                  │
//! │  cancel_sale ───────► load → core cancel → persist                     │
//! │  receivables ───────► read projection                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persist-Then-Notify
//! The ledger's own state always lands before any collaborator is called.
//! A failed inventory debit or journal append surfaces to the operator but
//! never rolls a persisted sale back.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use fiado_core::{
    ConsignmentItem, ConsignmentReturn, ConsignmentSale, ConsignmentStatus, CreateConsignment,
    LedgerError, Money, Quantity, ReceivableEntry, SettlementSession, Tender, TransactionRecord,
};
use fiado_store::{ReceivableQuery, Store};

use crate::error::ServiceResult;
use crate::gateway::LedgerGateway;
use crate::returns::{ReturnProcessor, ReturnReceipt};
use crate::sessions::SessionRegistry;

// =============================================================================
// Response DTOs
// =============================================================================

/// The sale as presented to callers: persisted fields plus the derived
/// balance, which exists only at read time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: String,
    pub customer_id: String,
    pub vendor_id: String,
    pub store_id: String,
    #[ts(as = "String")]
    pub date: chrono::DateTime<Utc>,
    pub items: Vec<ConsignmentItem>,
    pub gross_value: Money,
    pub discount: Money,
    pub net_value: Money,
    pub paid_value: Money,
    pub returned_value: Money,
    /// Derived: `max(0, net - paid - returned)`.
    pub balance: Money,
    pub status: ConsignmentStatus,
    pub observation: Option<String>,
    pub version: i64,
}

impl From<&ConsignmentSale> for SaleView {
    fn from(sale: &ConsignmentSale) -> Self {
        SaleView {
            id: sale.id().to_string(),
            customer_id: sale.customer_id().to_string(),
            vendor_id: sale.vendor_id().to_string(),
            store_id: sale.store_id().to_string(),
            date: sale.date(),
            items: sale.items().to_vec(),
            gross_value: sale.gross_value(),
            discount: sale.discount(),
            net_value: sale.net_value(),
            paid_value: sale.paid_value(),
            returned_value: sale.returned_value(),
            balance: sale.balance(),
            status: sale.status(),
            observation: sale.observation().map(str::to_string),
            version: sale.version(),
        }
    }
}

/// An open settlement session as presented to the operator's screen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub sale_id: String,
    pub target_balance: Money,
    pub tenders: Vec<Tender>,
    pub total_collected: Money,
    /// What is still missing to close the target balance.
    pub remaining: Money,
    /// What a commit right now would apply.
    pub applied_amount: Money,
    /// What a commit right now would hand back as change.
    pub change: Money,
}

impl From<&SettlementSession> for SessionView {
    fn from(session: &SettlementSession) -> Self {
        SessionView {
            sale_id: session.sale_id().to_string(),
            target_balance: session.target_balance(),
            tenders: session.tenders().to_vec(),
            total_collected: session.total_collected(),
            remaining: session.remaining(),
            applied_amount: session.applied_amount(),
            change: session.change(),
        }
    }
}

/// What the operator gets back from a committed settlement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    pub sale: SaleView,
    pub applied: Money,
    /// Cash change owed to the customer. Displayed, never persisted.
    pub change: Money,
    pub method_label: String,
    /// The journal record that was appended for this commit.
    pub journal: TransactionRecord,
}

// =============================================================================
// Ledger Service
// =============================================================================

/// The consignment ledger service.
#[derive(Clone)]
pub struct LedgerService {
    store: Store,
    gateway: Arc<dyn LedgerGateway>,
    sessions: Arc<SessionRegistry>,
    returns: ReturnProcessor,
}

impl LedgerService {
    /// Creates a new ledger service over a store and a gateway.
    pub fn new(store: Store, gateway: Arc<dyn LedgerGateway>) -> Self {
        let returns = ReturnProcessor::new(store.consignments(), Arc::clone(&gateway));
        LedgerService {
            store,
            gateway,
            sessions: Arc::new(SessionRegistry::new()),
            returns,
        }
    }

    // -------------------------------------------------------------------------
    // Sale Lifecycle
    // -------------------------------------------------------------------------

    /// Creates a consignment sale: validates, persists, then debits
    /// inventory for every physical item.
    ///
    /// The sale is persisted before the first stock move. A failed debit is
    /// surfaced but the sale stands; stock is reconciled from the sale's
    /// item snapshots.
    pub async fn create_sale(&self, input: CreateConsignment) -> ServiceResult<SaleView> {
        let sale = ConsignmentSale::create(input)?;
        self.store.consignments().insert(&sale).await?;

        info!(
            id = %sale.id(),
            customer = %sale.customer_id(),
            net = %sale.net_value(),
            "Consignment sale created"
        );

        for item in sale.items() {
            if item.is_service {
                continue;
            }
            if let Err(err) = self
                .gateway
                .debit_inventory(sale.store_id(), &item.product_id, item.quantity)
                .await
            {
                warn!(
                    sale = %sale.id(),
                    product = %item.product_id,
                    error = %err,
                    "Inventory debit failed after sale was persisted"
                );
                return Err(err.into());
            }
        }

        Ok(SaleView::from(&sale))
    }

    /// Loads a sale.
    pub async fn get_sale(&self, sale_id: &str) -> ServiceResult<SaleView> {
        let sale = self.store.consignments().get(sale_id).await?;
        Ok(SaleView::from(&sale))
    }

    /// The return audit log for a sale, oldest first.
    pub async fn sale_returns(&self, sale_id: &str) -> ServiceResult<Vec<ConsignmentReturn>> {
        Ok(self.store.consignments().returns_for(sale_id).await?)
    }

    /// Cancels a sale. Only allowed while no settlement was committed; the
    /// record is kept (status CANCELLED), never deleted. Any open settlement
    /// session for the sale is dropped.
    pub async fn cancel_sale(&self, sale_id: &str) -> ServiceResult<SaleView> {
        let mut sale = self.store.consignments().get(sale_id).await?;
        sale.cancel()?;
        self.store.consignments().update_state(&sale).await?;
        self.sessions.remove(sale_id);

        info!(id = %sale_id, "Consignment sale cancelled");
        Ok(SaleView::from(&sale))
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    /// Opens a settlement session against a sale's current balance.
    ///
    /// At most one session may be open per sale at a time.
    pub async fn open_settlement(&self, sale_id: &str) -> ServiceResult<SessionView> {
        let sale = self.store.consignments().get(sale_id).await?;
        let session = SettlementSession::open(&sale)?;
        let view = SessionView::from(&session);
        self.sessions.insert(session)?;

        info!(sale = %sale_id, target = %view.target_balance, "Settlement session opened");
        Ok(view)
    }

    /// Adds a tender to the open session for `sale_id`.
    pub fn add_tender(&self, sale_id: &str, tender: Tender) -> ServiceResult<SessionView> {
        self.sessions.with_session(sale_id, |session| {
            session.add_tender(tender)?;
            Ok(SessionView::from(&*session))
        })
    }

    /// Removes the tender at `index` from the open session for `sale_id`.
    pub fn remove_tender(&self, sale_id: &str, index: usize) -> ServiceResult<SessionView> {
        self.sessions.with_session(sale_id, |session| {
            session.remove_tender(index)?;
            Ok(SessionView::from(&*session))
        })
    }

    /// Drops the open session for `sale_id` without touching the sale.
    pub fn abandon_settlement(&self, sale_id: &str) -> ServiceResult<()> {
        match self.sessions.remove(sale_id) {
            Some(_) => {
                info!(sale = %sale_id, "Settlement session abandoned");
                Ok(())
            }
            None => Err(crate::error::ServiceError::NoOpenSession {
                sale_id: sale_id.to_string(),
            }),
        }
    }

    /// Commits the open session for `sale_id`.
    ///
    /// ## Flow
    /// 1. Take the session out of the registry
    /// 2. Reload the sale and run the domain commit (version check,
    ///    truncation to the target balance)
    /// 3. Persist the new state with the version guard
    /// 4. Append exactly one journal record for the applied amount
    ///
    /// A commit rejected on validation (nothing collected) restores the
    /// session so the operator can correct it. A stale-version rejection
    /// does not: the session targeted a balance that no longer exists and
    /// must be reopened.
    pub async fn commit_settlement(&self, sale_id: &str) -> ServiceResult<SettlementReceipt> {
        let mut session = self.sessions.take(sale_id)?;

        let mut sale = match self.store.consignments().get(sale_id).await {
            Ok(sale) => sale,
            Err(err) => {
                self.sessions.restore(session);
                return Err(err.into());
            }
        };

        let outcome = match session.commit(&mut sale) {
            Ok(outcome) => outcome,
            Err(err) => {
                if matches!(err, LedgerError::Validation(_)) {
                    self.sessions.restore(session);
                }
                return Err(err.into());
            }
        };

        self.store.consignments().update_state(&sale).await?;

        let record = TransactionRecord {
            id: Uuid::new_v4().to_string(),
            consignment_id: sale.id().to_string(),
            customer_id: sale.customer_id().to_string(),
            store_id: sale.store_id().to_string(),
            amount: outcome.applied,
            method: outcome.method_label.clone(),
            description: format!("Consignment settlement - sale {}", sale.id()),
            tenders: outcome.tenders.clone(),
            date: Utc::now(),
        };

        info!(
            sale = %sale.id(),
            applied = %outcome.applied,
            change = %outcome.change,
            method = %outcome.method_label,
            status = %sale.status(),
            "Settlement committed"
        );

        if let Err(err) = self.gateway.append_journal(&record).await {
            warn!(
                sale = %sale.id(),
                error = %err,
                "Journal append failed after settlement was persisted"
            );
            return Err(err.into());
        }

        Ok(SettlementReceipt {
            sale: SaleView::from(&sale),
            applied: outcome.applied,
            change: outcome.change,
            method_label: outcome.method_label,
            journal: record,
        })
    }

    // -------------------------------------------------------------------------
    // Returns & Projections
    // -------------------------------------------------------------------------

    /// Processes a merchandise return. See [`ReturnProcessor`].
    pub async fn process_return(
        &self,
        sale_id: &str,
        product_id: &str,
        quantity: Quantity,
        reason: String,
    ) -> ServiceResult<ReturnReceipt> {
        self.returns
            .process(sale_id, product_id, quantity, reason)
            .await
    }

    /// Accounts-receivable projection: every sale with an outstanding
    /// balance, filterable by customer, store and date range.
    pub async fn receivables(
        &self,
        query: &ReceivableQuery,
    ) -> ServiceResult<Vec<ReceivableEntry>> {
        Ok(self.store.consignments().receivables(query).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InventoryUpdateError, JournalWriteError, ServiceError};
    use async_trait::async_trait;
    use fiado_store::StoreConfig;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use fiado_core::{CardDetails, TenderMethod};

    /// Records every gateway call; failures can be switched on per concern.
    #[derive(Default)]
    struct RecordingGateway {
        debits: Mutex<Vec<(String, String, Quantity)>>,
        credits: Mutex<Vec<(String, String, Quantity)>>,
        journal: Mutex<Vec<TransactionRecord>>,
        fail_inventory: AtomicBool,
        fail_journal: AtomicBool,
    }

    #[async_trait]
    impl LedgerGateway for RecordingGateway {
        async fn debit_inventory(
            &self,
            store_id: &str,
            product_id: &str,
            quantity: Quantity,
        ) -> Result<(), InventoryUpdateError> {
            if self.fail_inventory.load(Ordering::SeqCst) {
                return Err(InventoryUpdateError {
                    product_id: product_id.to_string(),
                    message: "inventory offline".to_string(),
                });
            }
            self.debits.lock().unwrap().push((
                store_id.to_string(),
                product_id.to_string(),
                quantity,
            ));
            Ok(())
        }

        async fn credit_inventory(
            &self,
            store_id: &str,
            product_id: &str,
            quantity: Quantity,
        ) -> Result<(), InventoryUpdateError> {
            if self.fail_inventory.load(Ordering::SeqCst) {
                return Err(InventoryUpdateError {
                    product_id: product_id.to_string(),
                    message: "inventory offline".to_string(),
                });
            }
            self.credits.lock().unwrap().push((
                store_id.to_string(),
                product_id.to_string(),
                quantity,
            ));
            Ok(())
        }

        async fn append_journal(
            &self,
            record: &TransactionRecord,
        ) -> Result<(), JournalWriteError> {
            if self.fail_journal.load(Ordering::SeqCst) {
                return Err(JournalWriteError {
                    sale_id: record.consignment_id.clone(),
                    message: "journal offline".to_string(),
                });
            }
            self.journal.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    async fn service() -> (LedgerService, Arc<RecordingGateway>) {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let gateway = Arc::new(RecordingGateway::default());
        let service = LedgerService::new(store, gateway.clone());
        (service, gateway)
    }

    fn item(product_id: &str, price_cents: i64, qty_units: i64) -> ConsignmentItem {
        ConsignmentItem {
            product_id: product_id.to_string(),
            sku: format!("SKU-{product_id}"),
            name: format!("Product {product_id}"),
            unit: "UN".to_string(),
            quantity: Quantity::from_units(qty_units),
            unit_price: Money::from_cents(price_cents),
            item_discount: Money::zero(),
            is_service: false,
        }
    }

    fn create_input(items: Vec<ConsignmentItem>) -> CreateConsignment {
        CreateConsignment {
            customer_id: "cust-1".to_string(),
            vendor_id: "vend-1".to_string(),
            store_id: "store-1".to_string(),
            items,
            global_discount: Money::zero(),
            observation: None,
        }
    }

    fn cash(cents: i64) -> Tender {
        Tender {
            method: TenderMethod::Cash,
            amount: Money::from_cents(cents),
            card: None,
        }
    }

    fn pix(cents: i64) -> Tender {
        Tender {
            method: TenderMethod::Pix,
            amount: Money::from_cents(cents),
            card: None,
        }
    }

    #[tokio::test]
    async fn test_create_sale_persists_and_debits_inventory() {
        let (service, gateway) = service().await;

        let mut service_item = item("svc", 5_000, 1);
        service_item.is_service = true;

        let view = service
            .create_sale(create_input(vec![item("p1", 2000, 10), service_item]))
            .await
            .unwrap();

        assert_eq!(view.net_value.cents(), 25_000);
        assert_eq!(view.status, ConsignmentStatus::Open);

        // Only the physical item moved stock
        let debits = gateway.debits.lock().unwrap();
        assert_eq!(debits.len(), 1);
        assert_eq!(debits[0].1, "p1");
        assert_eq!(debits[0].2, Quantity::from_units(10));

        let loaded = service.get_sale(&view.id).await.unwrap();
        assert_eq!(loaded.balance.cents(), 25_000);
    }

    #[tokio::test]
    async fn test_create_sale_survives_inventory_failure() {
        let (service, gateway) = service().await;
        gateway.fail_inventory.store(true, Ordering::SeqCst);

        let err = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Inventory(_)));

        // The sale was persisted before the debit was attempted
        let receivables = service
            .receivables(&ReceivableQuery::default())
            .await
            .unwrap();
        assert_eq!(receivables.len(), 1);
        assert_eq!(receivables[0].balance.cents(), 20_000);
    }

    #[tokio::test]
    async fn test_full_settlement_flow() {
        let (service, gateway) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        let session = service.open_settlement(&sale.id).await.unwrap();
        assert_eq!(session.target_balance.cents(), 20_000);

        service.add_tender(&sale.id, cash(15_000)).unwrap();
        let view = service.add_tender(&sale.id, pix(10_000)).unwrap();
        assert_eq!(view.total_collected.cents(), 25_000);
        assert_eq!(view.applied_amount.cents(), 20_000);
        assert_eq!(view.change.cents(), 5_000);

        let receipt = service.commit_settlement(&sale.id).await.unwrap();
        assert_eq!(receipt.applied.cents(), 20_000);
        assert_eq!(receipt.change.cents(), 5_000);
        assert_eq!(receipt.method_label, "Multiple (Cash, Pix)");
        assert_eq!(receipt.sale.status, ConsignmentStatus::Paid);

        // Exactly one journal record, for the applied amount only
        let journal = gateway.journal.lock().unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].amount.cents(), 20_000);
        assert_eq!(journal[0].method, "Multiple (Cash, Pix)");

        // The change never reached the persisted sale
        let loaded = service.get_sale(&sale.id).await.unwrap();
        assert_eq!(loaded.paid_value.cents(), 20_000);
        assert_eq!(loaded.balance.cents(), 0);
    }

    #[tokio::test]
    async fn test_card_details_reach_the_journal() {
        let (service, gateway) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        service.open_settlement(&sale.id).await.unwrap();
        let card = CardDetails {
            installments: 3,
            operator_id: Some("op-1".to_string()),
            brand_id: Some("brand-1".to_string()),
            auth_number: Some("AUTH-9".to_string()),
        };
        service
            .add_tender(
                &sale.id,
                Tender {
                    method: TenderMethod::Credit,
                    amount: Money::from_cents(12_000),
                    card: Some(card.clone()),
                },
            )
            .unwrap();
        service.add_tender(&sale.id, cash(8_000)).unwrap();

        let receipt = service.commit_settlement(&sale.id).await.unwrap();
        assert_eq!(receipt.method_label, "Multiple (Credit, Cash)");

        // The journal record carries the tenders, card metadata intact
        let journal = gateway.journal.lock().unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(journal[0].tenders.len(), 2);
        assert_eq!(journal[0].tenders[0].card.as_ref(), Some(&card));
        assert_eq!(journal[0].tenders[1].card, None);
    }

    #[tokio::test]
    async fn test_second_session_rejected_while_open() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        service.open_settlement(&sale.id).await.unwrap();
        let err = service.open_settlement(&sale.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::SessionAlreadyOpen { .. }));

        // Abandon frees the slot
        service.abandon_settlement(&sale.id).unwrap();
        service.open_settlement(&sale.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_without_session() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        let err = service.commit_settlement(&sale.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NoOpenSession { .. }));
    }

    #[tokio::test]
    async fn test_empty_commit_restores_session() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        service.open_settlement(&sale.id).await.unwrap();
        let err = service.commit_settlement(&sale.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Ledger(LedgerError::Validation(_))));

        // Session is back: the operator can add a tender and retry
        service.add_tender(&sale.id, cash(5_000)).unwrap();
        let receipt = service.commit_settlement(&sale.id).await.unwrap();
        assert_eq!(receipt.applied.cents(), 5_000);
        assert_eq!(receipt.sale.status, ConsignmentStatus::Partial);
    }

    #[tokio::test]
    async fn test_commit_rejected_after_concurrent_return() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        // Session opened against balance 200.00 at version 0
        service.open_settlement(&sale.id).await.unwrap();
        service.add_tender(&sale.id, cash(20_000)).unwrap();

        // A return lands in between and bumps the version
        service
            .process_return(&sale.id, "p1", Quantity::from_units(2), String::new())
            .await
            .unwrap();

        let err = service.commit_settlement(&sale.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::ConcurrentMutation { .. })
        ));

        // The stale session is gone; a fresh one sees the reduced balance
        let session = service.open_settlement(&sale.id).await.unwrap();
        assert_eq!(session.target_balance.cents(), 16_000);
    }

    #[tokio::test]
    async fn test_journal_failure_after_persist() {
        let (service, gateway) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        service.open_settlement(&sale.id).await.unwrap();
        service.add_tender(&sale.id, cash(20_000)).unwrap();

        gateway.fail_journal.store(true, Ordering::SeqCst);
        let err = service.commit_settlement(&sale.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Journal(_)));

        // The settlement itself stands
        let loaded = service.get_sale(&sale.id).await.unwrap();
        assert_eq!(loaded.paid_value.cents(), 20_000);
        assert_eq!(loaded.status, ConsignmentStatus::Paid);
    }

    #[tokio::test]
    async fn test_process_return_credits_inventory_and_balance() {
        let (service, gateway) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        let receipt = service
            .process_return(
                &sale.id,
                "p1",
                Quantity::from_units(3),
                "unsold units".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(receipt.record.credit.cents(), 6_000);
        assert_eq!(receipt.new_balance.cents(), 14_000);
        assert_eq!(receipt.status, ConsignmentStatus::Partial);

        let credits = gateway.credits.lock().unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].2, Quantity::from_units(3));

        let returns = service.sale_returns(&sale.id).await.unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].reason, "unsold units");
    }

    #[tokio::test]
    async fn test_return_of_service_item_skips_inventory() {
        let (service, gateway) = service().await;
        let mut service_item = item("svc", 5_000, 2);
        service_item.is_service = true;

        let sale = service
            .create_sale(create_input(vec![service_item]))
            .await
            .unwrap();

        service
            .process_return(&sale.id, "svc", Quantity::from_units(1), String::new())
            .await
            .unwrap();

        assert!(gateway.credits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_sale() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        let cancelled = service.cancel_sale(&sale.id).await.unwrap();
        assert_eq!(cancelled.status, ConsignmentStatus::Cancelled);

        // Record is kept, but it no longer shows as receivable
        assert!(service
            .receivables(&ReceivableQuery::default())
            .await
            .unwrap()
            .is_empty());
        let loaded = service.get_sale(&sale.id).await.unwrap();
        assert_eq!(loaded.status, ConsignmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_rejected_after_settlement() {
        let (service, _) = service().await;
        let sale = service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();

        service.open_settlement(&sale.id).await.unwrap();
        service.add_tender(&sale.id, cash(5_000)).unwrap();
        service.commit_settlement(&sale.id).await.unwrap();

        let err = service.cancel_sale(&sale.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::PaymentsReceived { .. })
        ));
    }

    #[tokio::test]
    async fn test_receivables_filter_by_customer() {
        let (service, _) = service().await;
        service
            .create_sale(create_input(vec![item("p1", 2000, 10)]))
            .await
            .unwrap();
        let mut other = create_input(vec![item("p2", 1000, 1)]);
        other.customer_id = "cust-2".to_string();
        service.create_sale(other).await.unwrap();

        assert_eq!(
            service
                .receivables(&ReceivableQuery::default())
                .await
                .unwrap()
                .len(),
            2
        );
        let filtered = service
            .receivables(&ReceivableQuery::default().customer("cust-2"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].balance.cents(), 1_000);

        // Store and date bounds pass through to the projection
        let by_store = service
            .receivables(&ReceivableQuery::default().store("store-1"))
            .await
            .unwrap();
        assert_eq!(by_store.len(), 2);
        let future_only = service
            .receivables(&ReceivableQuery::default().from(Utc::now()))
            .await
            .unwrap();
        assert!(future_only.is_empty());
    }
}
