//! # Consignment Repository
//!
//! Database operations for consignment sales, their item snapshots, and the
//! return audit log.
//!
//! ## Write Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every mutation of an existing sale goes through a version-guarded      │
//! │  UPDATE:                                                                │
//! │                                                                         │
//! │    UPDATE consignment_sales                                             │
//! │    SET ..., version = version + 1                                       │
//! │    WHERE id = ? AND version = ?   ← version read at load time           │
//! │                                                                         │
//! │  Zero rows affected means someone else won the race; the caller gets   │
//! │  StoreError::VersionConflict and must reload.                          │
//! │                                                                         │
//! │  The balance is NEVER written: only net/paid/returned are stored, and  │
//! │  rehydration lets the aggregate derive the balance.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use fiado_core::{
    ConsignmentItem, ConsignmentReturn, ConsignmentSale, ConsignmentStatus, Money, Quantity,
    ReceivableEntry, SaleRecord,
};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    customer_id: String,
    vendor_id: String,
    store_id: String,
    date: DateTime<Utc>,
    gross_value_cents: i64,
    discount_cents: i64,
    net_value_cents: i64,
    paid_value_cents: i64,
    returned_value_cents: i64,
    status: ConsignmentStatus,
    observation: Option<String>,
    version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_id: String,
    sku: String,
    name: String,
    unit: String,
    quantity_millis: i64,
    unit_price_cents: i64,
    item_discount_cents: i64,
    is_service: bool,
}

impl From<ItemRow> for ConsignmentItem {
    fn from(row: ItemRow) -> Self {
        ConsignmentItem {
            product_id: row.product_id,
            sku: row.sku,
            name: row.name,
            unit: row.unit,
            quantity: Quantity::from_millis(row.quantity_millis),
            unit_price: Money::from_cents(row.unit_price_cents),
            item_discount: Money::from_cents(row.item_discount_cents),
            is_service: row.is_service,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReturnRow {
    id: String,
    consignment_id: String,
    product_id: String,
    product_name: String,
    quantity_millis: i64,
    credit_cents: i64,
    date: DateTime<Utc>,
    reason: String,
}

impl From<ReturnRow> for ConsignmentReturn {
    fn from(row: ReturnRow) -> Self {
        ConsignmentReturn {
            id: row.id,
            consignment_id: row.consignment_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: Quantity::from_millis(row.quantity_millis),
            credit: Money::from_cents(row.credit_cents),
            date: row.date,
            reason: row.reason,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReturnedQuantityRow {
    product_id: String,
    total_millis: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ReceivableRow {
    id: String,
    customer_id: String,
    store_id: String,
    date: DateTime<Utc>,
    net_value_cents: i64,
    paid_value_cents: i64,
    returned_value_cents: i64,
    status: ConsignmentStatus,
}

// =============================================================================
// Receivable Query
// =============================================================================

/// Filter bounds for the accounts-receivable projection.
///
/// All bounds are optional; the default selects every outstanding sale.
///
/// ## Example
/// ```rust,ignore
/// let overdue = repo
///     .receivables(&ReceivableQuery::default()
///         .store("store-1")
///         .until(cutoff))
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReceivableQuery {
    /// Restrict to one customer.
    pub customer_id: Option<String>,

    /// Restrict to one store unit.
    pub store_id: Option<String>,

    /// Only sales dated at or after this instant.
    pub from: Option<DateTime<Utc>>,

    /// Only sales dated at or before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl ReceivableQuery {
    /// Restricts the projection to one customer.
    pub fn customer(mut self, id: impl Into<String>) -> Self {
        self.customer_id = Some(id.into());
        self
    }

    /// Restricts the projection to one store unit.
    pub fn store(mut self, id: impl Into<String>) -> Self {
        self.store_id = Some(id.into());
        self
    }

    /// Lower date bound (inclusive).
    pub fn from(mut self, ts: DateTime<Utc>) -> Self {
        self.from = Some(ts);
        self
    }

    /// Upper date bound (inclusive).
    pub fn until(mut self, ts: DateTime<Utc>) -> Self {
        self.until = Some(ts);
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for consignment sale database operations.
#[derive(Debug, Clone)]
pub struct ConsignmentRepository {
    pool: SqlitePool,
}

impl ConsignmentRepository {
    /// Creates a new ConsignmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConsignmentRepository { pool }
    }

    /// Inserts a freshly created sale and its item snapshots, atomically.
    pub async fn insert(&self, sale: &ConsignmentSale) -> StoreResult<()> {
        debug!(id = %sale.id(), customer = %sale.customer_id(), "Inserting consignment sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO consignment_sales (
                id, customer_id, vendor_id, store_id, date,
                gross_value_cents, discount_cents, net_value_cents,
                paid_value_cents, returned_value_cents,
                status, observation, version, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(sale.id())
        .bind(sale.customer_id())
        .bind(sale.vendor_id())
        .bind(sale.store_id())
        .bind(sale.date())
        .bind(sale.gross_value().cents())
        .bind(sale.discount().cents())
        .bind(sale.net_value().cents())
        .bind(sale.paid_value().cents())
        .bind(sale.returned_value().cents())
        .bind(sale.status())
        .bind(sale.observation())
        .bind(sale.version())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        for item in sale.items() {
            sqlx::query(
                r#"
                INSERT INTO consignment_items (
                    consignment_id, product_id, sku, name, unit,
                    quantity_millis, unit_price_cents, item_discount_cents, is_service
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .bind(sale.id())
            .bind(&item.product_id)
            .bind(&item.sku)
            .bind(&item.name)
            .bind(&item.unit)
            .bind(item.quantity.millis())
            .bind(item.unit_price.cents())
            .bind(item.item_discount.cents())
            .bind(item.is_service)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Loads and rehydrates a sale by ID.
    ///
    /// Reads the sale row, its item snapshots, and the per-product returned
    /// quantities aggregated from the audit log.
    pub async fn get(&self, id: &str) -> StoreResult<ConsignmentSale> {
        let row: SaleRow = sqlx::query_as(
            r#"
            SELECT id, customer_id, vendor_id, store_id, date,
                   gross_value_cents, discount_cents, net_value_cents,
                   paid_value_cents, returned_value_cents,
                   status, observation, version
            FROM consignment_sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("consignment sale", id))?;

        let item_rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT product_id, sku, name, unit,
                   quantity_millis, unit_price_cents, item_discount_cents, is_service
            FROM consignment_items
            WHERE consignment_id = ?1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let returned_rows: Vec<ReturnedQuantityRow> = sqlx::query_as(
            r#"
            SELECT product_id, SUM(quantity_millis) AS total_millis
            FROM consignment_returns
            WHERE consignment_id = ?1
            GROUP BY product_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let returned_quantities: BTreeMap<String, Quantity> = returned_rows
            .into_iter()
            .map(|r| (r.product_id, Quantity::from_millis(r.total_millis)))
            .collect();

        Ok(ConsignmentSale::rehydrate(SaleRecord {
            id: row.id,
            customer_id: row.customer_id,
            vendor_id: row.vendor_id,
            store_id: row.store_id,
            date: row.date,
            items: item_rows.into_iter().map(ConsignmentItem::from).collect(),
            gross_value: Money::from_cents(row.gross_value_cents),
            discount: Money::from_cents(row.discount_cents),
            net_value: Money::from_cents(row.net_value_cents),
            paid_value: Money::from_cents(row.paid_value_cents),
            returned_value: Money::from_cents(row.returned_value_cents),
            status: row.status,
            observation: row.observation,
            version: row.version,
            returned_quantities,
        }))
    }

    /// Persists a mutated sale's settlement state with a version guard.
    ///
    /// Writes `paid_value`, `returned_value` and `status`; bumps `version`.
    /// The sale must carry the version it was loaded at — a stale version
    /// means a concurrent writer got there first.
    ///
    /// Returns the new version on success.
    pub async fn update_state(&self, sale: &ConsignmentSale) -> StoreResult<i64> {
        debug!(
            id = %sale.id(),
            status = %sale.status(),
            version = sale.version(),
            "Persisting sale state"
        );

        let result = sqlx::query(
            r#"
            UPDATE consignment_sales
            SET paid_value_cents = ?1,
                returned_value_cents = ?2,
                status = ?3,
                version = version + 1,
                updated_at = ?4
            WHERE id = ?5 AND version = ?6
            "#,
        )
        .bind(sale.paid_value().cents())
        .bind(sale.returned_value().cents())
        .bind(sale.status())
        .bind(Utc::now())
        .bind(sale.id())
        .bind(sale.version())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                sale_id: sale.id().to_string(),
            });
        }

        Ok(sale.version() + 1)
    }

    /// Persists a return: the audit row and the sale's new state in one
    /// transaction, version-guarded.
    ///
    /// The audit row and the updated totals commit or roll back together, so
    /// the aggregated returned quantities can never disagree with
    /// `returned_value`.
    pub async fn record_return(
        &self,
        sale: &ConsignmentSale,
        ret: &ConsignmentReturn,
    ) -> StoreResult<i64> {
        debug!(
            sale = %sale.id(),
            product = %ret.product_id,
            quantity = %ret.quantity,
            "Recording return"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE consignment_sales
            SET paid_value_cents = ?1,
                returned_value_cents = ?2,
                status = ?3,
                version = version + 1,
                updated_at = ?4
            WHERE id = ?5 AND version = ?6
            "#,
        )
        .bind(sale.paid_value().cents())
        .bind(sale.returned_value().cents())
        .bind(sale.status())
        .bind(Utc::now())
        .bind(sale.id())
        .bind(sale.version())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict {
                sale_id: sale.id().to_string(),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO consignment_returns (
                id, consignment_id, product_id, product_name,
                quantity_millis, credit_cents, date, reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ret.id)
        .bind(&ret.consignment_id)
        .bind(&ret.product_id)
        .bind(&ret.product_name)
        .bind(ret.quantity.millis())
        .bind(ret.credit.cents())
        .bind(ret.date)
        .bind(&ret.reason)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(sale.version() + 1)
    }

    /// Lists the return audit log for a sale, oldest first.
    pub async fn returns_for(&self, consignment_id: &str) -> StoreResult<Vec<ConsignmentReturn>> {
        let rows: Vec<ReturnRow> = sqlx::query_as(
            r#"
            SELECT id, consignment_id, product_id, product_name,
                   quantity_millis, credit_cents, date, reason
            FROM consignment_returns
            WHERE consignment_id = ?1
            ORDER BY date ASC
            "#,
        )
        .bind(consignment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ConsignmentReturn::from).collect())
    }

    /// Accounts-receivable projection: every non-terminal sale with an
    /// outstanding balance, oldest first. Filterable by customer, store and
    /// date range through [`ReceivableQuery`].
    ///
    /// The balance is computed in the projection from the stored components;
    /// no balance column exists to drift.
    pub async fn receivables(
        &self,
        query: &ReceivableQuery,
    ) -> StoreResult<Vec<ReceivableEntry>> {
        let rows: Vec<ReceivableRow> = sqlx::query_as(
            r#"
            SELECT id, customer_id, store_id, date,
                   net_value_cents, paid_value_cents, returned_value_cents, status
            FROM consignment_sales
            WHERE status IN ('open', 'partial')
              AND (net_value_cents - paid_value_cents - returned_value_cents) > 0
              AND (?1 IS NULL OR customer_id = ?1)
              AND (?2 IS NULL OR store_id = ?2)
              AND (?3 IS NULL OR date >= ?3)
              AND (?4 IS NULL OR date <= ?4)
            ORDER BY date ASC
            "#,
        )
        .bind(query.customer_id.as_deref())
        .bind(query.store_id.as_deref())
        .bind(query.from)
        .bind(query.until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let net = Money::from_cents(r.net_value_cents);
                let paid = Money::from_cents(r.paid_value_cents);
                let returned = Money::from_cents(r.returned_value_cents);
                ReceivableEntry {
                    sale_id: r.id,
                    customer_id: r.customer_id,
                    store_id: r.store_id,
                    date: r.date,
                    net_value: net,
                    paid_value: paid,
                    returned_value: returned,
                    balance: (net - paid - returned).clamp_zero(),
                    status: r.status,
                }
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Store, StoreConfig};
    use fiado_core::{CreateConsignment, SettlementSession, Tender, TenderMethod};
    use uuid::Uuid;

    async fn test_store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
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

    fn new_sale(customer: &str) -> ConsignmentSale {
        ConsignmentSale::create(CreateConsignment {
            customer_id: customer.to_string(),
            vendor_id: "vend-1".to_string(),
            store_id: "store-1".to_string(),
            items: vec![item("p1", 2000, 10)],
            global_discount: Money::zero(),
            observation: Some("left with customer".to_string()),
        })
        .unwrap()
    }

    fn cash(cents: i64) -> Tender {
        Tender {
            method: TenderMethod::Cash,
            amount: Money::from_cents(cents),
            card: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_rehydrate() {
        let store = test_store().await;
        let repo = store.consignments();

        let sale = new_sale("cust-1");
        repo.insert(&sale).await.unwrap();

        let loaded = repo.get(sale.id()).await.unwrap();
        assert_eq!(loaded.id(), sale.id());
        assert_eq!(loaded.net_value().cents(), 20_000);
        assert_eq!(loaded.balance().cents(), 20_000);
        assert_eq!(loaded.status(), ConsignmentStatus::Open);
        assert_eq!(loaded.items().len(), 1);
        assert_eq!(loaded.observation(), Some("left with customer"));
        assert_eq!(loaded.version(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let store = test_store().await;
        let err = store.consignments().get("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_state_bumps_version() {
        let store = test_store().await;
        let repo = store.consignments();

        let sale = new_sale("cust-1");
        repo.insert(&sale).await.unwrap();

        let mut loaded = repo.get(sale.id()).await.unwrap();
        let mut session = SettlementSession::open(&loaded).unwrap();
        session.add_tender(cash(5_000)).unwrap();
        session.commit(&mut loaded).unwrap();

        let new_version = repo.update_state(&loaded).await.unwrap();
        assert_eq!(new_version, 1);

        let reloaded = repo.get(sale.id()).await.unwrap();
        assert_eq!(reloaded.paid_value().cents(), 5_000);
        assert_eq!(reloaded.balance().cents(), 15_000);
        assert_eq!(reloaded.status(), ConsignmentStatus::Partial);
        assert_eq!(reloaded.version(), 1);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let store = test_store().await;
        let repo = store.consignments();

        let sale = new_sale("cust-1");
        repo.insert(&sale).await.unwrap();

        let mut loaded = repo.get(sale.id()).await.unwrap();
        let mut session = SettlementSession::open(&loaded).unwrap();
        session.add_tender(cash(5_000)).unwrap();
        session.commit(&mut loaded).unwrap();

        // First write wins, second write carries the now stale version 0
        repo.update_state(&loaded).await.unwrap();
        let err = repo.update_state(&loaded).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { .. }));

        // The double write never landed
        let reloaded = repo.get(sale.id()).await.unwrap();
        assert_eq!(reloaded.paid_value().cents(), 5_000);
    }

    #[tokio::test]
    async fn test_record_return_persists_audit_and_state() {
        let store = test_store().await;
        let repo = store.consignments();

        let sale = new_sale("cust-1");
        repo.insert(&sale).await.unwrap();

        let mut loaded = repo.get(sale.id()).await.unwrap();
        let credit = loaded.apply_return("p1", Quantity::from_units(3)).unwrap();

        let ret = ConsignmentReturn {
            id: Uuid::new_v4().to_string(),
            consignment_id: loaded.id().to_string(),
            product_id: "p1".to_string(),
            product_name: "Product p1".to_string(),
            quantity: Quantity::from_units(3),
            credit,
            date: Utc::now(),
            reason: "customer returned unsold units".to_string(),
        };
        repo.record_return(&loaded, &ret).await.unwrap();

        let reloaded = repo.get(sale.id()).await.unwrap();
        assert_eq!(reloaded.returned_value().cents(), 6_000);
        assert_eq!(reloaded.balance().cents(), 14_000);
        assert_eq!(reloaded.returned_quantity("p1"), Quantity::from_units(3));

        let returns = repo.returns_for(sale.id()).await.unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].credit.cents(), 6_000);
    }

    #[tokio::test]
    async fn test_returned_quantities_bound_after_reload() {
        // The per-item return bound must survive persistence: after a reload,
        // returning more than the remainder is still rejected.
        let store = test_store().await;
        let repo = store.consignments();

        let sale = new_sale("cust-1");
        repo.insert(&sale).await.unwrap();

        let mut loaded = repo.get(sale.id()).await.unwrap();
        let credit = loaded.apply_return("p1", Quantity::from_units(7)).unwrap();
        let ret = ConsignmentReturn {
            id: Uuid::new_v4().to_string(),
            consignment_id: loaded.id().to_string(),
            product_id: "p1".to_string(),
            product_name: "Product p1".to_string(),
            quantity: Quantity::from_units(7),
            credit,
            date: Utc::now(),
            reason: String::new(),
        };
        repo.record_return(&loaded, &ret).await.unwrap();

        let mut reloaded = repo.get(sale.id()).await.unwrap();
        assert!(reloaded.apply_return("p1", Quantity::from_units(4)).is_err());
        assert!(reloaded.apply_return("p1", Quantity::from_units(3)).is_ok());
    }

    #[tokio::test]
    async fn test_receivables_projection() {
        let store = test_store().await;
        let repo = store.consignments();

        // Outstanding sale for cust-1
        let open_sale = new_sale("cust-1");
        repo.insert(&open_sale).await.unwrap();

        // Fully settled sale for cust-2, must not appear
        let paid_sale = new_sale("cust-2");
        repo.insert(&paid_sale).await.unwrap();
        let mut loaded = repo.get(paid_sale.id()).await.unwrap();
        let mut session = SettlementSession::open(&loaded).unwrap();
        session.add_tender(cash(20_000)).unwrap();
        session.commit(&mut loaded).unwrap();
        repo.update_state(&loaded).await.unwrap();

        // Cancelled sale for cust-3, must not appear
        let cancelled_sale = new_sale("cust-3");
        repo.insert(&cancelled_sale).await.unwrap();
        let mut loaded = repo.get(cancelled_sale.id()).await.unwrap();
        loaded.cancel().unwrap();
        repo.update_state(&loaded).await.unwrap();

        let all = repo.receivables(&ReceivableQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].sale_id, open_sale.id());
        assert_eq!(all[0].balance.cents(), 20_000);
        assert_eq!(all[0].status, ConsignmentStatus::Open);

        let for_customer = repo
            .receivables(&ReceivableQuery::default().customer("cust-1"))
            .await
            .unwrap();
        assert_eq!(for_customer.len(), 1);
        let none = repo
            .receivables(&ReceivableQuery::default().customer("cust-2"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_receivables_store_and_date_bounds() {
        let store = test_store().await;
        let repo = store.consignments();

        let cutoff = Utc::now();

        let first = ConsignmentSale::create(CreateConsignment {
            customer_id: "cust-1".to_string(),
            vendor_id: "vend-1".to_string(),
            store_id: "store-1".to_string(),
            items: vec![item("p1", 2000, 10)],
            global_discount: Money::zero(),
            observation: None,
        })
        .unwrap();
        repo.insert(&first).await.unwrap();

        let second = ConsignmentSale::create(CreateConsignment {
            customer_id: "cust-1".to_string(),
            vendor_id: "vend-1".to_string(),
            store_id: "store-2".to_string(),
            items: vec![item("p2", 1000, 1)],
            global_discount: Money::zero(),
            observation: None,
        })
        .unwrap();
        repo.insert(&second).await.unwrap();

        // Store bound
        let store_1 = repo
            .receivables(&ReceivableQuery::default().store("store-1"))
            .await
            .unwrap();
        assert_eq!(store_1.len(), 1);
        assert_eq!(store_1[0].sale_id, first.id());

        let store_2 = repo
            .receivables(&ReceivableQuery::default().store("store-2"))
            .await
            .unwrap();
        assert_eq!(store_2.len(), 1);
        assert_eq!(store_2[0].sale_id, second.id());

        // Both sales were dated after the cutoff
        let since = repo
            .receivables(&ReceivableQuery::default().from(cutoff))
            .await
            .unwrap();
        assert_eq!(since.len(), 2);

        let before = repo
            .receivables(&ReceivableQuery::default().until(cutoff))
            .await
            .unwrap();
        assert!(before.is_empty());

        // Bounds compose
        let combined = repo
            .receivables(&ReceivableQuery::default().store("store-2").from(cutoff))
            .await
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].balance.cents(), 1_000);
    }
}
