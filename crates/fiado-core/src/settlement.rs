//! # Settlement Session
//!
//! A short-lived, in-memory workspace for collecting tenders against a sale's
//! outstanding balance.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open(sale)            snapshot target_balance + version                │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  add_tender / remove_tender      (any number of times, any order)       │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  commit(sale)          one-shot:                                        │
//! │    │                     applied = min(total_collected, target)         │
//! │    │                     change  = total_collected - applied            │
//! │    ▼                     (change is handed back, never persisted)       │
//! │  SettlementOutcome                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Abandoning a session is free: nothing it holds has touched the sale until
//! commit succeeds. A committed session is dead and rejects everything.

use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::money::Money;
use crate::sale::ConsignmentSale;
use crate::types::{Tender, TenderMethod};
use crate::validation;

// =============================================================================
// Settlement Outcome
// =============================================================================

/// The result of a committed settlement session.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// Amount applied to the sale: `min(total_collected, target_balance)`.
    pub applied: Money,

    /// Cash change owed to the customer. Operational information only; it is
    /// never journaled and never reaches the sale.
    pub change: Money,

    /// Synthesized journal label: the single method's name, or
    /// `"Multiple (Cash, Pix)"` for split tenders.
    pub method_label: String,

    /// The tenders as collected, for journal descriptions and receipts.
    pub tenders: Vec<Tender>,
}

// =============================================================================
// Settlement Session
// =============================================================================

/// An uncommitted collection of tenders against one sale.
///
/// The session snapshots the sale's balance and version at open time. Commit
/// re-checks the version so a sale mutated underneath the session (another
/// terminal, a return) is rejected instead of silently over-applied.
#[derive(Debug, Clone)]
pub struct SettlementSession {
    sale_id: String,
    target_balance: Money,
    sale_version: i64,
    tenders: Vec<Tender>,
    committed: bool,
}

impl SettlementSession {
    /// Opens a settlement session against a sale, snapshotting its balance.
    ///
    /// Fails with `InvalidState` on terminal sales: there is nothing left to
    /// settle on a PAID sale and nothing settleable on a CANCELLED one.
    pub fn open(sale: &ConsignmentSale) -> LedgerResult<Self> {
        if sale.status().is_terminal() {
            return Err(LedgerError::InvalidState {
                sale_id: sale.id().to_string(),
                status: sale.status(),
                operation: "open settlement".to_string(),
            });
        }

        Ok(SettlementSession {
            sale_id: sale.id().to_string(),
            target_balance: sale.balance(),
            sale_version: sale.version(),
            tenders: Vec::new(),
            committed: false,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn sale_id(&self) -> &str {
        &self.sale_id
    }

    /// The balance snapshot taken when the session was opened.
    pub fn target_balance(&self) -> Money {
        self.target_balance
    }

    pub fn tenders(&self) -> &[Tender] {
        &self.tenders
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Sum of all collected tenders.
    pub fn total_collected(&self) -> Money {
        self.tenders.iter().map(|t| t.amount).sum()
    }

    /// The amount a commit would apply right now.
    pub fn applied_amount(&self) -> Money {
        self.total_collected().min(self.target_balance)
    }

    /// What is still missing to close the target balance.
    pub fn remaining(&self) -> Money {
        (self.target_balance - self.total_collected()).clamp_zero()
    }

    /// The change a commit would hand back right now.
    pub fn change(&self) -> Money {
        (self.total_collected() - self.target_balance).clamp_zero()
    }

    // -------------------------------------------------------------------------
    // Tender Collection
    // -------------------------------------------------------------------------

    /// Adds a tender to the session.
    ///
    /// Over-collection is allowed (the operator takes a 50 note against a
    /// 30 balance); the excess becomes change at commit.
    pub fn add_tender(&mut self, tender: Tender) -> LedgerResult<()> {
        self.guard_uncommitted()?;
        validation::validate_tender_amount(tender.amount)?;
        self.tenders.push(tender);
        Ok(())
    }

    /// Removes the tender at `index`, returning it.
    pub fn remove_tender(&mut self, index: usize) -> LedgerResult<Tender> {
        self.guard_uncommitted()?;
        if index >= self.tenders.len() {
            return Err(ValidationError::TenderIndexOutOfRange {
                index,
                len: self.tenders.len(),
            }
            .into());
        }
        Ok(self.tenders.remove(index))
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Commits the session against the sale. One-shot.
    ///
    /// ## Order of checks
    /// 1. session not already committed
    /// 2. sale is the same one the session was opened on, at the same version
    /// 3. something was actually collected
    /// 4. the sale itself still accepts settlements (not terminal)
    ///
    /// On any failure the session is left intact and may be corrected and
    /// retried (except a stale version, which requires reopening).
    pub fn commit(&mut self, sale: &mut ConsignmentSale) -> LedgerResult<SettlementOutcome> {
        if self.committed {
            return Err(LedgerError::SessionCommitted {
                sale_id: self.sale_id.clone(),
            });
        }
        if sale.id() != self.sale_id || sale.version() != self.sale_version {
            return Err(LedgerError::ConcurrentMutation {
                sale_id: self.sale_id.clone(),
            });
        }

        let total = self.total_collected();
        if !total.is_positive() {
            return Err(ValidationError::NothingCollected.into());
        }

        let applied = total.min(self.target_balance);
        sale.apply_settlement(applied)?;

        self.committed = true;
        Ok(SettlementOutcome {
            applied,
            change: (total - applied).clamp_zero(),
            method_label: self.method_label(),
            tenders: self.tenders.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Synthesizes the journal method label from the distinct tender methods,
    /// in insertion order.
    fn method_label(&self) -> String {
        let mut methods: Vec<TenderMethod> = Vec::new();
        for tender in &self.tenders {
            if !methods.contains(&tender.method) {
                methods.push(tender.method);
            }
        }

        match methods.as_slice() {
            [single] => single.to_string(),
            many => {
                let names: Vec<String> = many.iter().map(|m| m.to_string()).collect();
                format!("Multiple ({})", names.join(", "))
            }
        }
    }

    fn guard_uncommitted(&self) -> LedgerResult<()> {
        if self.committed {
            return Err(LedgerError::SessionCommitted {
                sale_id: self.sale_id.clone(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
