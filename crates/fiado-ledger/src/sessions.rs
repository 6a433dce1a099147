//! # Session Registry
//!
//! In-memory registry of open settlement sessions, at most one per sale.
//!
//! ## Thread Safety
//! The registry is wrapped in a `Mutex` because:
//! 1. Multiple operator commands may touch sessions concurrently
//! 2. Only one command should mutate a session at a time
//! 3. The one-session-per-sale rule needs an atomic check-and-insert
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_settlement ────► insert()   ← rejects a second open per sale     │
//! │  add/remove tender ──► with_session()                                   │
//! │  abandon ────────────► remove()   ← session simply evaporates          │
//! │  commit ─────────────► take()     ← session leaves the registry;       │
//! │                                     restored only if commit failed      │
//! │                                     on validation                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use fiado_core::SettlementSession;

use crate::error::{ServiceError, ServiceResult};

/// Registry of open settlement sessions, keyed by sale ID.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SettlementSession>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        SessionRegistry {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a freshly opened session.
    ///
    /// Fails with `SessionAlreadyOpen` if the sale already has one: two
    /// operators collecting against the same balance at once is exactly the
    /// double-settlement hazard this registry exists to prevent.
    pub fn insert(&self, session: SettlementSession) -> ServiceResult<()> {
        let mut sessions = self.lock();
        let sale_id = session.sale_id().to_string();
        if sessions.contains_key(&sale_id) {
            return Err(ServiceError::SessionAlreadyOpen { sale_id });
        }
        sessions.insert(sale_id, session);
        Ok(())
    }

    /// Runs a closure against the open session for `sale_id`.
    pub fn with_session<T>(
        &self,
        sale_id: &str,
        f: impl FnOnce(&mut SettlementSession) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(sale_id)
            .ok_or_else(|| ServiceError::NoOpenSession {
                sale_id: sale_id.to_string(),
            })?;
        f(session)
    }

    /// Takes the session out of the registry for committing.
    pub fn take(&self, sale_id: &str) -> ServiceResult<SettlementSession> {
        self.lock()
            .remove(sale_id)
            .ok_or_else(|| ServiceError::NoOpenSession {
                sale_id: sale_id.to_string(),
            })
    }

    /// Puts a session back after a recoverable commit failure.
    pub fn restore(&self, session: SettlementSession) {
        self.lock()
            .insert(session.sale_id().to_string(), session);
    }

    /// Drops the open session for `sale_id`, if any. Abandoning is free:
    /// nothing in a session has touched the sale.
    pub fn remove(&self, sale_id: &str) -> Option<SettlementSession> {
        self.lock().remove(sale_id)
    }

    /// Whether a session is currently open for `sale_id`.
    pub fn has_open(&self, sale_id: &str) -> bool {
        self.lock().contains_key(sale_id)
    }

    /// A poisoned lock only means another thread panicked mid-operation; the
    /// map itself is still coherent, so recover the guard.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SettlementSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
