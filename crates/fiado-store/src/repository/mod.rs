//! # Repository Module
//!
//! Database repository implementations for the consignment ledger.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service layer                                                          │
//! │       │                                                                 │
//! │       │  store.consignments().get("sale-id")                            │
//! │       ▼                                                                 │
//! │  ConsignmentRepository                                                  │
//! │  ├── insert(&self, sale)                                                │
//! │  ├── get(&self, id)            ← rehydrates the aggregate               │
//! │  ├── update_state(&self, sale) ← version-guarded write                  │
//! │  ├── record_return(...)        ← audit row + guarded update, one tx     │
//! │  └── receivables(...)          ← read projection                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod consignment;
