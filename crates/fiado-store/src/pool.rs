//! # Store Pool Management
//!
//! Connection pool creation and configuration for the ledger's SQLite store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StoreConfig::new(path) ← Configure pool settings                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::new(config).await ← Create pool + run migrations                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │  (max_connections)        │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │                           │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.consignments() ← repository access                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so back-office reads
//! (receivables, return history) never block the settlement write path.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::repository::consignment::ConsignmentRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = StoreConfig::new("/path/to/fiado.db")
///     .max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5 (sufficient for a single-store back office)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with the given path.
    ///
    /// The database file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory store configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let store = Store::new(StoreConfig::in_memory()).await?;
    /// // Store is isolated, perfect for tests
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
#[derive(Debug, Clone)]
pub struct Store {
    /// The SQLite connection pool.
    pool: SqlitePool,
}

impl Store {
    /// Creates a new store connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite for ledger workloads:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous (balance of safety/speed)
    ///    - Foreign keys enabled
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: StoreConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing ledger store"
        );

        // sqlite://path?mode=rwc creates the file if not exists
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has FK constraints disabled by default
            .foreign_keys(true)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Store pool created"
        );

        let store = Store { pool };

        if config.run_migrations {
            store.run_migrations().await?;
        }

        Ok(store)
    }

    /// Runs database migrations. Idempotent; automatically called by `new()`
    /// unless disabled in the config.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// Returns a reference to the connection pool.
    ///
    /// For advanced queries not covered by repositories. Prefer repository
    /// methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the consignment repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let sale = store.consignments().get("sale-id").await?;
    /// ```
    pub fn consignments(&self) -> ConsignmentRepository {
        ConsignmentRepository::new(self.pool.clone())
    }

    /// Closes the connection pool. Call on shutdown; all repository
    /// operations fail afterwards.
    pub async fn close(&self) {
        info!("Closing store connection pool");
        self.pool.close().await;
    }

    /// Checks if the store is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
