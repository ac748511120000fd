//! Data layer for GovQueue (`PostgreSQL`).
//!
//! The queue runs entirely in memory during the day; `PostgreSQL` holds
//! the snapshot that survives a process restart. The snapshot is written
//! after every successful mutation and read exactly once, at startup,
//! before the day-boundary check runs.
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`snapshot_store`] -- Queue snapshot persistence (tokens, counters,
//!   boundary date)
//! - [`error`] -- Shared error types

pub mod error;
pub mod postgres;
pub mod snapshot_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use postgres::{PostgresConfig, PostgresPool};
pub use snapshot_store::{CounterRow, SnapshotStore, TokenRow};
