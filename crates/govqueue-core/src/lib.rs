//! Token issuance, queue ordering, and dispatch state machine for
//! GovQueue.
//!
//! This crate owns every queue invariant: gap-free per-category sequence
//! numbers, the priority-then-FIFO waiting ordering, the token lifecycle
//! state machine, the serving/counter bijection, and the day-boundary
//! reset. Consumers (the HTTP observer, the engine binary) perform no
//! ordering or numbering of their own.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `govqueue-config.yaml`
//!   into strongly-typed structs.
//! - [`registry`] -- Read-only category registry (prefixes, average
//!   durations), validated at startup.
//! - [`store`] -- The token store: all tokens issued today, insertion
//!   order, append-only.
//! - [`counters`] -- The counter registry with current assignments.
//! - [`ordering`] -- The derived waiting ordering and the deterministic
//!   wait estimate.
//! - [`dispatch`] -- [`QueueService`], the single owner of all mutable
//!   queue state, and its operations.
//! - [`stats`] -- Daily aggregate counts, derived on read.
//! - [`error`] -- [`DispatchError`], the operation failure taxonomy.
//!
//! [`QueueService`]: dispatch::QueueService
//! [`DispatchError`]: error::DispatchError

pub mod config;
pub mod counters;
pub mod dispatch;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod stats;
pub mod store;

// Re-export primary types at crate root.
pub use config::{ConfigError, QueueConfig};
pub use counters::{CounterConfigError, CounterRegistry};
pub use dispatch::{QueueService, SetupError};
pub use error::DispatchError;
pub use registry::{CategoryInfo, CategoryRegistry, RegistryError};
pub use store::{IssueParams, TokenStore};
