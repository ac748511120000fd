//! Observer API server for GovQueue.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/queue`) for real-time queue event
//!   streaming via [`tokio::sync::broadcast`]
//! - **Read endpoints** for querying queue state (waiting ordering,
//!   token list, counter grid, daily statistics)
//! - **Command endpoints** for issuance, dispatch, completion, skip,
//!   and cancellation
//! - **Minimal HTML status page** (`GET /`) showing current counts and
//!   links to API endpoints
//!
//! # Architecture
//!
//! The server owns the queue service behind a single read-write lock.
//! Command handlers take the write lock for their whole
//! read-decide-write sequence, so every dispatch decision is atomic
//! against the combined token/counter state. Read handlers recompute
//! ordering, positions, and estimates from the core on every request --
//! no queue view is ever cached in this layer, and no ordering or
//! numbering logic lives here.
//!
//! After every successful mutation the handler broadcasts a
//! [`QueueEvent`](govqueue_types::QueueEvent) to `WebSocket` clients and
//! persists the full snapshot as a side effect.

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ObserverError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
