//! Shared application state for the observer API server.
//!
//! [`AppState`] holds the queue service behind a read-write lock, the
//! broadcast channel for queue events, and the persistence handle. Every
//! mutating handler takes the write lock for its whole read-decide-write
//! sequence, so `call_next`, `complete`, and `skip` are atomic against
//! the combined token/counter state even with several operator terminals
//! connected.

use std::sync::Arc;

use govqueue_core::QueueService;
use govqueue_db::{PostgresPool, SnapshotStore};
use govqueue_types::QueueEvent;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

/// Capacity of the broadcast channel for queue events.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for queue event messages.
    pub tx: broadcast::Sender<QueueEvent>,
    /// The queue service owning all mutable queue state.
    pub queue: Arc<RwLock<QueueService>>,
    /// Snapshot persistence handle; `None` runs the API without
    /// persistence (tests, ephemeral demos).
    pub db: Option<PostgresPool>,
}

impl AppState {
    /// Create application state without persistence.
    pub fn new(queue: QueueService) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            queue: Arc::new(RwLock::new(queue)),
            db: None,
        }
    }

    /// Create application state with a persistence handle attached.
    pub fn with_db(queue: QueueService, db: PostgresPool) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            queue: Arc::new(RwLock::new(queue)),
            db: Some(db),
        }
    }

    /// Subscribe to the queue event broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    /// Publish a queue event to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, event: &QueueEvent) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(event.clone()).unwrap_or(0)
    }

    /// Persist the current snapshot as a post-mutation side effect.
    ///
    /// Persistence sits outside the operation's transactional boundary:
    /// the mutation has already happened in memory. A failed save is
    /// logged and retried implicitly by the next mutation, since every
    /// save writes the full snapshot.
    pub async fn persist(&self) {
        let Some(db) = &self.db else {
            return;
        };
        let snapshot = {
            let queue = self.queue.read().await;
            queue.snapshot()
        };
        let store = SnapshotStore::new(db.pool());
        if let Err(e) = store.save_snapshot(&snapshot).await {
            warn!("Failed to persist queue snapshot: {e}");
        }
    }
}
