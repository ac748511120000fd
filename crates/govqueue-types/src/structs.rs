//! Core entity structs for the GovQueue token management system.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ServiceCategory, TokenStatus};
use crate::ids::{CounterId, TokenId};

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A single issued queue ticket tied to one category and one requester
/// interaction.
///
/// Tokens are append-only: once issued, only `status`, `assigned_counter`,
/// and `completed_at` ever change, and only through the dispatch
/// controller's operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Token {
    /// Opaque identity, distinct from the display label.
    pub id: TokenId,

    /// Human-facing label, `"{prefix}-{seq:03}"`. Unique per category per
    /// day; sequence numbers are gap-free and never reused.
    pub display_id: String,

    /// The service category this token queues for.
    pub category: ServiceCategory,

    /// Requester's name, free text, optional.
    pub requester_name: Option<String>,

    /// Requester's phone number, free text, optional.
    pub requester_phone: Option<String>,

    /// Priority flag (senior citizens, persons with disabilities).
    /// Set at issuance, immutable thereafter.
    pub is_priority: bool,

    /// Current lifecycle state.
    pub status: TokenStatus,

    /// Issuance timestamp; the FIFO tie-break key within a priority class.
    pub issued_at: DateTime<Utc>,

    /// The counter serving this token, set while `status` is Serving.
    pub assigned_counter: Option<CounterId>,

    /// Set exactly once, on the transition to Completed.
    pub completed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

/// A service counter that tokens are dispatched to.
///
/// A counter holds at most one token at a time; `current_token_id` is set
/// while that token's status is Serving and cleared when it leaves Serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Counter {
    /// Stable identity for the operational day.
    pub id: CounterId,

    /// Display label, e.g. "Counter 1".
    pub name: String,

    /// Operator-controlled availability flag. Dispatch does not consult
    /// this flag; it is carried for display and operator tooling.
    pub is_active: bool,

    /// The token currently being served here, if any.
    pub current_token_id: Option<TokenId>,
}

// ---------------------------------------------------------------------------
// Daily statistics
// ---------------------------------------------------------------------------

/// Aggregate counts for the current operational day, derived on read from
/// the token store.
///
/// `avg_service_minutes` is the observed mean over completed tokens and is
/// display-only; the deterministic wait estimate never uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailyStats {
    /// Total tokens issued today, regardless of status.
    pub total_issued: u64,
    /// Tokens with status Waiting.
    pub waiting: u64,
    /// Tokens with status Serving.
    pub serving: u64,
    /// Tokens with status Completed.
    pub completed: u64,
    /// Tokens with status Skipped.
    pub skipped: u64,
    /// Tokens with status Cancelled.
    pub cancelled: u64,
    /// Observed mean service duration in minutes over completed tokens,
    /// or `None` when nothing has completed yet.
    pub avg_service_minutes: Option<f64>,
}

// ---------------------------------------------------------------------------
// Persisted snapshot
// ---------------------------------------------------------------------------

/// The full persisted state of one operational day.
///
/// This is the logical layout the persistence layer stores and the engine
/// reloads on restart: the token list in insertion order, the counter set,
/// and the day-boundary date of the last reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QueueSnapshot {
    /// All tokens issued today, in insertion order.
    pub tokens: Vec<Token>,
    /// The counter set with current assignments.
    pub counters: Vec<Counter>,
    /// The calendar date the state was last reset on.
    pub last_reset_date: NaiveDate,
}
