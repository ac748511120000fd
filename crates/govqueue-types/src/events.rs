//! Queue lifecycle events pushed to live-status clients.
//!
//! Every successful state transition produces one [`QueueEvent`] that the
//! observer broadcasts over the `WebSocket` stream. Events are a
//! notification surface, not a source of truth -- clients re-fetch the
//! queue views to render state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::ServiceCategory;
use crate::ids::{CounterId, TokenId};

/// A queue state transition, tagged for the dashboard frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum QueueEvent {
    /// A new token joined the waiting queue.
    TokenIssued {
        /// The issued token.
        token_id: TokenId,
        /// Its display label.
        display_id: String,
        /// The category it queues for.
        category: ServiceCategory,
        /// Whether it was issued with priority.
        is_priority: bool,
    },

    /// A waiting token was called to a counter.
    TokenCalled {
        /// The dispatched token.
        token_id: TokenId,
        /// Its display label.
        display_id: String,
        /// The counter now serving it.
        counter_id: CounterId,
    },

    /// A token's service finished successfully.
    TokenCompleted {
        /// The completed token.
        token_id: TokenId,
        /// Its display label.
        display_id: String,
        /// The counter that served it.
        counter_id: CounterId,
    },

    /// A called token did not show up and was skipped.
    TokenSkipped {
        /// The skipped token.
        token_id: TokenId,
        /// Its display label.
        display_id: String,
        /// The counter it was called to.
        counter_id: CounterId,
    },

    /// A waiting token was withdrawn by its requester.
    TokenCancelled {
        /// The cancelled token.
        token_id: TokenId,
        /// Its display label.
        display_id: String,
    },

    /// The day boundary was crossed and all queue state was cleared.
    DayReset {
        /// The new operational date.
        date: NaiveDate,
    },
}
