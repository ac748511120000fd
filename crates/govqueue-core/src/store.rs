//! The token store: the authoritative set of all tokens issued today.
//!
//! The store holds tokens in insertion order and is append-only except
//! for status/assignment mutation, which only the dispatch controller
//! performs. All filtered views (waiting list, recent activity,
//! statistics) are computed on read from [`TokenStore::all`] -- no view
//! is ever cached.
//!
//! # Design
//!
//! - **Insertion order**: `all()` returns tokens in issuance order.
//! - **Gap-free sequences**: the per-category sequence number counts all
//!   previously issued tokens of that category, terminal ones included,
//!   so numbers are never reused.
//! - **Linear scans**: a single operational day holds hundreds of tokens
//!   at most; every query is a straightforward pass over the list.

use chrono::{DateTime, Utc};
use govqueue_types::{ServiceCategory, Token, TokenId, TokenStatus};

/// Parameters for issuing a new token.
///
/// Packs the issuance arguments into a single struct for call-site
/// readability; the display prefix and clock value are supplied by the
/// dispatch controller.
#[derive(Debug, Clone)]
pub struct IssueParams {
    /// The service category to queue for.
    pub category: ServiceCategory,
    /// Requester's name, optional free text.
    pub requester_name: Option<String>,
    /// Requester's phone, optional free text.
    pub requester_phone: Option<String>,
    /// Whether the token is issued with priority.
    pub is_priority: bool,
}

/// The authoritative set of all tokens issued in the current day.
#[derive(Debug, Default)]
pub struct TokenStore {
    /// All tokens, in insertion order.
    tokens: Vec<Token>,
}

impl TokenStore {
    /// Create a new empty store.
    pub const fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Rebuild a store from a persisted token list (insertion order).
    pub const fn restore(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Return the number of tokens issued today.
    pub const fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Return whether no tokens have been issued today.
    pub const fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Return all tokens, in insertion order.
    ///
    /// This is the base for every filtered view: the waiting ordering,
    /// the recent-activity list, and the daily statistics.
    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// Look up a token by id.
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Look up a token mutably. Only the dispatch controller mutates
    /// tokens, and only their status/assignment fields.
    pub(crate) fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    /// Count every token of a category issued today, regardless of status.
    ///
    /// Terminal tokens count too: sequence numbers are never reused.
    pub fn category_count(&self, category: ServiceCategory) -> usize {
        self.tokens.iter().filter(|t| t.category == category).count()
    }

    /// Issue a new token: compute the next gap-free sequence number for
    /// the category, build the display id from the registry prefix, and
    /// append a Waiting token stamped with the supplied clock value.
    ///
    /// Never fails: there is no capacity limit. Returns a copy of the
    /// appended token.
    pub fn issue(&mut self, params: IssueParams, prefix: &str, now: DateTime<Utc>) -> Token {
        let sequence = self.category_count(params.category).saturating_add(1);
        let display_id = format!("{prefix}-{sequence:03}");

        let token = Token {
            id: TokenId::new(),
            display_id,
            category: params.category,
            requester_name: params.requester_name,
            requester_phone: params.requester_phone,
            is_priority: params.is_priority,
            status: TokenStatus::Waiting,
            issued_at: now,
            assigned_counter: None,
            completed_at: None,
        };

        self.tokens.push(token.clone());
        token
    }

    /// The most recently issued tokens, newest first, capped at `limit`.
    ///
    /// Backs the recent-activity table on the admin dashboard.
    pub fn recent(&self, limit: usize) -> Vec<&Token> {
        self.tokens.iter().rev().take(limit).collect()
    }

    /// Remove every token. Called only by the day-boundary reset.
    pub(crate) fn clear(&mut self) {
        self.tokens.clear();
    }
}
