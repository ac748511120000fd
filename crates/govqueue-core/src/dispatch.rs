//! Dispatch controller: the state-machine driver over the combined queue
//! state.
//!
//! [`QueueService`] owns the token store, the counter registry, the
//! category registry, and the day-boundary date -- explicit state behind
//! one handle, never ambient globals. All mutations go through its
//! operations, each of which is a synchronous, bounded-time computation
//! that either completes fully or fails with a [`DispatchError`] leaving
//! state untouched.
//!
//! Token transitions: `Waiting -> Serving -> {Completed | Skipped}` and
//! `Waiting -> Cancelled`. Serving tokens are in bijection with occupied
//! counters at every instant.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use govqueue_types::{
    Counter, CounterId, DailyStats, QueueSnapshot, Token, TokenId, TokenStatus,
};

use crate::config::QueueConfig;
use crate::counters::{CounterConfigError, CounterRegistry};
use crate::error::DispatchError;
use crate::ordering;
use crate::registry::{CategoryRegistry, RegistryError};
use crate::stats;
use crate::store::{IssueParams, TokenStore};

/// Errors that can occur when constructing the queue service from
/// configuration. These are startup faults, not runtime conditions.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The service catalog is incomplete or invalid.
    #[error("service catalog error: {source}")]
    Catalog {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },

    /// The counter set is empty or contains duplicates.
    #[error("counter configuration error: {source}")]
    Counters {
        /// The underlying counter configuration error.
        #[from]
        source: CounterConfigError,
    },
}

/// The queue service: single owner of all mutable queue state.
///
/// Callers supply clock values (`now`, `today`) at the boundary so every
/// operation is deterministic and testable. An implementation exposed to
/// concurrent callers must serialize access to this value (the observer
/// holds it behind a write lock); each operation takes `&mut self`, so a
/// read-decide-write sequence is a single critical section.
#[derive(Debug)]
pub struct QueueService {
    /// Read-only category parameters.
    registry: CategoryRegistry,
    /// All tokens issued today.
    tokens: TokenStore,
    /// The counter set with current assignments.
    counters: CounterRegistry,
    /// The pristine counter set restored by the day-boundary reset.
    counter_defaults: CounterRegistry,
    /// The calendar date state was last reset on.
    last_reset: NaiveDate,
}

impl QueueService {
    /// Create a fresh service for the given operational date.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the catalog or counter configuration is
    /// invalid.
    pub fn from_config(config: &QueueConfig, today: NaiveDate) -> Result<Self, SetupError> {
        let registry = CategoryRegistry::from_catalog(&config.catalog)?;
        let counters = CounterRegistry::from_config(&config.counters)?;
        Ok(Self {
            registry,
            tokens: TokenStore::new(),
            counter_defaults: counters.clone(),
            counters,
            last_reset: today,
        })
    }

    /// Rebuild the service from a persisted snapshot.
    ///
    /// The category registry and the reset-default counter set still come
    /// from configuration; tokens, live counter assignments, and the
    /// boundary date come from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the catalog or counter configuration is
    /// invalid.
    pub fn restore(config: &QueueConfig, snapshot: QueueSnapshot) -> Result<Self, SetupError> {
        let registry = CategoryRegistry::from_catalog(&config.catalog)?;
        let counter_defaults = CounterRegistry::from_config(&config.counters)?;
        Ok(Self {
            registry,
            tokens: TokenStore::restore(snapshot.tokens),
            counters: CounterRegistry::restore(snapshot.counters),
            counter_defaults,
            last_reset: snapshot.last_reset_date,
        })
    }

    // -------------------------------------------------------------------
    // Mutating operations
    // -------------------------------------------------------------------

    /// Issue a new Waiting token. Never fails: there is no capacity limit.
    pub fn issue(&mut self, params: IssueParams, now: DateTime<Utc>) -> Token {
        let prefix = self.registry.prefix(params.category).to_owned();
        let token = self.tokens.issue(params, &prefix, now);
        info!(
            token = %token.display_id,
            category = %token.category,
            priority = token.is_priority,
            "Token issued"
        );
        token
    }

    /// Call the head of the waiting ordering to a counter.
    ///
    /// The head token becomes Serving with `assigned_counter` set; the
    /// counter's `current_token_id` points at it.
    ///
    /// The counter's `is_active` flag is deliberately not consulted: an
    /// offline counter can still be dispatched to when called directly.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::CounterNotFound`] for an unknown counter.
    /// - [`DispatchError::CounterBusy`] if the counter already holds a
    ///   token; a counter serves exactly one token at a time.
    /// - [`DispatchError::QueueEmpty`] if no Waiting tokens exist.
    pub fn call_next(&mut self, counter_id: CounterId) -> Result<Token, DispatchError> {
        let counter = self
            .counters
            .get(counter_id)
            .ok_or(DispatchError::CounterNotFound(counter_id))?;
        if let Some(serving) = counter.current_token_id {
            return Err(DispatchError::CounterBusy {
                counter: counter_id,
                serving,
            });
        }

        let head = ordering::waiting_order(self.tokens.all())
            .first()
            .map(|t| t.id)
            .ok_or(DispatchError::QueueEmpty)?;

        let token = self
            .tokens
            .get_mut(head)
            .ok_or(DispatchError::TokenNotFound(head))?;
        token.status = TokenStatus::Serving;
        token.assigned_counter = Some(counter_id);
        let called = token.clone();

        if let Some(counter) = self.counters.get_mut(counter_id) {
            counter.current_token_id = Some(head);
        }

        info!(token = %called.display_id, counter = %counter_id, "Token called to counter");
        Ok(called)
    }

    /// Mark the counter's current token as served successfully.
    ///
    /// Sets Completed with a completion timestamp, clears both the
    /// token's counter assignment and the counter's current token.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::CounterNotFound`] / [`DispatchError::TokenNotFound`]
    ///   for unknown ids.
    /// - [`DispatchError::InvalidTransition`] if the token is not the
    ///   counter's current Serving token.
    pub fn complete(
        &mut self,
        counter_id: CounterId,
        token_id: TokenId,
        now: DateTime<Utc>,
    ) -> Result<Token, DispatchError> {
        self.finish_service(counter_id, token_id, TokenStatus::Completed, Some(now))
    }

    /// Mark the counter's current token as a no-show.
    ///
    /// Sets Skipped with no completion timestamp and clears the counter.
    /// A Skipped token is terminal; it is never re-queued automatically.
    /// The requester must obtain a fresh token to be served.
    ///
    /// # Errors
    ///
    /// Same conditions as [`QueueService::complete`].
    pub fn skip(
        &mut self,
        counter_id: CounterId,
        token_id: TokenId,
    ) -> Result<Token, DispatchError> {
        self.finish_service(counter_id, token_id, TokenStatus::Skipped, None)
    }

    /// Withdraw a Waiting token at the requester's request.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::TokenNotFound`] for an unknown token.
    /// - [`DispatchError::InvalidTransition`] if the token is not Waiting
    ///   (Serving and terminal tokens cannot be cancelled).
    pub fn cancel(&mut self, token_id: TokenId) -> Result<Token, DispatchError> {
        let token = self
            .tokens
            .get(token_id)
            .ok_or(DispatchError::TokenNotFound(token_id))?;
        if token.status != TokenStatus::Waiting {
            return Err(DispatchError::InvalidTransition {
                token: token_id,
                status: token.status,
            });
        }

        let token = self
            .tokens
            .get_mut(token_id)
            .ok_or(DispatchError::TokenNotFound(token_id))?;
        token.status = TokenStatus::Cancelled;
        let cancelled = token.clone();

        info!(token = %cancelled.display_id, "Token cancelled by requester");
        Ok(cancelled)
    }

    /// Clear all state if the supplied date differs from the stored
    /// boundary date. Returns whether a reset occurred.
    ///
    /// On reset: the token store is emptied, the counter set is restored
    /// to its configured defaults with no assignments, and the new date
    /// is recorded. Equal dates leave all state untouched. This is the
    /// only deletion path in the system.
    pub fn reset_if_new_day(&mut self, today: NaiveDate) -> bool {
        if today == self.last_reset {
            return false;
        }

        self.tokens.clear();
        self.counters = self.counter_defaults.clone();
        self.last_reset = today;

        info!(date = %today, "Day boundary crossed; queue state cleared");
        true
    }

    /// Shared tail of `complete` and `skip`: verify the token is the
    /// counter's current Serving token, then move it to the terminal
    /// status and clear both sides of the assignment.
    fn finish_service(
        &mut self,
        counter_id: CounterId,
        token_id: TokenId,
        terminal: TokenStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Token, DispatchError> {
        let counter = self
            .counters
            .get(counter_id)
            .ok_or(DispatchError::CounterNotFound(counter_id))?;
        let token = self
            .tokens
            .get(token_id)
            .ok_or(DispatchError::TokenNotFound(token_id))?;

        if counter.current_token_id != Some(token_id) || token.status != TokenStatus::Serving {
            return Err(DispatchError::InvalidTransition {
                token: token_id,
                status: token.status,
            });
        }

        let token = self
            .tokens
            .get_mut(token_id)
            .ok_or(DispatchError::TokenNotFound(token_id))?;
        token.status = terminal;
        token.completed_at = completed_at;
        token.assigned_counter = None;
        let finished = token.clone();

        if let Some(counter) = self.counters.get_mut(counter_id) {
            counter.current_token_id = None;
        }

        info!(
            token = %finished.display_id,
            counter = %counter_id,
            status = %finished.status,
            "Token left counter"
        );
        Ok(finished)
    }

    // -------------------------------------------------------------------
    // Derived reads (recomputed on every call)
    // -------------------------------------------------------------------

    /// All tokens, insertion order.
    pub fn tokens(&self) -> &[Token] {
        self.tokens.all()
    }

    /// Look up a token by id.
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id)
    }

    /// The most recently issued tokens, newest first.
    pub fn recent_tokens(&self, limit: usize) -> Vec<&Token> {
        self.tokens.recent(limit)
    }

    /// All counters, configured order.
    pub fn counters(&self) -> &[Counter] {
        self.counters.all()
    }

    /// Look up a counter by id.
    pub fn counter(&self, id: CounterId) -> Option<&Counter> {
        self.counters.get(id)
    }

    /// The current waiting ordering: priority first, then issuance time.
    pub fn waiting_order(&self) -> Vec<&Token> {
        ordering::waiting_order(self.tokens.all())
    }

    /// The 1-based rank of a Waiting token in the current ordering.
    pub fn position(&self, id: TokenId) -> Option<usize> {
        ordering::position(self.tokens.all(), id)
    }

    /// Deterministic wait estimate in minutes for a Waiting token.
    pub fn estimated_wait_minutes(&self, id: TokenId) -> Option<u64> {
        ordering::estimated_wait_minutes(self.tokens.all(), &self.registry, id)
    }

    /// Aggregate counts for the day.
    pub fn stats(&self) -> DailyStats {
        stats::daily_stats(self.tokens.all())
    }

    /// The read-only category registry.
    pub const fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    /// The calendar date state was last reset on.
    pub const fn last_reset_date(&self) -> NaiveDate {
        self.last_reset
    }

    /// The full persistable state: tokens, counters, boundary date.
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            tokens: self.tokens.all().to_vec(),
            counters: self.counters.all().to_vec(),
            last_reset_date: self.last_reset,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use govqueue_types::ServiceCategory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    fn service() -> QueueService {
        QueueService::from_config(&QueueConfig::default(), today()).unwrap()
    }

    fn issue(
        service: &mut QueueService,
        category: ServiceCategory,
        is_priority: bool,
        secs: i64,
    ) -> Token {
        service.issue(
            IssueParams {
                category,
                requester_name: None,
                requester_phone: None,
                is_priority,
            },
            at(secs),
        )
    }

    /// The core invariant: Serving tokens and occupied counters are in
    /// bijection -- no orphaned Serving token, no counter pointing at a
    /// non-Serving token, no two counters sharing a token.
    fn assert_serving_bijection(service: &QueueService) {
        let serving: Vec<&Token> = service
            .tokens()
            .iter()
            .filter(|t| t.status == TokenStatus::Serving)
            .collect();
        let occupied: Vec<&Counter> = service
            .counters()
            .iter()
            .filter(|c| c.current_token_id.is_some())
            .collect();

        assert_eq!(serving.len(), occupied.len());
        for token in &serving {
            let holders: Vec<&&Counter> = occupied
                .iter()
                .filter(|c| c.current_token_id == Some(token.id))
                .collect();
            assert_eq!(holders.len(), 1);
            assert_eq!(token.assigned_counter, holders.first().map(|c| c.id));
        }
    }

    #[test]
    fn issue_uses_registry_prefix() {
        let mut service = service();
        let token = issue(&mut service, ServiceCategory::Ration, false, 0);
        assert_eq!(token.display_id, "N-001");
    }

    #[test]
    fn call_next_assigns_head_to_counter() {
        let mut service = service();
        let token = issue(&mut service, ServiceCategory::Revenue, false, 0);

        let called = service.call_next(CounterId::new(1)).unwrap();
        assert_eq!(called.id, token.id);
        assert_eq!(called.status, TokenStatus::Serving);
        assert_eq!(called.assigned_counter, Some(CounterId::new(1)));
        assert_eq!(
            service.counter(CounterId::new(1)).unwrap().current_token_id,
            Some(token.id),
        );
        assert_serving_bijection(&service);
    }

    #[test]
    fn call_next_on_empty_queue_mutates_nothing() {
        let mut service = service();
        let before = service.snapshot();

        let result = service.call_next(CounterId::new(1));
        assert!(matches!(result, Err(DispatchError::QueueEmpty)));
        assert_eq!(service.snapshot(), before);
    }

    #[test]
    fn call_next_on_busy_counter_mutates_nothing() {
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, false, 0);
        issue(&mut service, ServiceCategory::Revenue, false, 1);
        service.call_next(CounterId::new(1)).unwrap();
        let before = service.snapshot();

        let result = service.call_next(CounterId::new(1));
        assert!(matches!(result, Err(DispatchError::CounterBusy { .. })));
        assert_eq!(service.snapshot(), before);
        assert_serving_bijection(&service);
    }

    #[test]
    fn call_next_on_unknown_counter_fails() {
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, false, 0);

        let result = service.call_next(CounterId::new(42));
        assert!(matches!(result, Err(DispatchError::CounterNotFound(_))));
    }

    #[test]
    fn call_next_ignores_inactive_flag() {
        // The reference dispatch logic does not verify is_active before
        // assignment; an offline counter can still be dispatched to.
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, false, 0);

        // Flip the flag by restoring a snapshot with counter 1 inactive.
        let mut snapshot = service.snapshot();
        for counter in &mut snapshot.counters {
            if counter.id == CounterId::new(1) {
                counter.is_active = false;
            }
        }
        let mut service = QueueService::restore(&QueueConfig::default(), snapshot).unwrap();

        let result = service.call_next(CounterId::new(1));
        assert!(result.is_ok());
    }

    #[test]
    fn complete_sets_timestamp_and_clears_both_sides() {
        let mut service = service();
        let token = issue(&mut service, ServiceCategory::Aadhaar, false, 0);
        service.call_next(CounterId::new(2)).unwrap();

        let done = service
            .complete(CounterId::new(2), token.id, at(600))
            .unwrap();
        assert_eq!(done.status, TokenStatus::Completed);
        assert_eq!(done.completed_at, Some(at(600)));
        assert_eq!(done.assigned_counter, None);
        assert_eq!(
            service.counter(CounterId::new(2)).unwrap().current_token_id,
            None,
        );
        assert_serving_bijection(&service);
    }

    #[test]
    fn complete_requires_the_counters_current_token() {
        let mut service = service();
        let first = issue(&mut service, ServiceCategory::Revenue, false, 0);
        let second = issue(&mut service, ServiceCategory::Revenue, false, 1);
        service.call_next(CounterId::new(1)).unwrap();
        service.call_next(CounterId::new(2)).unwrap();
        let before = service.snapshot();

        // `second` is serving at counter 2, not counter 1.
        let result = service.complete(CounterId::new(1), second.id, at(600));
        assert!(matches!(
            result,
            Err(DispatchError::InvalidTransition { .. }),
        ));
        assert_eq!(service.snapshot(), before);

        // Completing the right pairing still works afterwards.
        assert!(service.complete(CounterId::new(1), first.id, at(700)).is_ok());
        assert_serving_bijection(&service);
    }

    #[test]
    fn complete_rejects_waiting_token() {
        let mut service = service();
        let token = issue(&mut service, ServiceCategory::Revenue, false, 0);

        let result = service.complete(CounterId::new(1), token.id, at(600));
        assert!(matches!(
            result,
            Err(DispatchError::InvalidTransition { .. }),
        ));
    }

    #[test]
    fn complete_unknown_token_fails_with_not_found() {
        let mut service = service();
        let result = service.complete(CounterId::new(1), TokenId::new(), at(0));
        assert!(matches!(result, Err(DispatchError::TokenNotFound(_))));
    }

    #[test]
    fn skip_is_terminal_without_timestamp_and_never_requeued() {
        let mut service = service();
        let token = issue(&mut service, ServiceCategory::Utility, false, 0);
        service.call_next(CounterId::new(1)).unwrap();

        let skipped = service.skip(CounterId::new(1), token.id).unwrap();
        assert_eq!(skipped.status, TokenStatus::Skipped);
        assert_eq!(skipped.completed_at, None);
        assert!(service.waiting_order().is_empty());

        // Terminal: no further transitions permitted.
        let result = service.complete(CounterId::new(1), token.id, at(60));
        assert!(matches!(
            result,
            Err(DispatchError::InvalidTransition { .. }),
        ));
        assert_serving_bijection(&service);
    }

    #[test]
    fn cancel_withdraws_waiting_token_only() {
        let mut service = service();
        let first = issue(&mut service, ServiceCategory::Revenue, false, 0);
        let second = issue(&mut service, ServiceCategory::Revenue, false, 1);
        service.call_next(CounterId::new(1)).unwrap();

        // `first` was the head and is now serving; only `second` waits.
        let result = service.cancel(first.id);
        assert!(matches!(
            result,
            Err(DispatchError::InvalidTransition { .. }),
        ));

        let cancelled = service.cancel(second.id).unwrap();
        assert_eq!(cancelled.status, TokenStatus::Cancelled);
        assert!(service.waiting_order().is_empty());
        assert_serving_bijection(&service);
    }

    #[test]
    fn dispatch_scenario_priority_then_fifo_across_counters() {
        // Issue A (Revenue, non-priority, t=0), B (Revenue, priority,
        // t=1), C (Aadhaar, non-priority, t=2).
        let mut service = service();
        let a = issue(&mut service, ServiceCategory::Revenue, false, 0);
        let b = issue(&mut service, ServiceCategory::Revenue, true, 1);
        let c = issue(&mut service, ServiceCategory::Aadhaar, false, 2);

        // Waiting order must be [B, A, C].
        let order: Vec<TokenId> = service.waiting_order().iter().map(|t| t.id).collect();
        assert_eq!(order, vec![b.id, a.id, c.id]);

        // callNext(counter 1) assigns B; callNext(counter 2) assigns A.
        assert_eq!(service.call_next(CounterId::new(1)).unwrap().id, b.id);
        assert_eq!(service.call_next(CounterId::new(2)).unwrap().id, a.id);

        // C is now rank 1 of the remaining waiting set: 1 * avg(Aadhaar).
        assert_eq!(service.position(c.id), Some(1));
        assert_eq!(service.estimated_wait_minutes(c.id), Some(6));
        assert_serving_bijection(&service);
    }

    #[test]
    fn bijection_holds_across_operation_sequences() {
        let mut service = service();
        let t1 = issue(&mut service, ServiceCategory::Revenue, false, 0);
        let t2 = issue(&mut service, ServiceCategory::Aadhaar, true, 1);
        let _t3 = issue(&mut service, ServiceCategory::Ration, false, 2);
        let t4 = issue(&mut service, ServiceCategory::Utility, false, 3);

        assert_eq!(service.call_next(CounterId::new(1)).unwrap().id, t2.id);
        assert_serving_bijection(&service);

        assert_eq!(service.call_next(CounterId::new(2)).unwrap().id, t1.id);
        assert_serving_bijection(&service);

        service.complete(CounterId::new(1), t2.id, at(300)).unwrap();
        assert_serving_bijection(&service);

        service.call_next(CounterId::new(1)).unwrap();
        assert_serving_bijection(&service);

        service.skip(CounterId::new(2), t1.id).unwrap();
        assert_serving_bijection(&service);

        service.cancel(t4.id).unwrap();
        assert_serving_bijection(&service);
    }

    #[test]
    fn reset_on_new_date_clears_everything() {
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, false, 0);
        issue(&mut service, ServiceCategory::Aadhaar, false, 1);
        service.call_next(CounterId::new(1)).unwrap();

        let next_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(service.reset_if_new_day(next_day));

        assert!(service.tokens().is_empty());
        assert!(service
            .counters()
            .iter()
            .all(|c| c.current_token_id.is_none()));
        assert_eq!(service.last_reset_date(), next_day);

        // Sequence numbering restarts with the new day.
        let token = issue(&mut service, ServiceCategory::Revenue, false, 2);
        assert_eq!(token.display_id, "R-001");
    }

    #[test]
    fn reset_on_same_date_leaves_state_untouched() {
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, false, 0);
        service.call_next(CounterId::new(1)).unwrap();
        let before = service.snapshot();

        assert!(!service.reset_if_new_day(today()));
        assert_eq!(service.snapshot(), before);
    }

    #[test]
    fn restore_roundtrips_through_snapshot() {
        let mut service = service();
        issue(&mut service, ServiceCategory::Revenue, true, 0);
        issue(&mut service, ServiceCategory::Utility, false, 1);
        service.call_next(CounterId::new(3)).unwrap();
        let snapshot = service.snapshot();

        let restored = QueueService::restore(&QueueConfig::default(), snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_serving_bijection(&restored);
    }
}
