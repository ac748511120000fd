//! Queue ordering engine: the derived priority-then-FIFO waiting view.
//!
//! The waiting ordering is a pure function of the token list, recomputed
//! from a linear scan on every dispatch decision and every status
//! display. No queue structure is ever materialized or cached, so the
//! ordering can never fall out of sync with the token store.
//!
//! Two sort keys:
//! 1. Priority tokens rank before all non-priority tokens.
//! 2. Within a priority class, earlier `issued_at` ranks first.
//!
//! The wait estimate for the token at rank `k` is `k * average_minutes`
//! of its category -- the 1-based rank, so the head of the queue is
//! quoted one full average service interval. That conservative bias comes
//! from the reference formula and is preserved exactly.

use govqueue_types::{Token, TokenId, TokenStatus};

use crate::registry::CategoryRegistry;

/// Compute the waiting ordering over the given token list.
///
/// Returns references to all Waiting tokens, priority class first, then
/// `issued_at` ascending within each class. The sort is stable, so tokens
/// with identical timestamps keep their insertion order.
pub fn waiting_order(tokens: &[Token]) -> Vec<&Token> {
    let mut waiting: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.status == TokenStatus::Waiting)
        .collect();
    waiting.sort_by_key(|t| (!t.is_priority, t.issued_at));
    waiting
}

/// The 1-based rank of a token in the waiting ordering, or `None` if the
/// token is not Waiting.
pub fn position(tokens: &[Token], id: TokenId) -> Option<usize> {
    waiting_order(tokens)
        .iter()
        .position(|t| t.id == id)
        .map(|index| index.saturating_add(1))
}

/// Deterministic wait estimate in minutes for a waiting token:
/// `rank * average_minutes(category)`.
///
/// Returns `None` if the token does not exist or is not Waiting. The
/// estimate is a pure function of queue position and the fixed category
/// table; observed service history never feeds it.
pub fn estimated_wait_minutes(
    tokens: &[Token],
    registry: &CategoryRegistry,
    id: TokenId,
) -> Option<u64> {
    let token = tokens.iter().find(|t| t.id == id)?;
    let rank = position(tokens, id)?;
    let rank = u64::try_from(rank).unwrap_or(u64::MAX);
    let average = u64::from(registry.average_minutes(token.category));
    Some(rank.saturating_mul(average))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use govqueue_types::ServiceCategory;

    use crate::config::QueueConfig;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    fn token(
        display_id: &str,
        category: ServiceCategory,
        is_priority: bool,
        issued_at: DateTime<Utc>,
    ) -> Token {
        Token {
            id: TokenId::new(),
            display_id: display_id.to_owned(),
            category,
            requester_name: None,
            requester_phone: None,
            is_priority,
            status: TokenStatus::Waiting,
            issued_at,
            assigned_counter: None,
            completed_at: None,
        }
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_catalog(&QueueConfig::default().catalog).unwrap()
    }

    #[test]
    fn priority_ranks_before_non_priority_regardless_of_issuance_order() {
        let tokens = vec![
            token("R-001", ServiceCategory::Revenue, false, at(0)),
            token("R-002", ServiceCategory::Revenue, true, at(1)),
            token("A-001", ServiceCategory::Aadhaar, false, at(2)),
        ];

        let order: Vec<&str> = waiting_order(&tokens)
            .iter()
            .map(|t| t.display_id.as_str())
            .collect();
        assert_eq!(order, ["R-002", "R-001", "A-001"]);
    }

    #[test]
    fn fifo_within_each_priority_class() {
        let tokens = vec![
            token("U-001", ServiceCategory::Utility, true, at(5)),
            token("U-002", ServiceCategory::Utility, false, at(1)),
            token("U-003", ServiceCategory::Utility, true, at(3)),
            token("U-004", ServiceCategory::Utility, false, at(2)),
        ];

        let order: Vec<&str> = waiting_order(&tokens)
            .iter()
            .map(|t| t.display_id.as_str())
            .collect();
        assert_eq!(order, ["U-003", "U-001", "U-002", "U-004"]);
    }

    #[test]
    fn non_waiting_tokens_are_excluded() {
        let mut serving = token("R-001", ServiceCategory::Revenue, false, at(0));
        serving.status = TokenStatus::Serving;
        let mut done = token("R-002", ServiceCategory::Revenue, true, at(1));
        done.status = TokenStatus::Completed;
        let waiting = token("R-003", ServiceCategory::Revenue, false, at(2));

        let tokens = vec![serving, done, waiting];
        let order = waiting_order(&tokens);
        assert_eq!(order.len(), 1);
        assert_eq!(order.first().map(|t| t.display_id.as_str()), Some("R-003"));
    }

    #[test]
    fn position_is_one_based() {
        let first = token("R-001", ServiceCategory::Revenue, false, at(0));
        let second = token("R-002", ServiceCategory::Revenue, false, at(1));
        let tokens = vec![first.clone(), second.clone()];

        assert_eq!(position(&tokens, first.id), Some(1));
        assert_eq!(position(&tokens, second.id), Some(2));
        assert_eq!(position(&tokens, TokenId::new()), None);
    }

    #[test]
    fn estimate_is_rank_times_category_average() {
        let registry = registry();
        let first = token("A-001", ServiceCategory::Aadhaar, false, at(0));
        let second = token("R-001", ServiceCategory::Revenue, false, at(1));
        let tokens = vec![first.clone(), second.clone()];

        // Head of queue: one full Aadhaar interval, not zero.
        assert_eq!(
            estimated_wait_minutes(&tokens, &registry, first.id),
            Some(6),
        );
        // Rank 2 in the Revenue category: 2 * 8.
        assert_eq!(
            estimated_wait_minutes(&tokens, &registry, second.id),
            Some(16),
        );
    }

    #[test]
    fn estimate_is_monotonic_in_rank_for_fixed_category() {
        let registry = registry();
        let tokens: Vec<Token> = (0..6_i64)
            .map(|i| token(&format!("N-{i:03}"), ServiceCategory::Ration, false, at(i)))
            .collect();

        let estimates: Vec<u64> = tokens
            .iter()
            .filter_map(|t| estimated_wait_minutes(&tokens, &registry, t.id))
            .collect();
        assert_eq!(estimates.len(), tokens.len());
        assert!(estimates.windows(2).all(|w| w.first() <= w.last()));
    }

    #[test]
    fn estimate_is_none_for_non_waiting_token() {
        let registry = registry();
        let mut serving = token("R-001", ServiceCategory::Revenue, false, at(0));
        serving.status = TokenStatus::Serving;
        let id = serving.id;
        let tokens = vec![serving];

        assert_eq!(estimated_wait_minutes(&tokens, &registry, id), None);
    }
}
