//! Daily statistics, derived on read from the token list.
//!
//! The observed average service duration reported here is display-only
//! (admin dashboard cards); the deterministic wait estimate in
//! [`ordering`](crate::ordering) never consults it.

use govqueue_types::{DailyStats, Token, TokenStatus};

/// Compute the day's aggregate counts from the full token list.
///
/// The average service duration is the mean of `completed_at - issued_at`
/// over Completed tokens, in minutes; `None` when nothing has completed.
pub fn daily_stats(tokens: &[Token]) -> DailyStats {
    let mut waiting: u64 = 0;
    let mut serving: u64 = 0;
    let mut completed: u64 = 0;
    let mut skipped: u64 = 0;
    let mut cancelled: u64 = 0;

    let mut service_seconds: u64 = 0;
    let mut timed_completions: u64 = 0;

    for token in tokens {
        match token.status {
            TokenStatus::Waiting => waiting = waiting.saturating_add(1),
            TokenStatus::Serving => serving = serving.saturating_add(1),
            TokenStatus::Completed => {
                completed = completed.saturating_add(1);
                if let Some(done_at) = token.completed_at {
                    let seconds = done_at
                        .signed_duration_since(token.issued_at)
                        .num_seconds();
                    if let Ok(seconds) = u64::try_from(seconds) {
                        service_seconds = service_seconds.saturating_add(seconds);
                        timed_completions = timed_completions.saturating_add(1);
                    }
                }
            }
            TokenStatus::Skipped => skipped = skipped.saturating_add(1),
            TokenStatus::Cancelled => cancelled = cancelled.saturating_add(1),
        }
    }

    let avg_service_minutes = if timed_completions == 0 {
        None
    } else {
        let avg_seconds = service_seconds
            .checked_div(timed_completions)
            .unwrap_or_default();
        let avg_seconds = u32::try_from(avg_seconds).unwrap_or(u32::MAX);
        Some(f64::from(avg_seconds) / 60.0)
    };

    DailyStats {
        total_issued: u64::try_from(tokens.len()).unwrap_or(u64::MAX),
        waiting,
        serving,
        completed,
        skipped,
        cancelled,
        avg_service_minutes,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use govqueue_types::{ServiceCategory, TokenId};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap()
    }

    fn token(status: TokenStatus, issued: i64, completed: Option<i64>) -> Token {
        Token {
            id: TokenId::new(),
            display_id: "R-001".to_owned(),
            category: ServiceCategory::Revenue,
            requester_name: None,
            requester_phone: None,
            is_priority: false,
            status,
            issued_at: at(issued),
            assigned_counter: None,
            completed_at: completed.map(at),
        }
    }

    #[test]
    fn empty_day_has_zero_counts_and_no_average() {
        let stats = daily_stats(&[]);
        assert_eq!(stats.total_issued, 0);
        assert_eq!(stats.waiting, 0);
        assert_eq!(stats.avg_service_minutes, None);
    }

    #[test]
    fn counts_split_by_status() {
        let tokens = vec![
            token(TokenStatus::Waiting, 0, None),
            token(TokenStatus::Waiting, 1, None),
            token(TokenStatus::Serving, 2, None),
            token(TokenStatus::Completed, 3, Some(300)),
            token(TokenStatus::Skipped, 4, None),
            token(TokenStatus::Cancelled, 5, None),
        ];

        let stats = daily_stats(&tokens);
        assert_eq!(stats.total_issued, 6);
        assert_eq!(stats.waiting, 2);
        assert_eq!(stats.serving, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn average_covers_completed_tokens_only() {
        let tokens = vec![
            // 4 minutes from issuance to completion.
            token(TokenStatus::Completed, 0, Some(240)),
            // 8 minutes.
            token(TokenStatus::Completed, 100, Some(580)),
            // Skipped tokens carry no completion time and are excluded.
            token(TokenStatus::Skipped, 200, None),
        ];

        let stats = daily_stats(&tokens);
        assert_eq!(stats.avg_service_minutes, Some(6.0));
    }
}
