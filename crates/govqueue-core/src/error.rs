//! Error types for dispatch operations.
//!
//! Every failed precondition check returns one of these kinds; no
//! operation mutates partial state or retries internally. Surfacing the
//! error to an operator is the presentation layer's responsibility.

use govqueue_types::{CounterId, TokenId, TokenStatus};

/// Errors that can occur during dispatch operations.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The referenced token does not exist in the store.
    #[error("token not found: {0}")]
    TokenNotFound(TokenId),

    /// The referenced counter does not exist in the registry.
    #[error("counter not found: {0}")]
    CounterNotFound(CounterId),

    /// A dispatch was attempted with no Waiting tokens. A reported,
    /// non-fatal condition, not a defect.
    #[error("no tokens waiting in queue")]
    QueueEmpty,

    /// A dispatch was attempted on a counter that already holds a token.
    #[error("counter {counter} is already serving token {serving}")]
    CounterBusy {
        /// The occupied counter.
        counter: CounterId,
        /// The token it is currently serving.
        serving: TokenId,
    },

    /// A completion, skip, or cancellation was attempted on a token that
    /// is not in the expected state at the expected counter.
    #[error("token {token} is {status}, not eligible for this transition")]
    InvalidTransition {
        /// The token the transition targeted.
        token: TokenId,
        /// Its actual status at the time of the attempt.
        status: TokenStatus,
    },
}
