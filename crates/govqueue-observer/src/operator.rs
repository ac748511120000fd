//! Command REST API handlers: issuance, dispatch, and cancellation.
//!
//! These endpoints are the mutation surface consumed by the token kiosk
//! and the admin dashboard. Each handler takes the write lock on the
//! queue service for its whole read-decide-write sequence, broadcasts the
//! resulting queue event, and persists the snapshot as a post-mutation
//! side effect.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/tokens` | Issue a new token |
//! | `POST` | `/api/tokens/:id/cancel` | Cancel a waiting token |
//! | `POST` | `/api/counters/:id/call-next` | Call the next waiting token |
//! | `POST` | `/api/counters/:id/complete` | Complete the current token |
//! | `POST` | `/api/counters/:id/skip` | Mark the current token a no-show |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use govqueue_core::IssueParams;
use govqueue_types::{CounterId, QueueEvent, ServiceCategory, Token};

use crate::error::ObserverError;
use crate::handlers::parse_token_id;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/tokens`.
#[derive(Debug, serde::Deserialize)]
pub struct IssueTokenRequest {
    /// The service category to queue for.
    pub category: ServiceCategory,
    /// Requester's name, optional.
    pub requester_name: Option<String>,
    /// Requester's phone, optional.
    pub requester_phone: Option<String>,
    /// Priority flag (default false).
    #[serde(default)]
    pub is_priority: bool,
}

/// Response body for `POST /api/tokens`: the issued token and its
/// immediate queue placement.
#[derive(Debug, serde::Serialize)]
pub struct IssuedTokenResponse {
    /// The newly issued token.
    pub token: Token,
    /// Its 1-based rank in the waiting ordering at issuance.
    pub position: Option<usize>,
    /// Its deterministic wait estimate at issuance, in minutes.
    pub estimated_wait_minutes: Option<u64>,
}

/// Request body for the complete and skip endpoints.
///
/// The token id must name the counter's current Serving token; the
/// core rejects anything else with an invalid-transition error.
#[derive(Debug, serde::Deserialize)]
pub struct FinishRequest {
    /// The token to finish.
    pub token_id: String,
}

// ---------------------------------------------------------------------------
// POST /api/tokens
// ---------------------------------------------------------------------------

/// Issue a new token into the waiting queue.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let response = {
        let mut queue = state.queue.write().await;
        let token = queue.issue(
            IssueParams {
                category: request.category,
                requester_name: request.requester_name,
                requester_phone: request.requester_phone,
                is_priority: request.is_priority,
            },
            Utc::now(),
        );
        IssuedTokenResponse {
            position: queue.position(token.id),
            estimated_wait_minutes: queue.estimated_wait_minutes(token.id),
            token,
        }
    };

    state.broadcast(&QueueEvent::TokenIssued {
        token_id: response.token.id,
        display_id: response.token.display_id.clone(),
        category: response.token.category,
        is_priority: response.token.is_priority,
    });
    state.persist().await;

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /api/counters/:id/call-next
// ---------------------------------------------------------------------------

/// Call the head of the waiting queue to a counter.
pub async fn call_next(
    State(state): State<Arc<AppState>>,
    Path(counter): Path<u32>,
) -> Result<impl IntoResponse, ObserverError> {
    let counter_id = CounterId::new(counter);

    let token = {
        let mut queue = state.queue.write().await;
        queue.call_next(counter_id)?
    };

    state.broadcast(&QueueEvent::TokenCalled {
        token_id: token.id,
        display_id: token.display_id.clone(),
        counter_id,
    });
    state.persist().await;

    Ok(Json(token))
}

// ---------------------------------------------------------------------------
// POST /api/counters/:id/complete
// ---------------------------------------------------------------------------

/// Mark the counter's current token as served successfully.
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(counter): Path<u32>,
    Json(request): Json<FinishRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let counter_id = CounterId::new(counter);
    let token_id = parse_token_id(&request.token_id)?;

    let token = {
        let mut queue = state.queue.write().await;
        queue.complete(counter_id, token_id, Utc::now())?
    };

    state.broadcast(&QueueEvent::TokenCompleted {
        token_id: token.id,
        display_id: token.display_id.clone(),
        counter_id,
    });
    state.persist().await;

    Ok(Json(token))
}

// ---------------------------------------------------------------------------
// POST /api/counters/:id/skip
// ---------------------------------------------------------------------------

/// Mark the counter's current token as a no-show.
pub async fn skip(
    State(state): State<Arc<AppState>>,
    Path(counter): Path<u32>,
    Json(request): Json<FinishRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let counter_id = CounterId::new(counter);
    let token_id = parse_token_id(&request.token_id)?;

    let token = {
        let mut queue = state.queue.write().await;
        queue.skip(counter_id, token_id)?
    };

    state.broadcast(&QueueEvent::TokenSkipped {
        token_id: token.id,
        display_id: token.display_id.clone(),
        counter_id,
    });
    state.persist().await;

    Ok(Json(token))
}

// ---------------------------------------------------------------------------
// POST /api/tokens/:id/cancel
// ---------------------------------------------------------------------------

/// Withdraw a waiting token at the requester's request.
pub async fn cancel_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let token_id = parse_token_id(&id)?;

    let token = {
        let mut queue = state.queue.write().await;
        queue.cancel(token_id)?
    };

    state.broadcast(&QueueEvent::TokenCancelled {
        token_id: token.id,
        display_id: token.display_id.clone(),
    });
    state.persist().await;

    Ok(Json(token))
}
