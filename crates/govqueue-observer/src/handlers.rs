//! Read-only REST endpoint handlers for the observer server.
//!
//! All views are recomputed from the queue service on every request --
//! ordering, positions, and wait estimates come from the core, never
//! from a cached queue structure.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/queue` | Waiting ordering with positions and estimates |
//! | `GET` | `/api/tokens` | All tokens (or `?limit=N` recent activity) |
//! | `GET` | `/api/tokens/:id` | Single token with live wait estimate |
//! | `GET` | `/api/counters` | Counters with their current token |
//! | `GET` | `/api/stats` | Daily aggregate counts |

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use uuid::Uuid;

use govqueue_types::{Counter, Token, TokenId};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter and response types
// ---------------------------------------------------------------------------

/// Query parameters for the `GET /api/tokens` endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct TokensQuery {
    /// When set, return only the N most recent tokens, newest first
    /// (the admin dashboard's recent-activity view). Without it, all
    /// tokens are returned in insertion order.
    pub limit: Option<usize>,
}

/// One row of the live queue view.
#[derive(Debug, serde::Serialize)]
pub struct QueueEntry {
    /// 1-based rank in the waiting ordering.
    pub position: usize,
    /// The waiting token.
    pub token: Token,
    /// Deterministic wait estimate in minutes: `position * category
    /// average`.
    pub estimated_wait_minutes: u64,
}

/// A single token with its live queue placement.
#[derive(Debug, serde::Serialize)]
pub struct TokenDetail {
    /// The token.
    pub token: Token,
    /// 1-based rank while Waiting, absent otherwise.
    pub position: Option<usize>,
    /// Wait estimate while Waiting, absent otherwise.
    pub estimated_wait_minutes: Option<u64>,
}

/// A counter together with the token it is serving, if any.
#[derive(Debug, serde::Serialize)]
pub struct CounterView {
    /// The counter record.
    pub counter: Counter,
    /// The token currently being served here.
    pub current_token: Option<Token>,
}

/// Parse a token id from a request path segment.
pub(crate) fn parse_token_id(raw: &str) -> Result<TokenId, ObserverError> {
    Uuid::parse_str(raw)
        .map(TokenId::from)
        .map_err(|_err| ObserverError::InvalidUuid(raw.to_owned()))
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing queue status and API links.
///
/// This is the placeholder dashboard until the React frontend is wired
/// up against the JSON API.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let queue = state.queue.read().await;
    let stats = queue.stats();
    let counters = queue.counters().len();
    let date = queue.last_reset_date();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>GovQueue</title>
    <style>
        body {{
            background: #f8fafc;
            color: #1e293b;
            font-family: system-ui, -apple-system, sans-serif;
            padding: 2rem;
            max-width: 760px;
            margin: 0 auto;
        }}
        h1 {{ color: #1e3a8a; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #64748b; margin-top: 0; }}
        .card {{
            display: inline-block;
            background: #ffffff;
            border: 1px solid #e2e8f0;
            border-radius: 8px;
            padding: 0.75rem 1.25rem;
            margin: 0.4rem 0.4rem 0.4rem 0;
            min-width: 100px;
        }}
        .card .label {{ color: #64748b; font-size: 0.8rem; text-transform: uppercase; }}
        .card .value {{ color: #2563eb; font-size: 1.6rem; font-weight: 800; }}
        a {{ color: #2563eb; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.25rem 0; font-family: monospace; }}
        .live {{ color: #16a34a; font-weight: 700; }}
    </style>
</head>
<body>
    <h1>GovQueue</h1>
    <p class="subtitle">Official token management system -- operational day {date}</p>

    <p>System: <span class="live">LIVE</span></p>

    <div>
        <div class="card"><div class="label">Issued</div><div class="value">{issued}</div></div>
        <div class="card"><div class="label">Waiting</div><div class="value">{waiting}</div></div>
        <div class="card"><div class="label">Serving</div><div class="value">{serving}</div></div>
        <div class="card"><div class="label">Served</div><div class="value">{completed}</div></div>
        <div class="card"><div class="label">Counters</div><div class="value">{counters}</div></div>
    </div>

    <h2>API</h2>
    <ul>
        <li>GET <a href="/api/queue">/api/queue</a> -- waiting queue with positions and estimates</li>
        <li>GET <a href="/api/tokens">/api/tokens</a> -- all tokens (?limit=N for recent activity)</li>
        <li>GET /api/tokens/:id -- single token with live estimate</li>
        <li>GET <a href="/api/counters">/api/counters</a> -- counter status grid</li>
        <li>GET <a href="/api/stats">/api/stats</a> -- daily statistics</li>
        <li>POST /api/tokens -- issue a token</li>
        <li>POST /api/tokens/:id/cancel -- cancel a waiting token</li>
        <li>POST /api/counters/:id/call-next -- call the next token</li>
        <li>POST /api/counters/:id/complete -- complete the current token</li>
        <li>POST /api/counters/:id/skip -- mark the current token a no-show</li>
        <li>WS  /ws/queue -- live queue event stream</li>
    </ul>
</body>
</html>"#,
        issued = stats.total_issued,
        waiting = stats.waiting,
        serving = stats.serving,
        completed = stats.completed,
    ))
}

// ---------------------------------------------------------------------------
// GET /api/queue -- the waiting ordering
// ---------------------------------------------------------------------------

/// Return the waiting queue in dispatch order with 1-based positions and
/// deterministic wait estimates.
pub async fn get_queue(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let queue = state.queue.read().await;

    let entries: Vec<QueueEntry> = queue
        .waiting_order()
        .into_iter()
        .enumerate()
        .map(|(index, token)| QueueEntry {
            position: index.saturating_add(1),
            estimated_wait_minutes: queue.estimated_wait_minutes(token.id).unwrap_or(0),
            token: token.clone(),
        })
        .collect();

    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// GET /api/tokens -- all tokens / recent activity
// ---------------------------------------------------------------------------

/// Return all tokens in insertion order, or the most recent `limit`
/// tokens newest-first when the query parameter is present.
pub async fn list_tokens(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokensQuery>,
) -> Result<impl IntoResponse, ObserverError> {
    let queue = state.queue.read().await;

    let tokens: Vec<Token> = match query.limit {
        Some(limit) => queue.recent_tokens(limit).into_iter().cloned().collect(),
        None => queue.tokens().to_vec(),
    };

    Ok(Json(tokens))
}

// ---------------------------------------------------------------------------
// GET /api/tokens/:id -- single token
// ---------------------------------------------------------------------------

/// Return a single token with its live position and wait estimate.
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let token_id = parse_token_id(&id)?;
    let queue = state.queue.read().await;

    let token = queue
        .token(token_id)
        .ok_or_else(|| ObserverError::NotFound(format!("token not found: {token_id}")))?;

    Ok(Json(TokenDetail {
        token: token.clone(),
        position: queue.position(token_id),
        estimated_wait_minutes: queue.estimated_wait_minutes(token_id),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/counters -- counter status grid
// ---------------------------------------------------------------------------

/// Return all counters with the token each is currently serving.
pub async fn list_counters(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let queue = state.queue.read().await;

    let views: Vec<CounterView> = queue
        .counters()
        .iter()
        .map(|counter| CounterView {
            current_token: counter
                .current_token_id
                .and_then(|id| queue.token(id))
                .cloned(),
            counter: counter.clone(),
        })
        .collect();

    Ok(Json(views))
}

// ---------------------------------------------------------------------------
// GET /api/stats -- daily statistics
// ---------------------------------------------------------------------------

/// Return the day's aggregate counts.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let queue = state.queue.read().await;
    Ok(Json(queue.stats()))
}
