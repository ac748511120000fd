//! Axum router construction for the observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/queue` -- `WebSocket` queue event stream
/// - `GET /api/queue` -- waiting ordering with positions and estimates
/// - `GET /api/tokens` -- token list / recent activity
/// - `GET /api/tokens/:id` -- single token detail
/// - `GET /api/counters` -- counter status grid
/// - `GET /api/stats` -- daily statistics
/// - `POST /api/tokens` -- issue a token
/// - `POST /api/tokens/:id/cancel` -- cancel a waiting token
/// - `POST /api/counters/:id/call-next` -- dispatch the next token
/// - `POST /api/counters/:id/complete` -- complete the current token
/// - `POST /api/counters/:id/skip` -- no-show the current token
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/queue", get(ws::ws_queue))
        // REST API: reads
        .route("/api/queue", get(handlers::get_queue))
        .route(
            "/api/tokens",
            get(handlers::list_tokens).post(operator::issue_token),
        )
        .route("/api/tokens/{id}", get(handlers::get_token))
        .route("/api/counters", get(handlers::list_counters))
        .route("/api/stats", get(handlers::get_stats))
        // REST API: commands
        .route("/api/tokens/{id}/cancel", post(operator::cancel_token))
        .route("/api/counters/{id}/call-next", post(operator::call_next))
        .route("/api/counters/{id}/complete", post(operator::complete))
        .route("/api/counters/{id}/skip", post(operator::skip))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
