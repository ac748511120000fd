//! Error types for the observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! can be converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Domain
//! dispatch failures map onto client-visible statuses: unknown ids are
//! 404, rejected preconditions (empty queue, busy counter, wrong state)
//! are 409.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use govqueue_core::DispatchError;

/// Errors that can occur in the observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A dispatch precondition failed (empty queue, busy counter,
    /// invalid transition). The message is the domain error text.
    #[error("{0}")]
    Conflict(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An invalid query parameter or request body was provided.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DispatchError> for ObserverError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::TokenNotFound(_) | DispatchError::CounterNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            DispatchError::QueueEmpty
            | DispatchError::CounterBusy { .. }
            | DispatchError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::InvalidRequest(msg) | Self::InvalidUuid(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govqueue_types::{CounterId, TokenId};

    #[test]
    fn unknown_ids_map_to_not_found() {
        let err: ObserverError = DispatchError::TokenNotFound(TokenId::new()).into();
        assert!(matches!(err, ObserverError::NotFound(_)));
        let err: ObserverError = DispatchError::CounterNotFound(CounterId::new(9)).into();
        assert!(matches!(err, ObserverError::NotFound(_)));
    }

    #[test]
    fn rejected_preconditions_map_to_conflict() {
        let err: ObserverError = DispatchError::QueueEmpty.into();
        assert!(matches!(err, ObserverError::Conflict(_)));

        let err: ObserverError = DispatchError::CounterBusy {
            counter: CounterId::new(1),
            serving: TokenId::new(),
        }
        .into();
        assert!(matches!(err, ObserverError::Conflict(_)));
    }

    #[test]
    fn conflict_renders_as_409() {
        let response = ObserverError::Conflict("no tokens waiting in queue".to_owned())
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn not_found_renders_as_404() {
        let response = ObserverError::NotFound("token not found".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
