use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use polica_entities::InfraError;

/// Top-level handler error, mapped onto the HTTP status taxonomy in spec.md
/// §7. Every handler returns `Result<_, AppError>`; the `From<InfraError>`
/// impl lets `?` carry database/infra failures straight up without manual
/// matching at each call site.
#[derive(Debug)]
pub enum AppError {
    Infra(InfraError),
    BadRequest(String),
    Unauthorized(String),
}

pub fn internal_error<E: std::fmt::Display>(err: E) -> AppError {
    tracing::error!(%err, "internal server error");
    AppError::Infra(InfraError::InternalServerError)
}

impl AppError {
    /// Whether the chat orchestrator's backoff loop should retry after this
    /// error (spec.md §4.H: transient provider failures only).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infra(InfraError::UpstreamUnavailable(_) | InfraError::Timeout))
    }

    /// User-facing message for contexts (like a chat SSE `error` part) that
    /// need the text without going through `IntoResponse`.
    pub fn message(&self) -> String {
        match self {
            Self::Infra(InfraError::NotFound) => "Resource not found".to_string(),
            Self::Infra(InfraError::Unauthorized) => "Unauthorized".to_string(),
            Self::Infra(InfraError::Forbidden) => "Forbidden".to_string(),
            Self::Infra(InfraError::Conflict(msg) | InfraError::Validation(msg) | InfraError::UpstreamUnavailable(msg)) => {
                msg.clone()
            }
            Self::Infra(InfraError::Timeout) => "Upstream timed out".to_string(),
            Self::Infra(InfraError::InternalServerError | InfraError::DbPoolError(_) | InfraError::DbInteractionError(_)) => {
                "Internal server error".to_string()
            }
            Self::BadRequest(msg) | Self::Unauthorized(msg) => msg.clone(),
        }
    }
}

impl From<InfraError> for AppError {
    fn from(err: InfraError) -> Self {
        Self::Infra(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, err_msg) = match self {
            Self::Infra(InfraError::NotFound) => {
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            Self::Infra(InfraError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            Self::Infra(InfraError::Forbidden) => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            Self::Infra(InfraError::Conflict(msg)) => (StatusCode::CONFLICT, msg),
            Self::Infra(InfraError::Validation(msg)) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Infra(InfraError::UpstreamUnavailable(msg)) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            Self::Infra(InfraError::Timeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out".to_string())
            }
            Self::Infra(
                err @ (InfraError::InternalServerError
                | InfraError::DbPoolError(_)
                | InfraError::DbInteractionError(_)),
            ) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };
        (status, Json(json!({ "message": err_msg }))).into_response()
    }
}
