use deadpool_diesel::InteractError;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// The taxonomy from spec.md §7, mapped to HTTP statuses by `polica-api`'s
/// `IntoResponse` impl. Database uniqueness conflicts on upserts are not
/// represented here: they are resolved in SQL (`ON CONFLICT DO NOTHING` /
/// `DO UPDATE`) and never surface as an error.
#[derive(Debug, ToSchema)]
pub enum InfraError {
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict(String),
    Validation(String),
    UpstreamUnavailable(String),
    Timeout,
    InternalServerError,
    #[schema(value_type = String)]
    DbPoolError(deadpool_diesel::PoolError),
    #[schema(value_type = String)]
    DbInteractionError(InteractError),
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Conflict(e) => write!(f, "conflict: {e}"),
            Self::Validation(e) => write!(f, "validation error: {e}"),
            Self::UpstreamUnavailable(e) => write!(f, "upstream unavailable: {e}"),
            Self::Timeout => write!(f, "timed out"),
            Self::InternalServerError => write!(f, "internal server error"),
            Self::DbPoolError(e) => write!(f, "db pool error: {e}"),
            Self::DbInteractionError(e) => write!(f, "db interaction error: {e}"),
        }
    }
}

impl std::error::Error for InfraError {}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("cannot init database pool: {0}")]
    PoolDatabase(String),
    #[error("cannot find environment variable for database init: {0}")]
    VariableDatabase(String),
    #[error("database init error: {0}")]
    GenericInitDatabase(String),
}

impl From<deadpool_diesel::PoolError> for InfraError {
    fn from(e: deadpool_diesel::PoolError) -> Self {
        Self::DbPoolError(e)
    }
}

impl From<InteractError> for InfraError {
    fn from(e: InteractError) -> Self {
        Self::DbInteractionError(e)
    }
}

impl From<diesel::result::Error> for InfraError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => Self::NotFound,
            other => Self::InternalServerError.with_cause(other),
        }
    }
}

impl InfraError {
    /// Logs the underlying cause (not carried in the variant itself, to keep
    /// `InfraError` `Clone`/`ToSchema`-friendly) and returns `self`.
    fn with_cause(self, cause: impl fmt::Debug) -> Self {
        tracing::error!(?cause, "internal database error");
        self
    }
}

pub fn adapt_infra_error<T: Into<InfraError>>(error: T) -> InfraError {
    error.into()
}
