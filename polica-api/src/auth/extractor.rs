use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::auth::jwt;
use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, extracted from a `Bearer` JWT on every route
/// that requires a logged-in user (spec.md §4.I's user-scoped endpoints:
/// locations, shopping lists, chat sessions).
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("missing bearer token".to_string()))?;

        let claims = jwt::verify_purpose(&state.jwt, bearer.token(), "access")?;
        Ok(Self {
            user_id: claims.sub,
        })
    }
}

/// Gate for the crawler/importer status endpoints (spec.md §6: "a
/// long-lived API-key bearer is also accepted on service-to-service
/// endpoints"). A fixed shared secret rather than a JWT, since these
/// callers aren't users and don't need expiry/refresh.
#[derive(Debug, Clone, Copy)]
pub struct ServiceAuth;

impl FromRequestParts<AppState> for ServiceAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("missing bearer token".to_string()))?;

        if bearer.token() != state.jwt.service_api_key {
            return Err(AppError::Unauthorized("invalid service API key".to_string()));
        }
        Ok(Self)
    }
}
