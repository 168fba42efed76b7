//! `/auth/*` (spec.md §6): registration, login, token refresh, logout, and
//! the email-verification / password-reset flows. Email delivery, JWT
//! issuance, and password hashing are contract-only in the spec (§1's
//! Non-goals) — issuance and hashing are implemented here against
//! `auth::jwt`/`auth::password`; actually delivering a verification or
//! reset link by email is out of scope, so both flows return their token
//! directly in the response instead of mailing it.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use polica_entities::{InfraError, NewUser, UserDto};

use crate::auth::{jwt, password, AuthUser};
use crate::errors::AppError;
use crate::infra::repositories::user;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserDto,
    /// The token to pass to `verify-email/{token}`. Stands in for an emailed
    /// link since this system doesn't carry an email-delivery integration.
    pub verification_token: String,
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    if user::get_by_email(&state.pool, body.email.clone()).await?.is_some() {
        return Err(AppError::Infra(InfraError::Conflict("email already registered".to_string())));
    }
    let password_hash = password::hash(&body.password)?;
    let created = user::create(
        &state.pool,
        NewUser {
            email: body.email,
            password_hash,
            display_name: body.display_name,
        },
    )
    .await?;
    let verification_token = jwt::issue_action(&state.jwt, created.id, "verify_email")?;
    Ok(Json(RegisterResponse {
        user: created.into(),
        verification_token,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Issued access and refresh tokens", body = TokenResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn token(
    State(state): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let invalid = || AppError::Unauthorized("invalid email or password".to_string());
    let found = user::get_by_email(&state.pool, body.email).await?.ok_or_else(invalid)?;
    if !password::verify(&body.password, &found.password_hash)? {
        return Err(invalid());
    }
    Ok(Json(TokenResponse {
        access_token: jwt::issue(&state.jwt, found.id)?,
        refresh_token: jwt::issue_refresh(&state.jwt, found.id)?,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Issued a new access/refresh token pair", body = TokenResponse),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let claims = jwt::verify_purpose(&state.jwt, &body.refresh_token, "refresh")?;
    Ok(Json(TokenResponse {
        access_token: jwt::issue(&state.jwt, claims.sub)?,
        refresh_token: jwt::issue_refresh(&state.jwt, claims.sub)?,
    }))
}

/// Bearer JWTs are stateless here, so there is no server-side session to
/// revoke; `logout` exists to give clients a uniform endpoint to call
/// before discarding their token.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(_auth: AuthUser) -> axum::http::StatusCode {
    axum::http::StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/auth/verify-email/{token}",
    params(("token" = String, Path, description = "Verification token issued at registration")),
    responses(
        (status = 200, description = "Account verified", body = UserDto),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<UserDto>, AppError> {
    let claims = jwt::verify_purpose(&state.jwt, &token, "verify_email")?;
    let verified = user::mark_verified(&state.pool, claims.sub).await?;
    Ok(Json(verified.into()))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ForgotPasswordResponse {
    /// The token to pass to `reset-password`. Stands in for an emailed link
    /// (see module docs).
    pub reset_token: String,
}

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset token issued", body = ForgotPasswordResponse),
        (status = 404, description = "No account with this email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let found = user::get_by_email(&state.pool, body.email)
        .await?
        .ok_or(InfraError::NotFound)?;
    let reset_token = jwt::issue_action(&state.jwt, found.id, "reset_password")?;
    Ok(Json(ForgotPasswordResponse { reset_token }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Password updated"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<axum::http::StatusCode, AppError> {
    let claims = jwt::verify_purpose(&state.jwt, &body.token, "reset_password")?;
    let password_hash = password::hash(&body.new_password)?;
    let conn = state.pool.get().await.map_err(polica_entities::adapt_infra_error)?;
    conn.interact(move |conn| {
        use diesel::prelude::*;
        use polica_entities::schema::users;
        diesel::update(users::table.find(claims.sub))
            .set(users::password_hash.eq(password_hash))
            .execute(conn)
    })
    .await
    .map_err(polica_entities::adapt_infra_error)?
    .map_err(polica_entities::adapt_infra_error)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
