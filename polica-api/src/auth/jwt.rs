use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::settings::JwtConfig;
use crate::errors::AppError;

/// Bearer-token claims (spec.md §4.I: "JWT bearer auth"). `sub` carries the
/// user id; `exp`/`iat` are the standard registered claims `jsonwebtoken`
/// validates automatically. `purpose` scopes a token to one use
/// (`access`/`refresh`/`verify_email`/`reset_password`) so a leaked
/// email-verification link can't double as a login token — email delivery
/// and token transport themselves are out of scope (spec.md §1), but the
/// tokens still need to carry this distinction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    #[serde(default = "default_purpose")]
    pub purpose: String,
}

fn default_purpose() -> String {
    "access".to_string()
}

/// One week, used for `verify_email`/`reset_password` tokens regardless of
/// the configured access-token TTL.
const ACTION_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 24 * 7;

pub fn issue(config: &JwtConfig, user_id: Uuid) -> Result<String, AppError> {
    issue_purpose(config, user_id, "access", config.jwt_ttl_seconds)
}

pub fn issue_refresh(config: &JwtConfig, user_id: Uuid) -> Result<String, AppError> {
    issue_purpose(config, user_id, "refresh", config.jwt_ttl_seconds * 4)
}

pub fn issue_action(config: &JwtConfig, user_id: Uuid, purpose: &str) -> Result<String, AppError> {
    issue_purpose(config, user_id, purpose, ACTION_TOKEN_TTL_SECONDS)
}

fn issue_purpose(config: &JwtConfig, user_id: Uuid, purpose: &str, ttl_seconds: i64) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        iat: now,
        exp: now + ttl_seconds,
        purpose: purpose.to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| crate::errors::internal_error(e))
}

pub fn verify(config: &JwtConfig, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))
}

/// Verifies a token and checks it was issued for `expected_purpose`,
/// rejecting e.g. an access token presented as a password-reset token.
pub fn verify_purpose(config: &JwtConfig, token: &str, expected_purpose: &str) -> Result<Claims, AppError> {
    let claims = verify(config, token)?;
    if claims.purpose != expected_purpose {
        return Err(AppError::Unauthorized("token not valid for this action".to_string()));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_seconds: 3600,
            service_api_key: "test-service-key".to_string(),
        }
    }

    #[test]
    fn round_trips_a_token() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = issue(&config, user_id).unwrap();
        let claims = verify(&config, &token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn rejects_a_token_signed_with_a_different_secret() {
        let token = issue(&config(), Uuid::new_v4()).unwrap();
        let other = JwtConfig {
            jwt_secret: "other-secret".to_string(),
            jwt_ttl_seconds: 3600,
            service_api_key: "test-service-key".to_string(),
        };
        assert!(verify(&other, &token).is_err());
    }
}
