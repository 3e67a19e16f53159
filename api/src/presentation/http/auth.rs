use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::bootstrap::config::Config;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Raw token taken from an `Authorization: Bearer` header.
pub struct Bearer(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized)?;
        Ok(Bearer(token.to_string()))
    }
}

/// Returns the `sub` claim of a valid token.
pub fn validate_bearer(cfg: &Config, bearer: Bearer) -> Result<String, ApiError> {
    let key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
    let data = decode::<Claims>(&bearer.0, &key, &Validation::new(Algorithm::HS256)).map_err(
        |e| {
            tracing::debug!(error = ?e, "bearer_rejected");
            ApiError::Unauthorized
        },
    )?;
    Ok(data.claims.sub)
}

/// Signs an HS256 token that [`validate_bearer`] accepts under the same config.
///
/// The service itself never issues tokens; sessions belong to the login
/// service. This is for embedders and tests that drive the router directly.
pub fn issue_token(cfg: &Config, sub: &str, ttl_secs: i64) -> anyhow::Result<String> {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + ttl_secs).max(0) as usize,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_subject() {
        let cfg = Config::with_secret("test-secret");
        let token = issue_token(&cfg, "user-42", 60).unwrap();
        assert_eq!(validate_bearer(&cfg, Bearer(token)).unwrap(), "user-42");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&Config::with_secret("a"), "user-42", 60).unwrap();
        let err = validate_bearer(&Config::with_secret("b"), Bearer(token)).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = Config::with_secret("test-secret");
        let token = issue_token(&cfg, "user-42", -3600).unwrap();
        assert!(validate_bearer(&cfg, Bearer(token)).is_err());
    }
}
