//! Session gate. Token issuance (login/logout) belongs to the external auth
//! provider; this module only verifies bearer tokens and injects the user.
//!
//! One process-wide mechanism gates every admin operation: handlers that take
//! a `CurrentUser` argument are gated, handlers that do not are public. A
//! failed or missing token is indistinguishable from "no user" and maps to
//! 401 with no retry logic.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated user, extracted once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Verifies an HS256 bearer token and derives the user it names.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<CurrentUser, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        debug!("Token verification failed: {e}");
        AppError::Unauthorized
    })?;

    let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::Unauthorized)?;
    Ok(CurrentUser {
        id,
        email: data.claims.email,
    })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header);
        verify_token(token, state.config.auth_jwt_secret.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &[u8] = b"test-secret";

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: String,
        exp: usize,
    }

    fn token_for(sub: &str, exp: usize) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: sub.to_string(),
                email: "jane@example.com".to_string(),
                exp,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        4102444800 // 2100-01-01
    }

    #[test]
    fn test_valid_token_yields_user() {
        let id = Uuid::new_v4();
        let user = verify_token(&token_for(&id.to_string(), far_future()), SECRET).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let token = token_for(&Uuid::new_v4().to_string(), 1000);
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let token = token_for(&Uuid::new_v4().to_string(), far_future());
        assert!(matches!(
            verify_token(&token, b"other-secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_unauthorized() {
        let token = token_for("not-a-uuid", far_future());
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::Unauthorized)
        ));
    }
}
