//! Password hashing and bearer-token authentication.
//!
//! Passwords are hashed with argon2id. API access uses stateless JWTs signed
//! with the configured secret; `auth_middleware` guards every protected route
//! and stashes the verified claims in request extensions.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::{UserRecord, UserRole};
use crate::web::types::{ApiError, internal_error, unauthorized};

/// Shared token-signing state.
#[derive(Clone)]
pub struct AuthState {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: i64,
}

impl AuthState {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl_hours: config.token_ttl_hours,
        }
    }
}

/// Bearer-token claims; available to handlers via request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

pub fn issue_token(user: &UserRecord, auth: &AuthState) -> Result<String, ApiError> {
    let expires_at = Utc::now() + Duration::hours(auth.token_ttl_hours);
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp() as usize,
    };
    encode(&Header::default(), &claims, &auth.encoding_key).map_err(internal_error)
}

pub fn verify_token(token: &str, auth: &AuthState) -> Result<Claims, ApiError> {
    decode::<Claims>(token, &auth.decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| unauthorized("Invalid or expired token"))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(internal_error)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Require a valid `Authorization: Bearer <token>` header.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    let claims = verify_token(token, &auth)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::config::AuthConfig;
    use crate::db::{UserRecord, UserRole};

    use super::{AuthState, hash_password, issue_token, verify_password, verify_token};

    fn test_user() -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: Uuid::new_v4(),
            email: "lawyer@firm.example".to_string(),
            full_name: "Test Lawyer".to_string(),
            phone: None,
            password_hash: String::new(),
            role: UserRole::Lawyer,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_auth_state() -> AuthState {
        AuthState::new(&AuthConfig {
            jwt_secret: "an-integration-test-secret".to_string(),
            token_ttl_hours: 1,
        })
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("StrongPass123").expect("hash");
        assert!(verify_password("StrongPass123", &hash));
        assert!(!verify_password("WrongPass123", &hash));
        assert!(!verify_password("StrongPass123", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trips_claims() {
        let auth = test_auth_state();
        let user = test_user();
        let token = issue_token(&user, &auth).expect("token");
        let claims = verify_token(&token, &auth).expect("claims");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Lawyer);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let auth = test_auth_state();
        let other = AuthState::new(&AuthConfig {
            jwt_secret: "a-different-secret-entirely".to_string(),
            token_ttl_hours: 1,
        });
        let token = issue_token(&test_user(), &other).expect("token");
        assert!(verify_token(&token, &auth).is_err());
    }
}
