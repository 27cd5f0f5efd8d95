//! JWT validation for bearer tokens minted by the identity provider.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

static JWT_SECRET: OnceLock<String> = OnceLock::new();

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT encoding failed: {0}")]
    EncodingFailed(#[from] jsonwebtoken::errors::Error),
    #[error("JWT secret not initialized")]
    SecretNotInitialized,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, as issued by the identity provider
    pub sub: String,
    /// Role claim: "admin", "librarian" or "member"
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, role: &str, expiry_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours)).timestamp(),
        }
    }
}

pub fn init_jwt_secret(secret: &str) {
    let _ = JWT_SECRET.set(secret.to_string());
}

fn get_secret() -> Result<&'static str, JwtError> {
    JWT_SECRET
        .get()
        .map(|s| s.as_str())
        .ok_or(JwtError::SecretNotInitialized)
}

/// Mint a token. Production tokens come from the identity provider; this is
/// used by tooling and tests.
pub fn generate_token(user_id: i32, role: &str) -> Result<String, JwtError> {
    let secret = get_secret()?;
    let claims = Claims::new(user_id, role, 24);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn validate_token(token: &str) -> Result<TokenData<Claims>, JwtError> {
    let secret = get_secret()?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        init_jwt_secret("test-secret");
    }

    #[test]
    fn test_round_trip() {
        init();
        let token = generate_token(7, "librarian").unwrap();
        let data = validate_token(&token).unwrap();
        assert_eq!(data.claims.sub, "7");
        assert_eq!(data.claims.role, "librarian");
    }

    #[test]
    fn test_tampered_token_rejected() {
        init();
        let token = generate_token(7, "member").unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(validate_token(&tampered).is_err());
    }
}
