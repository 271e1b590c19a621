use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::error::AppError;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's identifier.
    pub sub: String,
    /// Issue time (seconds since epoch).
    pub iat: i64,
    /// Expiration time (seconds since epoch).
    pub exp: i64,
}

/// Signing and verification keys derived from the server secret.
///
/// Built once at startup and shared through the application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `resolve_token_at`.
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues an HS256 token for `user_id`, valid for 24 hours from now.
    pub fn issue_token(&self, user_id: &str) -> Result<String, AppError> {
        self.issue_token_at(user_id, Utc::now())
    }

    pub fn issue_token_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies `token` and returns its claims.
    ///
    /// Does not check that the subject still exists.
    pub fn resolve_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.resolve_token_at(token, Utc::now())
    }

    pub fn resolve_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected token: {}", e);
                AuthError::InvalidToken
            })?;
        if now.timestamp() >= claims.exp {
            log::debug!("Rejected expired token for {}", claims.sub);
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}
