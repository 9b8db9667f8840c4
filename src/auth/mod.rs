use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Opaque identifier of an authenticated caller
pub type UserIdentity = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserIdentity,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims expiring `expiry_hours` from now. Lifetimes past chrono's
    /// representable range are refused rather than wrapped.
    pub fn new(user_id: impl Into<UserIdentity>, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::TokenGeneration(format!("token lifetime of {} hours is out of range", expiry_hours))
            })?;

        Ok(Self {
            sub: user_id.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Why a token was refused. Callers only ever see a single unauthenticated
/// response, the variant is for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format")]
    MalformedHeader,

    #[error("Authorization header must use Bearer token format")]
    WrongScheme,

    #[error("Empty JWT token")]
    EmptyToken,

    #[error("Token has no subject")]
    MissingSubject,

    #[error("Invalid JWT token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

/// Validates HS256 bearer tokens against the configured secret
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&security.jwt_secret)
    }

    /// Decode a raw token and return the identity it was issued for
    pub fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let subject = token_data.claims.sub;

        if subject.trim().is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(subject)
    }

    /// Pull the token out of an `Authorization` header value and verify it
    pub fn verify_header(&self, header: Option<&axum::http::HeaderValue>) -> Result<UserIdentity, AuthError> {
        let header = header.ok_or(AuthError::MissingHeader)?;
        let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = bearer_token(value)?;
        self.verify(token)
    }
}

fn bearer_token(value: &str) -> Result<&str, AuthError> {
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::WrongScheme)?;
    let token = token.trim();

    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }

    Ok(token)
}

/// Sign a token for `user_id`. Used by the `token` CLI command and by tests;
/// the gateway itself never issues tokens.
pub fn generate_jwt(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
