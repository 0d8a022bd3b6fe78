//! Signed bearer tokens.

use chrono::Utc;
use common::UserId;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuthError;

/// JWT claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's ID.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and validates HS256 bearer tokens.
///
/// Validation is a pure function of the token string and the signing
/// key; resolving a token never touches shared state.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenIssuer {
    /// Creates an issuer from a shared secret and a token lifetime.
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact: no clock leeway.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issues a signed token identifying `user_id`.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Validates a token and resolves it to the user it identifies.
    pub fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        let uuid = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::TokenInvalid)?;
        Ok(UserId::from_uuid(uuid))
    }
}
