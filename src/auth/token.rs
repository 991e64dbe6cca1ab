//! Issuing and verifying signed session tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::errors::ServiceError;

/// Claims carried by a session token. Not persisted anywhere: the client
/// holds the token, the server only verifies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub email: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies session tokens with a single static secret.
///
/// Expiry is the only invalidation mechanism; there is no revocation list
/// and no secret rotation within a process lifetime.
pub struct TokenService {
    config: JwtConfig,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        TokenService { config }
    }

    /// Produce a signed token for the given identity, expiring after the
    /// configured lifetime.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id,
            email: email.to_string(),
            iss: self.config.iss.clone(),
            iat: now,
            exp: now + self.config.exp,
        };

        let encoding_key = EncodingKey::from_secret(self.config.secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| ServiceError::Internal(format!("failed to encode JWT: {}", e)))
    }

    /// Verify a token's signature, shape, and expiry.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.config.secret.as_ref());
        decode::<TokenClaims>(token, &decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Authentication("Invalid or expired token".to_string()))
    }
}
