//! Authentication: token issuance/verification, password hashing, and the
//! per-request auth context.
//!
//! The context resolver deliberately never fails a request: a missing,
//! malformed, or unverifiable token resolves to an anonymous context, and
//! each operation decides for itself whether identity is required. Public
//! operations (signup, login) must work with no token at all.

pub mod password;
pub mod token;

pub use token::{TokenClaims, TokenService};

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use tracing::debug;

use crate::errors::ServiceError;
use crate::state::AppState;

/// The identity attached to one inbound request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<i64>,
    pub email: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        AuthContext::default()
    }

    pub fn authenticated(user_id: i64, email: String) -> Self {
        AuthContext {
            user_id: Some(user_id),
            email: Some(email),
        }
    }

    /// Returns the caller's user id, or the authentication failure every
    /// protected operation raises before touching a store.
    pub fn require_user(&self) -> Result<i64, ServiceError> {
        self.user_id
            .ok_or_else(|| ServiceError::Authentication("Not authenticated".to_string()))
    }
}

/// Resolves an `Authorization` header value to a context.
///
/// Accepts exactly the `Bearer <token>` form; anything else resolves to
/// anonymous rather than an error.
pub fn resolve_context(auth_header: &str, tokens: &TokenService) -> AuthContext {
    if auth_header.is_empty() {
        return AuthContext::anonymous();
    }

    // Example: "Bearer <token_value>"
    let parts: Vec<&str> = auth_header.split_whitespace().collect();
    if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
        debug!("Authorization header has unsupported format");
        return AuthContext::anonymous();
    }

    match tokens.verify(parts[1]) {
        Ok(claims) => AuthContext::authenticated(claims.user_id, claims.email),
        Err(e) => {
            debug!("Token verification failed: {}", e);
            AuthContext::anonymous()
        }
    }
}

/// Extractor implementation: every handler that names an `AuthContext`
/// parameter gets one, anonymous or not. The rejection type is `Infallible`
/// so the extractor can never turn a bad token into a transport error.
#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<AuthContext, Infallible> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        Ok(resolve_context(auth_header, &state.tokens))
    }
}
