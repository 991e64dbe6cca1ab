//! Signup, login, and identity lookups.

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthContext, TokenService};
use crate::errors::ServiceError;
use crate::models::{AuthPayload, UserProfile};
use crate::store::UserStore;
use crate::utils::validation::{validate_email, validate_password};

/// The one message both login failure causes share, so responses never
/// reveal whether an email is registered.
fn invalid_credentials() -> ServiceError {
    ServiceError::Authentication("Invalid email or password".to_string())
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
    password_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>, password_cost: u32) -> Self {
        UserService {
            users,
            tokens,
            password_cost,
        }
    }

    /// Register a new account and log it in.
    ///
    /// Validates, checks the email is unclaimed (case-insensitive), persists
    /// the user with a hashed password, and issues a session token. The
    /// existence pre-check leaves a narrow race window between check and
    /// insert; the store's unique index is the backstop, and a loser of that
    /// race surfaces as an internal error rather than a fabricated conflict.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ServiceError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation(
                "name, email and password are required".to_string(),
            ));
        }

        let name_chars = name.chars().count();
        if !(2..=100).contains(&name_chars) {
            return Err(ServiceError::Validation(
                "name must be between 2 and 100 characters".to_string(),
            ));
        }

        validate_email(email)?;
        validate_password(password)?;

        if self.users.get_user_by_email(email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already in use".to_string()));
        }

        let hashed = hash_password(password, self.password_cost)?;
        let user = self.users.add_user(name, email, &hashed).await?;
        let token = self.tokens.issue(user.id, &user.email)?;

        Ok(AuthPayload {
            message: "Signup successful".to_string(),
            token,
            user: user.into(),
        })
    }

    /// Authenticate an existing account and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ServiceError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let user = self
            .users
            .get_user_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id, &user.email)?;

        Ok(AuthPayload {
            message: "Login successful".to_string(),
            token,
            user: user.into(),
        })
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.users.get_user(id).await?.map(UserProfile::from))
    }

    /// The current identity, for callers that proved one.
    pub async fn me(&self, ctx: &AuthContext) -> Result<Option<UserProfile>, ServiceError> {
        let user_id = ctx.require_user()?;
        self.get_user(user_id).await
    }
}
