//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, the token service, and the two application services.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::ConfigV1;
use crate::services::{TodoService, UserService};

/// Application state cloned into every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Issues and verifies session tokens; also used by the auth context
    /// extractor.
    pub tokens: Arc<TokenService>,
    /// Signup/login/identity orchestration.
    pub user_service: Arc<UserService>,
    /// Owner-scoped todo orchestration.
    pub todo_service: Arc<TodoService>,
}
