//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! authentication/identity, todos, and health checks. Handlers translate
//! between the wire shapes (camelCase fields, uppercase status values) and
//! the service layer's types.

mod auth_routes;
mod health_routes;
mod todo_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::routes())
        .merge(todo_routes::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
