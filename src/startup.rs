//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including the store, token service, application services, and route setup.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::TokenService;
use crate::config::ConfigV1;
use crate::routes;
use crate::services::{TodoService, UserService};
use crate::state::AppState;
use crate::store::create_store;

/// Builds the shared application state from a loaded configuration.
///
/// Connects the store (fatal on failure), then wires the token service and
/// the application services together. Exposed separately from [`run`] so the
/// integration tests can drive the real router without binding a socket.
pub async fn build_state(config: Arc<ConfigV1>) -> AppState {
    let (users, todos) = create_store(&config.store).await;
    let tokens = Arc::new(TokenService::new(config.jwt.clone()));

    let user_service = Arc::new(UserService::new(
        users.clone(),
        tokens.clone(),
        config.password_cost,
    ));
    let todo_service = Arc::new(TodoService::new(todos, users));

    AppState {
        config,
        tokens,
        user_service,
        todo_service,
    }
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the server encounters a runtime error during
/// execution; failure to bind the configured address is fatal.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone()).await;

    info!("Starting server on {}", config.bind_address);

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .expect("Could not bind to specified address");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
