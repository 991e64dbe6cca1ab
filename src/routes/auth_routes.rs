//! Signup, login, and current-identity endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::errors::ServiceError;
use crate::models::{AuthPayload, UserProfile};
use crate::state::AppState;

/// Registers the public auth operations and the identity query.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[derive(Deserialize)]
struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// Registers a new account. Works without a token by design.
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthPayload>), ServiceError> {
    let payload = state
        .user_service
        .signup(&body.name, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// Authenticates an existing account. Works without a token by design.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthPayload>, ServiceError> {
    let payload = state.user_service.login(&body.email, &body.password).await?;
    Ok(Json(payload))
}

/// Returns the caller's own profile; requires identity.
async fn me(
    ctx: AuthContext,
    State(state): State<AppState>,
) -> Result<Json<Option<UserProfile>>, ServiceError> {
    let profile = state.user_service.me(&ctx).await?;
    Ok(Json(profile))
}
