//! End-to-end tests driving the real router over the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use figment::providers::{Format, Yaml};
use figment::Figment;
use serde_json::{json, Value};
use tower::ServiceExt;

use todotron::config::Config;
use todotron::routes::create_router;
use todotron::startup;

const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: "127.0.0.1:0"
store:
  type: memory
jwt:
  secret: "integration-secret"
  exp: 3600
password_cost: 4
logging:
  level: "debug"
  format: "console"
"#;

async fn test_app() -> Router {
    let figment = Figment::new().merge(Yaml::string(TEST_CONFIG));
    let config = match figment.extract::<Config>().expect("valid test config") {
        Config::ConfigV1(c) => c,
    };
    let state = startup::build_state(Arc::new(config)).await;
    create_router(state)
}

/// Sends one request to the app and returns the status plus the parsed JSON
/// body (`Value::Null` when the body is empty or not JSON).
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn signup(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

/// Signs up a fresh user and returns their session token.
async fn signup_token(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = signup(app, name, email, "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;
    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_returns_token_and_sanitized_user() {
    let app = test_app().await;
    let (status, body) = signup(&app, "Ana", "ana@x.com", "secret1").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Signup successful");
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "ana@x.com");
    assert_eq!(body["user"]["name"], "Ana");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"]["createdAt"].as_str().is_some());
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = test_app().await;
    signup_token(&app, "Ana", "ana@x.com").await;

    let (status, body) = signup(&app, "Ana Again", "ANA@X.COM", "secret2").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT_ERROR");
    assert_eq!(body["error"], "Email already in use");
}

#[tokio::test]
async fn test_login_round_trip_and_me() {
    let app = test_app().await;
    signup_token(&app, "Ana", "ana@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let token = body["token"].as_str().unwrap();
    let (status, me) = send(&app, Method::GET, "/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "ana@x.com");
}

/// Wrong password and nonexistent email must produce identical responses.
#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app().await;
    signup_token(&app, "Ana", "ana@x.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "wrong-pass" })),
    )
    .await;
    let (ghost_status, ghost_body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ghost@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(ghost_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, ghost_body);
}

#[tokio::test]
async fn test_me_requires_identity() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_ERROR");

    let (status, _) = send(&app, Method::GET, "/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_todos_require_identity() {
    let app = test_app().await;

    let (status, _) = send(&app, Method::GET, "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/todos",
        None,
        Some(json!({ "title": "Buy milk" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_todo_trims_title_and_maps_status() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    let (status, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": " Buy milk ", "status": "PENDING" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["status"], "PENDING");
    assert!(todo["userId"].as_i64().is_some());

    let id = todo["id"].as_i64().unwrap();
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/todos/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Buy milk");
}

#[tokio::test]
async fn test_create_todo_validation_errors() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "title is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "Buy milk", "dueDate": "whenever" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid due date format");
}

/// An unrecognized external status value behaves as if omitted.
#[tokio::test]
async fn test_unknown_status_values_are_ignored() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    let (status, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "Buy milk", "status": "ARCHIVED" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["status"], "PENDING");

    let (status, list) = send(
        &app,
        Method::GET,
        "/todos?status=BOGUS",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
}

#[tokio::test]
async fn test_cross_user_todos_are_invisible() {
    let app = test_app().await;
    let ana = signup_token(&app, "Ana", "ana@x.com").await;
    let bob = signup_token(&app, "Bob", "bob@x.com").await;

    let (_, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&ana),
        Some(json!({ "title": "Ana's secret" })),
    )
    .await;
    let id = todo["id"].as_i64().unwrap();

    // Reads resolve to null, mutations to "not found", never "forbidden".
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/todos/{}", id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, Value::Null);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/todos/{}", id),
        Some(&bob),
        Some(json!({ "status": "DONE" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo not found");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/todos/{}", id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/todos", Some(&bob), None).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_update_applies_partial_fields() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    let (_, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "Buy milk", "description": "semi-skimmed" })),
    )
    .await;
    let id = todo["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/todos/{}", id),
        Some(&token),
        Some(json!({ "status": "DONE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "DONE");
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "semi-skimmed");

    // An explicit null clears; an absent field does not.
    let (status, cleared) = send(
        &app,
        Method::PATCH,
        &format!("/todos/{}", id),
        Some(&token),
        Some(json!({ "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["description"], Value::Null);
    assert_eq!(cleared["status"], "DONE");
}

#[tokio::test]
async fn test_list_pagination_search_and_clamping() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    for i in 0..5 {
        send(
            &app,
            Method::POST,
            "/todos",
            Some(&token),
            Some(json!({ "title": format!("todo {}", i) })),
        )
        .await;
    }
    send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "errand", "description": "Milk run" })),
    )
    .await;

    // Newest first, slice by page.
    let (_, page) = send(
        &app,
        Method::GET,
        "/todos?page=2&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(page["total"], 6);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    let titles: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["todo 3", "todo 2"]);

    // Case-insensitive search against title OR description.
    let (_, found) = send(
        &app,
        Method::GET,
        "/todos?search=milk",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(found["total"], 1);
    assert_eq!(found["items"][0]["title"], "errand");

    // Out-of-range paging inputs are clamped, not rejected.
    let (_, clamped) = send(
        &app,
        Method::GET,
        "/todos?page=0&limit=1000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(clamped["page"], 1);
    assert_eq!(clamped["limit"], 100);
    assert_eq!(clamped["items"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_delete_confirms_then_not_found() {
    let app = test_app().await;
    let token = signup_token(&app, "Ana", "ana@x.com").await;

    let (_, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(&token),
        Some(json!({ "title": "Buy milk" })),
    )
    .await;
    let id = todo["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/todos/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Todo deleted");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/todos/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
