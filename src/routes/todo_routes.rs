//! Todo CRUD and listing endpoints.
//!
//! This is the boundary where status representation changes: requests carry
//! the uppercase enumeration, the services speak [`TodoStatus`]. An
//! unrecognized external value maps to "omitted" rather than an error.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::{Deserialize, Deserializer};

use crate::auth::AuthContext;
use crate::errors::ServiceError;
use crate::models::{DeleteResult, TodoInput, TodoPatch, TodoResponse, TodoStatus};
use crate::services::TodoListParams;
use crate::state::AppState;

/// Registers todo routes; every operation enforces identity in the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/:id",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
}

/// Distinguishes an explicit `"field": null` from an absent field: absent
/// stays `None`, supplied (null included) becomes `Some(..)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoRequest {
    title: String,
    description: Option<String>,
    status: Option<String>,
    due_date: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateTodoRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    due_date: Option<Option<String>>,
}

#[derive(Deserialize)]
struct ListTodosQuery {
    page: Option<i64>,
    limit: Option<i64>,
    search: Option<String>,
    status: Option<String>,
}

#[derive(serde::Serialize)]
struct TodoListResponse {
    items: Vec<TodoResponse>,
    total: i64,
    page: i64,
    limit: i64,
}

async fn create_todo(
    ctx: AuthContext,
    State(state): State<AppState>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ServiceError> {
    let input = TodoInput {
        title: body.title,
        description: body.description,
        status: body.status.as_deref().and_then(TodoStatus::from_api),
        due_date: body.due_date,
    };
    let todo = state.todo_service.create(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// The declared result is `todo | null`, so a missing or non-owned id is a
/// 200 with a null body, not a 404.
async fn get_todo(
    ctx: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<TodoResponse>>, ServiceError> {
    let todo = state.todo_service.get(&ctx, id).await?;
    Ok(Json(todo.map(TodoResponse::from)))
}

async fn list_todos(
    ctx: AuthContext,
    State(state): State<AppState>,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<TodoListResponse>, ServiceError> {
    let params = TodoListParams {
        page: query.page,
        limit: query.limit,
        search: query.search,
        status: query.status.as_deref().and_then(TodoStatus::from_api),
    };
    let page = state.todo_service.list(&ctx, params).await?;
    Ok(Json(TodoListResponse {
        items: page.items.into_iter().map(TodoResponse::from).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    }))
}

async fn update_todo(
    ctx: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ServiceError> {
    let patch = TodoPatch {
        title: body.title,
        description: body.description,
        status: body.status.as_deref().and_then(TodoStatus::from_api),
        due_date: body.due_date,
    };
    let todo = state.todo_service.update(&ctx, id, patch).await?;
    Ok(Json(todo.into()))
}

async fn delete_todo(
    ctx: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResult>, ServiceError> {
    let result = state.todo_service.delete(&ctx, id).await?;
    Ok(Json(result))
}
