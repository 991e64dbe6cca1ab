//! Todo records, status representations, and the shapes that cross the API
//! boundary.
//!
//! Status lives in two representations: the store keeps lowercase strings
//! ("pending", "in-progress", "done"), the API speaks an uppercase
//! enumeration ("PENDING", "IN_PROGRESS", "DONE"). The mapping between the
//! two is a pure, total function pair on [`TodoStatus`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Canonical todo states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Pending,
    InProgress,
    Done,
}

impl TodoStatus {
    /// The internal (stored) representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Done => "done",
        }
    }

    /// The external (API) representation.
    pub fn api_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "PENDING",
            TodoStatus::InProgress => "IN_PROGRESS",
            TodoStatus::Done => "DONE",
        }
    }

    /// Parse an internal status string.
    pub fn parse_internal(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TodoStatus::Pending),
            "in-progress" => Some(TodoStatus::InProgress),
            "done" => Some(TodoStatus::Done),
            _ => None,
        }
    }

    /// Parse an external status value. Unrecognized values map to `None`,
    /// which callers treat as "no filter" / "use default".
    pub fn from_api(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TodoStatus::Pending),
            "IN_PROGRESS" => Some(TodoStatus::InProgress),
            "DONE" => Some(TodoStatus::Done),
            _ => None,
        }
    }

    /// Render a stored status string for the API. An unrecognized stored
    /// value renders as "PENDING" rather than failing.
    pub fn api_from_internal(s: &str) -> &'static str {
        TodoStatus::parse_internal(s)
            .unwrap_or(TodoStatus::Pending)
            .api_str()
    }
}

/// A todo row as the store holds it. `status` stays a string here so that an
/// out-of-range stored value degrades at output shaping instead of breaking
/// every read.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The outward shape of a todo, status in its external form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        TodoResponse {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status: TodoStatus::api_from_internal(&todo.status).to_string(),
            due_date: todo.due_date,
            user_id: todo.user_id,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// Input for creating a todo, as the service receives it.
#[derive(Debug, Clone, Default)]
pub struct TodoInput {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<String>,
}

/// Partial input for updating a todo. The outer `Option` distinguishes
/// "field not supplied" from "field supplied"; the inner one carries an
/// explicit null for the clearable fields.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<Option<String>>,
}

/// A fully validated todo, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub due_date: Option<NaiveDate>,
}

/// Validated field changes for a `(id, user_id)`-scoped update.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<Option<NaiveDate>>,
}

/// Owner-scoped listing filters, already clamped by the service.
#[derive(Debug, Clone)]
pub struct TodoFilter {
    pub user_id: i64,
    pub status: Option<TodoStatus>,
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of todos plus the total count matching the filters.
#[derive(Debug, Clone)]
pub struct TodoPage {
    pub items: Vec<Todo>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Result of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every canonical external value maps to internal and back to itself.
    #[test]
    fn test_status_round_trip() {
        for api in ["PENDING", "IN_PROGRESS", "DONE"] {
            let status = TodoStatus::from_api(api).unwrap();
            assert_eq!(TodoStatus::api_from_internal(status.as_str()), api);
        }
    }

    #[test]
    fn test_unknown_api_status_is_none() {
        assert_eq!(TodoStatus::from_api("ARCHIVED"), None);
        assert_eq!(TodoStatus::from_api("pending"), None);
        assert_eq!(TodoStatus::from_api(""), None);
    }

    /// An unrecognized stored value defensively renders as PENDING.
    #[test]
    fn test_unknown_internal_status_renders_pending() {
        assert_eq!(TodoStatus::api_from_internal("archived"), "PENDING");
        assert_eq!(TodoStatus::api_from_internal(""), "PENDING");
        assert_eq!(TodoStatus::api_from_internal("in-progress"), "IN_PROGRESS");
    }

    #[test]
    fn test_response_shaping_maps_status_and_casing() {
        let todo = Todo {
            id: 1,
            title: "Buy milk".to_string(),
            description: None,
            status: "in-progress".to_string(),
            due_date: None,
            user_id: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let response = TodoResponse::from(todo);
        assert_eq!(response.status, "IN_PROGRESS");

        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("dueDate"));
        assert!(obj.contains_key("userId"));
        assert!(obj.contains_key("createdAt"));
    }
}
