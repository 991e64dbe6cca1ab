//! Owner-scoped todo CRUD and listing.
//!
//! Every operation requires an authenticated context before any store
//! access. Reads, updates, and deletes all go through `(id, user_id)`
//! filters, so another user's todo behaves as if it does not exist.

use std::sync::Arc;

use crate::auth::AuthContext;
use crate::errors::ServiceError;
use crate::models::{
    DeleteResult, NewTodo, Todo, TodoChanges, TodoFilter, TodoInput, TodoPage, TodoPatch,
    TodoStatus,
};
use crate::store::{TodoStore, UserStore};
use crate::utils::validation::{parse_due_date, validate_todo_input, validate_update_todo_input};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Raw listing parameters as the caller supplied them; `list` clamps them.
#[derive(Debug, Clone, Default)]
pub struct TodoListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<TodoStatus>,
}

pub struct TodoService {
    todos: Arc<dyn TodoStore>,
    users: Arc<dyn UserStore>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoStore>, users: Arc<dyn UserStore>) -> Self {
        TodoService { todos, users }
    }

    /// Create a todo owned by the caller. Title is stored trimmed; status
    /// defaults to pending.
    pub async fn create(&self, ctx: &AuthContext, input: TodoInput) -> Result<Todo, ServiceError> {
        let user_id = ctx.require_user()?;
        validate_todo_input(&input)?;

        // A token can outlive the account it was issued for.
        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::Authentication("User not found".to_string()));
        }

        let due_date = input.due_date.as_deref().map(parse_due_date).transpose()?;
        let new_todo = NewTodo {
            user_id,
            title: input.title.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or(TodoStatus::Pending),
            due_date,
        };

        Ok(self.todos.add_todo(&new_todo).await?)
    }

    /// Fetch one todo, or `None` when it is absent or not owned.
    pub async fn get(&self, ctx: &AuthContext, id: i64) -> Result<Option<Todo>, ServiceError> {
        let user_id = ctx.require_user()?;
        Ok(self.todos.get_todo(id, user_id).await?)
    }

    /// List the caller's todos. Page floors at 1; limit clamps to [1, 100]
    /// with a default of 10. `total` counts every match regardless of page.
    pub async fn list(
        &self,
        ctx: &AuthContext,
        params: TodoListParams,
    ) -> Result<TodoPage, ServiceError> {
        let user_id = ctx.require_user()?;

        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let filter = TodoFilter {
            user_id,
            status: params.status,
            search,
            limit,
            offset,
        };

        let (items, total) = self.todos.list_todos(&filter).await?;
        Ok(TodoPage {
            items,
            total,
            page,
            limit,
        })
    }

    /// Apply the supplied fields to an owned todo, leaving the rest alone.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: i64,
        patch: TodoPatch,
    ) -> Result<Todo, ServiceError> {
        let user_id = ctx.require_user()?;
        validate_update_todo_input(&patch)?;

        let due_date = match patch.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(Some(parse_due_date(&raw)?)),
        };

        let changes = TodoChanges {
            title: patch.title.map(|t| t.trim().to_string()),
            description: patch.description,
            status: patch.status,
            due_date,
        };

        self.todos
            .update_todo(id, user_id, &changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Todo not found".to_string()))
    }

    /// Remove an owned todo.
    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<DeleteResult, ServiceError> {
        let user_id = ctx.require_user()?;

        if !self.todos.delete_todo(id, user_id).await? {
            return Err(ServiceError::NotFound("Todo not found".to_string()));
        }

        Ok(DeleteResult {
            success: true,
            message: "Todo deleted".to_string(),
        })
    }
}
