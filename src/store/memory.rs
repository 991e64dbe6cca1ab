//! In-memory store backend.
//!
//! Backs the test suite and local development. Observable semantics match
//! the PostgreSQL backend: case-insensitive email uniqueness, joint
//! `(id, user_id)` filtering, id-descending listings.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::base::{TodoStore, UserStore};
use crate::errors::StoreError;
use crate::models::{NewTodo, Todo, TodoChanges, TodoFilter, User};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    todos: Vec<Todo>,
    next_user_id: i64,
    next_todo_id: i64,
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only happens after a panic mid-mutation; the test
        // process is done for at that point anyway.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(todo: &Todo, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    todo.title.to_lowercase().contains(&needle)
        || todo
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn add_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.lock();

        // The backstop the unique index provides in PostgreSQL.
        if inner
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(StoreError::Backend(format!(
                "duplicate email: {}",
                email
            )));
        }

        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn add_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let mut inner = self.lock();
        inner.next_todo_id += 1;
        let now = Utc::now();
        let created = Todo {
            id: inner.next_todo_id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status.as_str().to_string(),
            due_date: todo.due_date,
            user_id: todo.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.todos.push(created.clone());
        Ok(created)
    }

    async fn get_todo(&self, id: i64, user_id: i64) -> Result<Option<Todo>, StoreError> {
        Ok(self
            .lock()
            .todos
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn list_todos(&self, filter: &TodoFilter) -> Result<(Vec<Todo>, i64), StoreError> {
        let inner = self.lock();

        let mut matching: Vec<&Todo> = inner
            .todos
            .iter()
            .filter(|t| t.user_id == filter.user_id)
            .filter(|t| {
                filter
                    .status
                    .map_or(true, |status| t.status == status.as_str())
            })
            .filter(|t| {
                filter
                    .search
                    .as_deref()
                    .map_or(true, |needle| matches_search(t, needle))
            })
            .collect();

        matching.sort_by(|a, b| b.id.cmp(&a.id));
        let total = matching.len() as i64;

        let items = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    async fn update_todo(
        &self,
        id: i64,
        user_id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut inner = self.lock();
        let Some(todo) = inner
            .todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = description.clone();
        }
        if let Some(status) = changes.status {
            todo.status = status.as_str().to_string();
        }
        if let Some(due_date) = &changes.due_date {
            todo.due_date = *due_date;
        }
        todo.updated_at = Utc::now();

        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let before = inner.todos.len();
        inner.todos.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(inner.todos.len() < before)
    }
}
