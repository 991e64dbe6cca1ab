//! Store traits and the backend factory.
//!
//! The service layer only ever sees these traits; which backend sits behind
//! them is a configuration concern. Consistency of concurrent writes is
//! delegated to the backend's own concurrency control; no locking happens
//! above this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::memory::MemoryStore;
use super::postgres::PostgresStore;
use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::models::{NewTodo, Todo, TodoChanges, TodoFilter, User};

/// Persistence of users. Email uniqueness (case-insensitive) is enforced by
/// the backend; lookups by email are case-insensitive.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Persistence of todos. Every read, update, and delete filters by
/// `(id, user_id)` jointly, so a non-owned todo is indistinguishable from an
/// absent one.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn add_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError>;
    async fn get_todo(&self, id: i64, user_id: i64) -> Result<Option<Todo>, StoreError>;
    /// Returns the requested page plus the total count matching the filters.
    async fn list_todos(&self, filter: &TodoFilter) -> Result<(Vec<Todo>, i64), StoreError>;
    /// Applies the supplied changes; `None` when no todo matches.
    async fn update_todo(
        &self,
        id: i64,
        user_id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError>;
    /// Returns whether a matching todo was removed.
    async fn delete_todo(&self, id: i64, user_id: i64) -> Result<bool, StoreError>;
}

/// Creates the concrete store implementation for the configured backend.
///
/// Storage is a boot dependency: a backend that cannot be reached ends the
/// process here rather than limping along.
pub async fn create_store(config: &StoreConfig) -> (Arc<dyn UserStore>, Arc<dyn TodoStore>) {
    match config {
        StoreConfig::Postgres(pg_config) => match PostgresStore::new(pg_config).await {
            Ok(store) => {
                info!("Successfully created PostgreSQL store.");
                let store = Arc::new(store);
                (store.clone() as Arc<dyn UserStore>, store as Arc<dyn TodoStore>)
            }
            Err(e) => {
                error!("Failed to create PostgreSQL store: {}", e);
                std::process::exit(1);
            }
        },
        StoreConfig::Memory => {
            info!("Using in-memory store.");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as Arc<dyn UserStore>, store as Arc<dyn TodoStore>)
        }
    }
}
