//! PostgreSQL store backend.
//!
//! Bootstraps its own schema on construction. The unique index on
//! `LOWER(email)` is the store-level uniqueness guarantee the user service
//! trusts after its pre-check.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::base::{TodoStore, UserStore};
use crate::config::PostgresConfig;
use crate::errors::StoreError;
use crate::models::{NewTodo, Todo, TodoChanges, TodoFilter, User};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users ((LOWER(email)))",
    "CREATE TABLE IF NOT EXISTS todos (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        due_date DATE,
        user_id BIGINT NOT NULL REFERENCES users (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
];

const TODO_COLUMNS: &str = "id, title, description, status, due_date, user_id, created_at, updated_at";
const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and bootstrap the schema. Any failure here is a boot failure.
    pub async fn new(config: &PostgresConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        let store = PostgresStore { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Appends the owner/status/search conditions shared by the page query
    /// and the count query.
    fn push_list_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &'a TodoFilter) {
        builder.push(" WHERE user_id = ");
        builder.push_bind(filter.user_id);

        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn add_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait::async_trait]
impl TodoStore for PostgresStore {
    async fn add_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let created = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (title, description, status, due_date, user_id)
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.status.as_str())
        .bind(todo.due_date)
        .bind(todo.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_todo(&self, id: i64, user_id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND user_id = $2",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn list_todos(&self, filter: &TodoFilter) -> Result<(Vec<Todo>, i64), StoreError> {
        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM todos");
        Self::push_list_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM todos", TODO_COLUMNS));
        Self::push_list_filters(&mut page_builder, filter);
        page_builder.push(" ORDER BY id DESC LIMIT ");
        page_builder.push_bind(filter.limit);
        page_builder.push(" OFFSET ");
        page_builder.push_bind(filter.offset);

        let items = page_builder
            .build_query_as::<Todo>()
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn update_todo(
        &self,
        id: i64,
        user_id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE todos SET updated_at = NOW()");

        if let Some(title) = &changes.title {
            builder.push(", title = ");
            builder.push_bind(title);
        }
        if let Some(description) = &changes.description {
            builder.push(", description = ");
            builder.push_bind(description.clone());
        }
        if let Some(status) = changes.status {
            builder.push(", status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(due_date) = &changes.due_date {
            builder.push(", due_date = ");
            builder.push_bind(*due_date);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(" AND user_id = ");
        builder.push_bind(user_id);
        builder.push(format!(" RETURNING {}", TODO_COLUMNS));

        let updated = builder
            .build_query_as::<Todo>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_todo(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
