//! Data layer: models, store traits and the `Database` handle services depend on.

mod memory;
mod sqlite;

pub use memory::{MemoryTodoStore, MemoryUserStore};
pub use sqlite::{SqliteTodoStore, SqliteUserStore};

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: String,
    pub first_name: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.full_name.is_none() && self.email.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_unique(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_many(&self) -> Result<Vec<User>, AppError>;
    async fn create(&self, user: &NewUser) -> Result<User, AppError>;
    /// Returns `None` when no user has `id`.
    async fn update(&self, id: &str, patch: &UserPatch) -> Result<Option<User>, AppError>;
    async fn delete(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Todos ordered by id, skipping `skip` and returning at most `take`.
    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Todo>, AppError>;
    async fn count(&self) -> Result<u64, AppError>;
    async fn find_unique(&self, id: i64) -> Result<Option<Todo>, AppError>;
    async fn create(&self, title: &str) -> Result<Todo, AppError>;
    async fn create_many(&self, titles: &[&str]) -> Result<u64, AppError>;
    async fn update(&self, id: i64, title: &str) -> Result<Option<Todo>, AppError>;
    async fn delete(&self, id: i64) -> Result<Option<Todo>, AppError>;
    async fn delete_many(&self) -> Result<u64, AppError>;
}

/// Handle to every model store. Cloning shares the underlying stores.
#[derive(Clone)]
pub struct Database {
    pub user: Arc<dyn UserStore>,
    pub todo: Arc<dyn TodoStore>,
    pool: Option<SqlitePool>,
}

impl Database {
    pub fn sqlite(pool: SqlitePool) -> Self {
        Database {
            user: Arc::new(SqliteUserStore::new(pool.clone())),
            todo: Arc::new(SqliteTodoStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Process-local stores with no persistence.
    pub fn in_memory() -> Self {
        Database {
            user: Arc::new(MemoryUserStore::default()),
            todo: Arc::new(MemoryTodoStore::default()),
            pool: None,
        }
    }

    /// Liveness check used by /ready. In-memory stores are always ready.
    pub async fn ping(&self) -> Result<(), AppError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").fetch_optional(pool).await?;
        }
        Ok(())
    }
}
