//! SQLite-backed stores. Values are always bound as parameters.

use super::{NewUser, Todo, TodoStore, User, UserPatch, UserStore};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, first_name, full_name, email, created_at";
const TODO_COLUMNS: &str = "id, title, created_at";

fn duplicate_as_conflict(e: sqlx::Error, id: &str) -> AppError {
    let unique = e.as_database_error().map_or(false, |db| db.is_unique_violation());
    if unique {
        AppError::Conflict(format!("user '{}' already exists", id))
    } else {
        AppError::Db(e)
    }
}

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserStore { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_unique(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_many(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);
        let rows = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.id)
            .bind(&user.first_name)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_as_conflict(e, &user.id))?;
        Ok(row)
    }

    async fn update(&self, id: &str, patch: &UserPatch) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET first_name = COALESCE(?, first_name), full_name = COALESCE(?, full_name), \
             email = COALESCE(?, email) WHERE id = ? RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&patch.first_name)
            .bind(&patch.full_name)
            .bind(&patch.email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("DELETE FROM users WHERE id = ? RETURNING {}", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteTodoStore { pool }
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn find_many(&self, skip: u64, take: u32) -> Result<Vec<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos ORDER BY id LIMIT ? OFFSET ?", TODO_COLUMNS);
        let rows = sqlx::query_as::<_, Todo>(&sql)
            .bind(i64::from(take))
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    async fn find_unique(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let sql = format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS);
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, title: &str) -> Result<Todo, AppError> {
        let sql = format!(
            "INSERT INTO todos (title, created_at) VALUES (?, ?) RETURNING {}",
            TODO_COLUMNS
        );
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(title)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_many(&self, titles: &[&str]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut created = 0;
        for title in titles {
            let res = sqlx::query("INSERT INTO todos (title, created_at) VALUES (?, ?)")
                .bind(*title)
                .bind(now)
                .execute(&mut *tx)
                .await?;
            created += res.rows_affected();
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i64, title: &str) -> Result<Option<Todo>, AppError> {
        let sql = format!("UPDATE todos SET title = ? WHERE id = ? RETURNING {}", TODO_COLUMNS);
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(title)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let sql = format!("DELETE FROM todos WHERE id = ? RETURNING {}", TODO_COLUMNS);
        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_many(&self) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM todos").execute(&self.pool).await?;
        Ok(res.rows_affected())
    }
}
