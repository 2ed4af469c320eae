//! Pool bootstrap, table DDL and seed data.

use crate::db::Database;
use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Todos inserted by [`seed`].
pub const SEED_TODOS: &[&str] = &["Buy groceries", "Read a book", "Workout"];

/// Open a pool for `database_url`, creating the database file if missing.
/// In-memory databases get a single connection so every query sees the same data.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    tracing::info!(database_url, max_connections, "database pool ready");
    Ok(pool)
}

/// Create `users` and `todos` if they do not exist.
pub async fn ensure_tables(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("tables ensured");
    Ok(())
}

/// Replace all todos with [`SEED_TODOS`]. Returns how many were created.
pub async fn seed(db: &Database) -> Result<u64, AppError> {
    let removed = db.todo.delete_many().await?;
    tracing::debug!(removed, "cleared existing todos");
    let created = db.todo.create_many(SEED_TODOS).await?;
    tracing::info!(created, "seeded todos");
    Ok(created)
}
