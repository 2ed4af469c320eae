//! Reset the todo table to the example todos.

use todo_scaffold::{connect, ensure_tables, seed, AppConfig, Database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todo_scaffold=info")))
        .init();

    let pool = connect(&config.database_url).await?;
    ensure_tables(&pool).await?;
    let db = Database::sqlite(pool.clone());
    match seed(&db).await {
        Ok(created) => tracing::info!(created, "seeding finished"),
        Err(e) => {
            tracing::error!(error = %e, "seeding failed");
            pool.close().await;
            return Err(e.into());
        }
    }
    pool.close().await;
    Ok(())
}
