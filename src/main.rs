//! Server: reads config from the environment, ensures tables exist, serves the app router.

use todo_scaffold::{app, connect, ensure_tables, AppConfig, AppState, Database};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();

    let pool = connect(&config.database_url).await?;
    ensure_tables(&pool).await?;
    let bind_addr = config.bind_addr;
    let devtools = config.devtools;
    let state = AppState::new(Database::sqlite(pool), config);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(devtools, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
