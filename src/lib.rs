//! Todo-list web scaffold: composable request schemas, scope-guarded routes, a SQLite data
//! layer and devtools panels.

pub mod auth;
pub mod config;
pub mod db;
pub mod devtools;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;
pub mod store;

pub use auth::{FixedIdentityProvider, Identity, IdentityProvider, StubIdentityProvider};
pub use config::AppConfig;
pub use db::Database;
pub use error::{AppError, ConfigError};
pub use response::{success_many, success_one, success_page};
pub use routes::app;
pub use schema::{ensure_object, http_schema, HttpSchemaConfig, ObjectLike, ObjectSchema};
pub use state::AppState;
pub use store::{connect, ensure_tables, seed};
