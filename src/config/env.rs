//! Runtime configuration from environment variables (`.env` is loaded by the binaries).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./dev.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    /// Devtools routes are mounted only when set. Defaults to on outside production.
    pub devtools: bool,
}

impl AppConfig {
    /// Read `DATABASE_URL`, `BIND_ADDR`, `APP_ENV` and `DEVTOOLS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;
        let environment = match lookup("APP_ENV") {
            Some(v) => v.parse()?,
            None => Environment::Development,
        };
        let devtools = match lookup("DEVTOOLS") {
            Some(v) => parse_flag("DEVTOOLS", &v)?,
            None => environment != Environment::Production,
        };
        Ok(AppConfig {
            database_url,
            bind_addr,
            environment,
            devtools,
        })
    }

    /// Default `EnvFilter` directive: errors and warnings only in production, query logs otherwise.
    pub fn log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Production => "todo_scaffold=warn,sqlx=error,tower_http=warn",
            Environment::Development | Environment::Test => {
                "todo_scaffold=debug,sqlx=info,tower_http=debug"
            }
        }
    }
}

fn parse_flag(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(c.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(c.environment, Environment::Development);
        assert!(c.devtools);
    }

    #[test]
    fn production_disables_devtools_and_quietens_logs() {
        let c = config(&[("APP_ENV", "production")]).unwrap();
        assert!(!c.devtools);
        assert!(c.log_filter().contains("sqlx=error"));

        let c = config(&[("APP_ENV", "production"), ("DEVTOOLS", "on")]).unwrap();
        assert!(c.devtools);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config(&[("APP_ENV", "staging")]),
            Err(ConfigError::Invalid { key: "APP_ENV", .. })
        ));
        assert!(matches!(
            config(&[("DEVTOOLS", "maybe")]),
            Err(ConfigError::Invalid { key: "DEVTOOLS", .. })
        ));
    }
}
