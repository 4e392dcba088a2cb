//! Database primitives: environment-driven settings, the shared pool, and
//! the sea-orm backed [`SeaOrmStore`].

mod store;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub use store::SeaOrmStore;

/// Shared connection pool.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set DATABASE_URL)")]
    MissingUrl,
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("database connection failed: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sql_logging: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            sql_logging: false,
        }
    }

    pub fn from_env() -> DbResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source shaped like the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(DbError::MissingUrl)?;
        let mut settings = Self::new(url.trim());
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections = parse_setting("DATABASE_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = lookup("DATABASE_CONNECT_TIMEOUT_SECS") {
            settings.connect_timeout_secs = parse_setting("DATABASE_CONNECT_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("DATABASE_SQL_LOG") {
            settings.sql_logging = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(settings)
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sql_logging);
        options
    }
}

fn parse_setting<T: std::str::FromStr>(key: &'static str, raw: &str) -> DbResult<T> {
    raw.trim().parse().map_err(|_| DbError::InvalidSetting {
        key,
        value: raw.to_string(),
    })
}

/// Open the shared pool.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let pool = Database::connect(settings.connect_options()).await?;
    info!(max_connections = settings.max_connections, "database pool ready");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn url_is_required() {
        let err = DatabaseSettings::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, DbError::MissingUrl));
        let err = DatabaseSettings::from_lookup(env(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, DbError::MissingUrl));
    }

    #[test]
    fn defaults_apply() {
        let settings =
            DatabaseSettings::from_lookup(env(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(settings.url, "sqlite::memory:");
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.connect_timeout_secs, 5);
        assert!(!settings.sql_logging);
    }

    #[test]
    fn overrides_parse() {
        let settings = DatabaseSettings::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("DATABASE_CONNECT_TIMEOUT_SECS", "30"),
            ("DATABASE_SQL_LOG", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.max_connections, 3);
        assert_eq!(settings.connect_timeout_secs, 30);
        assert!(settings.sql_logging);
    }

    #[test]
    fn bad_number_is_reported() {
        let err = DatabaseSettings::from_lookup(env(&[
            ("DATABASE_URL", "postgres://localhost/hr"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidSetting {
                key: "DATABASE_MAX_CONNECTIONS",
                ..
            }
        ));
    }
}
