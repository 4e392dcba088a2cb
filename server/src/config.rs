use anyhow::{Context, Result};
use platform_db::DatabaseSettings;
use platform_obs::ObsConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub obs: ObsConfig,
}

impl AppConfig {
    /// Environment first, then `.env` for anything still unset.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database =
            DatabaseSettings::from_lookup(&lookup).context("loading database settings")?;
        let obs = ObsConfig::from_lookup(&lookup);
        Ok(Self { database, obs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_database_and_observability() {
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            "LOG_FORMAT" => Some("json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.obs.format, platform_obs::LogFormat::Json);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_lookup(|_| None).unwrap_err();
        assert!(format!("{err:#}").contains("DATABASE_URL"));
    }
}
