//! Configuration management for Identity Service
//!
//! Loads settings from environment variables (and `.env` for local
//! development). See `config_core` for how missing values are treated per
//! `APP_ENV`.

use anyhow::{Context, Result};
use config_core::ConfigLoader;
use db_pool::DbConfig;
use secrecy::SecretString;
use std::time::Duration;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database: DbConfig,
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let loader = ConfigLoader::from_env().context("Failed to read APP_ENV")?;
        Self::from_loader(&loader)
    }

    pub fn from_loader(loader: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            port: loader
                .required_or_dev("PORT", 8081)
                .context("Invalid PORT")?,
            database: DbConfig::from_loader("identity-service", "userdb", loader)
                .context("Invalid database configuration")?,
            jwt_secret: loader
                .secret_or_dev("JWT_SECRET", "my_secret_key")
                .context("Invalid JWT_SECRET")?,
            token_ttl: Duration::from_secs(
                loader
                    .optional("TOKEN_TTL_SECS", 86_400)
                    .context("Invalid TOKEN_TTL_SECS")?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let loader = ConfigLoader::from_map([("APP_ENV", "local")]).unwrap();
        let settings = Settings::from_loader(&loader).unwrap();

        assert_eq!(settings.port, 8081);
        assert_eq!(settings.token_ttl, Duration::from_secs(86_400));
        assert_eq!(settings.database.database, "userdb");
    }

    #[test]
    fn test_production_requires_secret() {
        let loader = ConfigLoader::from_map([
            ("APP_ENV", "production"),
            ("PORT", "8081"),
            ("DB_HOST", "db"),
            ("DB_PORT", "5432"),
            ("DB_USER", "svc"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "userdb"),
        ])
        .unwrap();

        let err = Settings::from_loader(&loader).unwrap_err();
        assert!(format!("{err:#}").contains("JWT_SECRET"));
    }
}
