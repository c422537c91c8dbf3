//! Database connection pool management
//!
//! Provides unified PostgreSQL pool configuration and creation for the
//! services. Startup tolerates a database that is still coming up: the
//! connection is retried a fixed number of times before giving up.

use config_core::{ConfigError, ConfigLoader};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Database connection pool configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name for log labeling
    pub service_name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: SecretString,
    pub database: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection acquisition timeout (get connection from pool)
    pub acquire_timeout_secs: u64,
    /// Connection attempts made at startup before failing
    pub connect_retries: u32,
    /// Pause between startup connection attempts
    pub retry_delay: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("connect_retries", &self.connect_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

impl DbConfig {
    /// Read `DB_*` keys; connection parameters default to a local postgres
    /// outside staging/production.
    pub fn from_loader(
        service_name: &str,
        default_database: &str,
        loader: &ConfigLoader,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            service_name: service_name.to_string(),
            host: loader.required_or_dev("DB_HOST", "localhost".to_string())?,
            port: loader.required_or_dev("DB_PORT", 5432)?,
            user: loader.required_or_dev("DB_USER", "postgres".to_string())?,
            password: loader.secret_or_dev("DB_PASSWORD", "postgres")?,
            database: loader.required_or_dev("DB_NAME", default_database.to_string())?,
            max_connections: loader.optional("DB_MAX_CONNECTIONS", 10)?,
            min_connections: loader.optional("DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout_secs: loader.optional("DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            connect_retries: loader.optional("DB_CONNECT_RETRIES", 5)?,
            retry_delay: Duration::from_secs(3),
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.database)
    }

    /// Log pool configuration details
    pub fn log_config(&self) {
        info!(
            service = %self.service_name,
            host = %self.host,
            database = %self.database,
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            acquire_timeout_secs = self.acquire_timeout_secs,
            "Database pool configuration"
        );
    }
}

/// Create a PostgreSQL connection pool, retrying while the server is unreachable
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    config.log_config();

    let attempts = config.connect_retries.max(1);
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .test_before_acquire(true)
            .connect_with(config.connect_options())
            .await;

        match result {
            Ok(pool) => {
                sqlx::query("SELECT 1").execute(&pool).await?;
                info!(
                    service = %config.service_name,
                    attempt,
                    "Database pool created and verified successfully"
                );
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(
                    service = %config.service_name,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(config.retry_delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    service = %config.service_name,
                    attempts,
                    error = %e,
                    "Database connection failed, giving up"
                );
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_in_development() {
        let loader = ConfigLoader::from_map([("APP_ENV", "development")]).unwrap();
        let config = DbConfig::from_loader("test-service", "promocodedb", &loader).unwrap();

        assert_eq!(config.service_name, "test-service");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "promocodedb");
        assert_eq!(config.connect_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_config_requires_host_in_production() {
        let loader = ConfigLoader::from_map([("APP_ENV", "production")]).unwrap();
        assert!(DbConfig::from_loader("test-service", "promocodedb", &loader).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let loader = ConfigLoader::from_map([("DB_PASSWORD", "hunter2")]).unwrap();
        let config = DbConfig::from_loader("test-service", "promocodedb", &loader).unwrap();

        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_create_pool_gives_up_after_retries() {
        let loader = ConfigLoader::from_map([
            ("DB_HOST", "127.0.0.1"),
            ("DB_PORT", "1"),
            ("DB_CONNECT_RETRIES", "2"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "1"),
        ])
        .unwrap();
        let mut config = DbConfig::from_loader("test-service", "promocodedb", &loader).unwrap();
        config.retry_delay = Duration::from_millis(10);

        let started = std::time::Instant::now();
        assert!(create_pool(&config).await.is_err());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
