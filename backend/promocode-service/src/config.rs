//! Configuration for the two promocode binaries
//!
//! `promocode-grpc` owns the database; `promocode-api` only needs the
//! signing secret and the RPC address.

use anyhow::{Context, Result};
use config_core::ConfigLoader;
use db_pool::DbConfig;
use secrecy::SecretString;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GrpcSettings {
    pub port: u16,
    pub database: DbConfig,
}

impl GrpcSettings {
    pub fn load() -> Result<Self> {
        let loader = ConfigLoader::from_env().context("Failed to read APP_ENV")?;
        Self::from_loader(&loader)
    }

    pub fn from_loader(loader: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            port: loader
                .required_or_dev("GRPC_PORT", 50051)
                .context("Invalid GRPC_PORT")?,
            database: DbConfig::from_loader("promocode-grpc", "promocodedb", loader)
                .context("Invalid database configuration")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub port: u16,
    pub jwt_secret: SecretString,
    pub grpc_server_addr: String,
    pub rpc_timeout: Duration,
}

impl ApiSettings {
    pub fn load() -> Result<Self> {
        let loader = ConfigLoader::from_env().context("Failed to read APP_ENV")?;
        Self::from_loader(&loader)
    }

    pub fn from_loader(loader: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            port: loader
                .required_or_dev("PORT", 8082)
                .context("Invalid PORT")?,
            jwt_secret: loader
                .secret_or_dev("JWT_SECRET", "my_secret_key")
                .context("Invalid JWT_SECRET")?,
            grpc_server_addr: loader
                .required_or_dev("GRPC_SERVER_ADDR", "http://promocode-grpc:50051".to_string())
                .context("Invalid GRPC_SERVER_ADDR")?,
            rpc_timeout: Duration::from_secs(
                loader
                    .optional("RPC_TIMEOUT_SECS", 10)
                    .context("Invalid RPC_TIMEOUT_SECS")?,
            ),
        })
    }
}
