//! Gateway configuration
//!
//! Upstream base URLs are parsed once here; a malformed URL stops startup.

use anyhow::{Context, Result};
use config_core::ConfigLoader;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub port: u16,
    pub user_service_url: Url,
    pub promo_service_url: Url,
    pub upstream_timeout: Duration,
}

impl GatewaySettings {
    pub fn load() -> Result<Self> {
        let loader = ConfigLoader::from_env().context("Failed to read APP_ENV")?;
        Self::from_loader(&loader)
    }

    pub fn from_loader(loader: &ConfigLoader) -> Result<Self> {
        Ok(Self {
            port: loader
                .required_or_dev("PORT", 8080)
                .context("Invalid PORT")?,
            user_service_url: upstream_url(loader, "USER_SERVICE_URL", "http://user-service:8081")?,
            promo_service_url: upstream_url(
                loader,
                "PROMO_SERVICE_URL",
                "http://promocode-api:8082",
            )?,
            upstream_timeout: Duration::from_secs(
                loader
                    .optional("UPSTREAM_TIMEOUT_SECS", 30)
                    .context("Invalid UPSTREAM_TIMEOUT_SECS")?,
            ),
        })
    }
}

fn upstream_url(loader: &ConfigLoader, key: &str, dev_default: &str) -> Result<Url> {
    let raw: String = loader
        .required_or_dev(key, dev_default.to_string())
        .with_context(|| format!("Invalid {key}"))?;
    let url = Url::parse(&raw).with_context(|| format!("Invalid {key}: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Invalid {key}: unsupported scheme {}", url.scheme());
    }
    Ok(url)
}
