//! Environment-driven configuration for the promo platform services
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file. Two kinds of keys are distinguished:
//!
//! - deployment values (ports, upstream URLs, database parameters, signing
//!   secrets) are read with [`ConfigLoader::required_or_dev`]: they are
//!   mandatory in staging and production, and fall back to a loudly logged
//!   built-in default everywhere else
//! - tunables (timeouts, pool sizes) are read with [`ConfigLoader::optional`]
//!
//! A value that is present but unparseable is always an error.

use secrecy::SecretString;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Environment type for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    Local,
    /// Development server
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Staging and production refuse built-in defaults for deployment values
    pub fn is_strict(&self) -> bool {
        matches!(self, Environment::Staging | Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "loc" => Ok(Environment::Local),
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "stg" => Ok(Environment::Staging),
            "production" | "prod" | "prd" => Ok(Environment::Production),
            _ => Err(ConfigError::Invalid {
                key: APP_ENV_KEY.to_string(),
                reason: format!("unknown environment '{s}'"),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value {key} (APP_ENV={environment})")]
    Missing {
        key: String,
        environment: &'static str,
    },

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

const APP_ENV_KEY: &str = "APP_ENV";

/// Reads typed configuration values from a key/value source.
pub struct ConfigLoader {
    environment: Environment,
    source: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
}

impl ConfigLoader {
    /// Load `.env` (if present) and read from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::with_source(|key| std::env::var(key).ok())
    }

    /// Build a loader over a fixed map, used by tests
    pub fn from_map<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values: HashMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::with_source(move |key| values.get(key).cloned())
    }

    fn with_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        let environment = match source(APP_ENV_KEY) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        Ok(Self {
            environment,
            source: Box::new(source),
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Raw lookup; empty strings count as unset
    pub fn get(&self, key: &str) -> Option<String> {
        (self.source)(key).filter(|v| !v.trim().is_empty())
    }

    /// Deployment value: mandatory in staging/production, defaulted elsewhere.
    pub fn required_or_dev<T>(&self, key: &str, dev_default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => parse_value(key, &raw),
            None if self.environment.is_strict() => Err(ConfigError::Missing {
                key: key.to_string(),
                environment: self.environment.as_str(),
            }),
            None => {
                tracing::warn!(
                    key,
                    default = %dev_default,
                    environment = self.environment.as_str(),
                    "configuration value not set, using development default"
                );
                Ok(dev_default)
            }
        }
    }

    /// Tunable with a default that is valid in every environment
    pub fn optional<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => parse_value(key, &raw),
            None => Ok(default),
        }
    }

    /// Like `required_or_dev`, but the value is wrapped as a secret and the
    /// default is never echoed to the log.
    pub fn secret_or_dev(&self, key: &str, dev_default: &str) -> Result<SecretString, ConfigError> {
        match self.get(key) {
            Some(raw) => Ok(SecretString::from(raw)),
            None if self.environment.is_strict() => Err(ConfigError::Missing {
                key: key.to_string(),
                environment: self.environment.as_str(),
            }),
            None => {
                tracing::warn!(
                    key,
                    environment = self.environment.as_str(),
                    "secret not set, using insecure development default"
                );
                Ok(SecretString::from(dev_default.to_string()))
            }
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
