//! Service configuration loaded from the process environment

use anyhow::{Result, bail};
use config::{Config, Environment};
use rand::{Rng, distributions::Alphanumeric};
use serde::Deserialize;
use tracing::warn;

use crate::jwt::TokenConfig;

/// Issuer used when `JWT_ISSUER` is not set
pub const DEFAULT_ISSUER: &str = "rest-api";

/// Raw settings as they appear in the environment
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    port: Option<u16>,
    jwt_secret: Option<String>,
    jwt_issuer: Option<String>,
    dev_mode: Option<bool>,
}

/// Settings shared by every service binary
#[derive(Clone)]
pub struct ServiceConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Signing configuration for the token service
    pub token: TokenConfig,
}

impl ServiceConfig {
    /// Load settings from the environment
    ///
    /// # Environment Variables
    /// - `PORT`: listen port (default: `default_port`)
    /// - `JWT_SECRET`: signing secret, required unless `DEV_MODE=true`
    /// - `JWT_ISSUER`: issuer claim (default: `rest-api`)
    /// - `DEV_MODE`: generate a throwaway secret when `JWT_SECRET` is unset
    pub fn load(default_port: u16) -> Result<Self> {
        let raw: RawSettings = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw, default_port)
    }

    fn from_raw(raw: RawSettings, default_port: u16) -> Result<Self> {
        let secret = match raw.jwt_secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if raw.dev_mode.unwrap_or(false) => {
                warn!(
                    "Using a randomly generated JWT_SECRET because DEV_MODE=true; \
                     tokens will not survive a restart and are not shared between services"
                );
                random_secret()
            }
            None => bail!("JWT_SECRET environment variable is required but not set"),
        };

        let issuer = raw
            .jwt_issuer
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        Ok(ServiceConfig {
            port: raw.port.unwrap_or(default_port),
            token: TokenConfig::new(secret, issuer),
        })
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::DEFAULT_TOKEN_TTL_SECONDS;
    use serial_test::serial;

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = ServiceConfig::from_raw(RawSettings::default(), 3000);
        assert!(result.is_err());
    }

    #[test]
    fn test_dev_mode_generates_secret() {
        let raw = RawSettings {
            dev_mode: Some(true),
            ..Default::default()
        };

        let config = ServiceConfig::from_raw(raw, 3000).unwrap();
        assert_eq!(config.token.secret.len(), 48);
        assert_eq!(config.token.issuer, DEFAULT_ISSUER);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_empty_secret_counts_as_missing() {
        let raw = RawSettings {
            jwt_secret: Some(String::new()),
            ..Default::default()
        };
        assert!(ServiceConfig::from_raw(raw, 3000).is_err());
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        unsafe {
            std::env::set_var("PORT", "8181");
            std::env::set_var("JWT_SECRET", "from-the-environment");
            std::env::set_var("JWT_ISSUER", "custom-issuer");
        }

        let config = ServiceConfig::load(3000).unwrap();
        assert_eq!(config.port, 8181);
        assert_eq!(config.token.secret, "from-the-environment");
        assert_eq!(config.token.issuer, "custom-issuer");
        assert_eq!(config.token.ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);

        unsafe {
            std::env::remove_var("PORT");
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_ISSUER");
        }
    }
}
