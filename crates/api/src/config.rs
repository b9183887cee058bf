//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use saldoo_infra::HostedConfig;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_BASE_DOMAIN: &str = "saldoo.be";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SALDOO_BIND_ADDR is not a socket address: {0}")]
    InvalidBindAddr(String),

    #[error("SALDOO_BASE_DOMAIN must not be empty")]
    EmptyBaseDomain,

    #[error("SALDOO_BACKEND_ANON_KEY is required when SALDOO_BACKEND_URL is set")]
    MissingAnonKey,

    #[error("SALDOO_BACKEND_TIMEOUT_SECS must be a positive integer: {0}")]
    InvalidTimeout(String),

    #[error("SALDOO_SECURE_COOKIES must be true or false: {0}")]
    InvalidBool(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub base_domain: String,
    /// `None` means the seeded in-memory backend.
    pub backend: Option<HostedConfig>,
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("SALDOO_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let base_domain = match lookup("SALDOO_BASE_DOMAIN") {
            Some(raw) => {
                let domain = raw.trim().trim_matches('.').to_lowercase();
                if domain.is_empty() {
                    return Err(ConfigError::EmptyBaseDomain);
                }
                domain
            }
            None => {
                tracing::warn!("SALDOO_BASE_DOMAIN not set; using {DEFAULT_BASE_DOMAIN}");
                DEFAULT_BASE_DOMAIN.to_string()
            }
        };

        let backend = match get("SALDOO_BACKEND_URL") {
            Some(url) => {
                let anon_key = get("SALDOO_BACKEND_ANON_KEY").ok_or(ConfigError::MissingAnonKey)?;
                let mut hosted = HostedConfig::new(url, anon_key);
                if let Some(key) = get("SALDOO_BACKEND_SERVICE_KEY") {
                    hosted = hosted.with_service_key(key);
                }
                if let Some(raw) = get("SALDOO_BACKEND_TIMEOUT_SECS") {
                    let secs: u64 = raw
                        .parse()
                        .ok()
                        .filter(|s| *s > 0)
                        .ok_or(ConfigError::InvalidTimeout(raw))?;
                    hosted = hosted.with_timeout(Duration::from_secs(secs));
                }
                Some(hosted)
            }
            None => None,
        };

        let secure_cookies = match get("SALDOO_SECURE_COOKIES") {
            None => true,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(ConfigError::InvalidBool(raw)),
            },
        };

        Ok(Self {
            bind_addr,
            base_domain,
            backend,
            secure_cookies,
        })
    }
}
