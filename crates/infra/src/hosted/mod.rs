//! Hosted backend: a GoTrue-style auth service and a PostgREST-style data API
//! sharing one base URL.
//!
//! ## Error mapping
//!
//! | Upstream outcome            | Mapped to                         |
//! |-----------------------------|-----------------------------------|
//! | transport error, timeout    | `Unavailable`                     |
//! | 5xx                         | `Unavailable`                     |
//! | 4xx (endpoint-specific)     | `Rejected` / `InvalidCredentials` |
//! | 2xx with an unexpected body | `InvalidResponse`                 |

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use thiserror::Error;

pub mod directory;
pub mod identity;

pub use directory::HostedDirectory;
pub use identity::HostedIdentityProvider;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Public key; sent as `apikey` on every call.
    pub anon_key: String,
    /// Privileged key for data API calls made by the server. Falls back to
    /// the anon key when absent.
    pub service_key: Option<String>,
    pub timeout: Duration,
}

impl HostedConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            service_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_service_key(mut self, key: impl Into<String>) -> Self {
        self.service_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
pub enum HostedSetupError {
    #[error("backend url must not be empty")]
    MissingUrl,

    #[error("backend anon key must not be empty")]
    MissingAnonKey,

    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// HTTP client bound to one backend project.
#[derive(Debug, Clone)]
pub(crate) struct HostedClient {
    http: Client,
    base_url: String,
    anon_key: String,
    service_key: Option<String>,
}

impl HostedClient {
    pub(crate) fn new(config: &HostedConfig) -> Result<Self, HostedSetupError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HostedSetupError::MissingUrl);
        }
        if config.anon_key.trim().is_empty() {
            return Err(HostedSetupError::MissingAnonKey);
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(concat!("saldoo/", env!("CARGO_PKG_VERSION")))
            .use_rustls_tls()
            .build()?;
        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
            service_key: config.service_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request authorized as a user (or anonymously when `bearer` is `None`).
    pub(crate) fn as_user(&self, builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    /// Request authorized as the server.
    pub(crate) fn as_service(&self, builder: RequestBuilder) -> RequestBuilder {
        let key = self.service_key.as_deref().unwrap_or(&self.anon_key);
        builder.header("apikey", key).bearer_auth(key)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.endpoint(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.endpoint(path))
    }
}

/// Non-success response, body read for diagnostics.
#[derive(Debug)]
pub(crate) struct Failure {
    pub status: StatusCode,
    pub message: String,
}

impl Failure {
    pub(crate) async fn read(response: Response) -> Self {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string());
        Self {
            status,
            message: error_message(&body).unwrap_or(body),
        }
    }

    pub(crate) fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

/// Pull the human-readable part out of a JSON error body. Both services use
/// a handful of different field names.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
