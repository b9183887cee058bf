//! Backend wiring: which identity provider, directory and financial source
//! the handlers talk to.

use std::sync::Arc;

use saldoo_auth::{Directory, IdentityProvider};
use saldoo_dashboard::FinancialSource;
use saldoo_infra::{
    HostedDirectory, HostedIdentityProvider, HostedSetupError, InMemoryDirectory,
    InMemoryIdentityProvider, seed_demo,
};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppServices {
    pub identity: Arc<dyn IdentityProvider>,
    pub directory: Arc<dyn Directory>,
    pub financials: Arc<dyn FinancialSource>,
    pub base_domain: String,
    pub secure_cookies: bool,
}

impl AppServices {
    /// Hosted backend when configured, else the seeded in-memory one.
    pub fn from_config(config: &AppConfig) -> Result<Self, HostedSetupError> {
        match &config.backend {
            Some(hosted) => {
                let directory = Arc::new(HostedDirectory::new(hosted)?);
                Ok(Self {
                    identity: Arc::new(HostedIdentityProvider::new(hosted)?),
                    directory: directory.clone(),
                    financials: directory,
                    base_domain: config.base_domain.clone(),
                    secure_cookies: config.secure_cookies,
                })
            }
            None => {
                tracing::warn!("SALDOO_BACKEND_URL not set; using seeded in-memory backend");
                let mut services = Self::in_memory(&config.base_domain);
                services.secure_cookies = config.secure_cookies;
                Ok(services)
            }
        }
    }

    /// In-memory backend with the demo firm seeded. Cookies are not marked
    /// `Secure`, so it works over plain HTTP.
    pub fn in_memory(base_domain: &str) -> Self {
        let identity = Arc::new(InMemoryIdentityProvider::new());
        let directory = Arc::new(InMemoryDirectory::new());
        seed_demo(&identity, &directory);
        Self::with_backends(identity, directory.clone(), directory, base_domain)
    }

    pub fn with_backends(
        identity: Arc<dyn IdentityProvider>,
        directory: Arc<dyn Directory>,
        financials: Arc<dyn FinancialSource>,
        base_domain: &str,
    ) -> Self {
        Self {
            identity,
            directory,
            financials,
            base_domain: base_domain.to_string(),
            secure_cookies: false,
        }
    }

    /// Where a firm's users sign in.
    pub fn login_url(&self, subdomain: &str) -> String {
        let scheme = if self.secure_cookies { "https" } else { "http" };
        format!("{scheme}://{subdomain}.{}/login", self.base_domain)
    }
}
