use serde::{Deserialize, Serialize};

use saldoo_auth::{Branding, Registration};
use saldoo_core::{AccountId, UserId};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub title: String,
    /// Lowercased tenant label when the page is served on a firm's subdomain.
    pub subdomain: Option<String>,
    pub branding: Branding,
}

impl LoginPage {
    pub fn new(subdomain: Option<String>, branding: Branding) -> Self {
        Self {
            title: format!("Sign in - {}", branding.name),
            subdomain,
            branding,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub user_id: UserId,
    pub account_id: AccountId,
    pub subdomain: String,
    pub login_url: String,
}

impl RegistrationResponse {
    pub fn new(registration: Registration, login_url: String) -> Self {
        Self {
            user_id: registration.user.id,
            account_id: registration.account_id,
            subdomain: registration.subdomain.to_string(),
            login_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubdomainAvailability {
    pub subdomain: String,
    pub available: bool,
}
