//! User profiles joined with their firm's account attributes.

use serde::{Deserialize, Serialize};

use saldoo_core::{AccountId, CompanyId, UserId};

use crate::Role;

/// Product name shown when no firm branding applies.
pub const PRODUCT_NAME: &str = "Saldoo";
pub const DEFAULT_PRIMARY_COLOR: &str = "#1e40af";
pub const DEFAULT_CONTRAST_COLOR: &str = "#ffffff";

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

fn default_contrast_color() -> String {
    DEFAULT_CONTRAST_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

/// An accounting firm (the tenant) and its branding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    #[serde(default = "default_contrast_color")]
    pub contrast_color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A user record joined with the firm it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Client company of an entrepreneur; accountants have none.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    pub account: Account,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// First letter of first and last name, uppercased.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// What a page needs to theme itself for a firm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branding {
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub contrast_color: String,
}

impl Branding {
    /// Product branding used when no firm applies.
    pub fn generic() -> Self {
        Self {
            name: PRODUCT_NAME.to_string(),
            logo_url: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            contrast_color: DEFAULT_CONTRAST_COLOR.to_string(),
        }
    }
}

impl From<&Account> for Branding {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            logo_url: account.logo_url.clone(),
            primary_color: account.primary_color.clone(),
            contrast_color: account.contrast_color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_joined_row_and_fills_branding_defaults() {
        let raw = serde_json::json!({
            "id": "0190f5a4-0000-7000-8000-000000000001",
            "email": "jan@acme.be",
            "first_name": "jan",
            "last_name": "peeters",
            "role": "entrepreneur",
            "account_id": "0190f5a4-0000-7000-8000-000000000002",
            "company_id": null,
            "is_active": true,
            "account": {
                "id": "0190f5a4-0000-7000-8000-000000000002",
                "name": "Acme Boekhouding",
                "subdomain": "acme"
            }
        });

        let profile: Profile = serde_json::from_value(raw).unwrap();
        assert_eq!(profile.role, Role::Entrepreneur);
        assert_eq!(profile.account.primary_color, DEFAULT_PRIMARY_COLOR);
        assert!(profile.account.is_active);
        assert_eq!(profile.initials(), "JP");
        assert_eq!(profile.full_name(), "jan peeters");
    }
}
