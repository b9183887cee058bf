use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use saldoo_core::{AccountId, Subdomain, UserId};

use crate::{Account, Profile};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Transport failure or data-API-side error.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The data API refused the request (constraint violation, bad input).
    #[error("directory rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected directory response: {0}")]
    InvalidResponse(String),
}

/// Input of the atomic "create firm + first user" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub account_name: String,
    pub subdomain: Subdomain,
}

/// Read/write access to firms and their users.
///
/// Lookups return `Ok(None)` for "not found"; `Err` means the question could
/// not be answered. Callers decide how to fail closed.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<Profile>, DirectoryError>;

    /// Active firms only.
    async fn get_account_by_subdomain(&self, subdomain: &str) -> Result<Option<Account>, DirectoryError>;

    async fn is_subdomain_available(&self, subdomain: &str) -> Result<bool, DirectoryError>;

    /// Create the firm and its first (accountant) user in one step.
    async fn create_account_and_user(&self, new: &NewAccount) -> Result<AccountId, DirectoryError>;
}
