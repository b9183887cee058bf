//! Self-service registration of a new accounting firm.
//!
//! All input checks run before any network call. After that the flow is:
//! subdomain availability, auth sign-up, then the directory's atomic
//! "create firm + first user" operation.

use serde::Deserialize;
use thiserror::Error;

use saldoo_core::{AccountId, Subdomain, SubdomainError};

use crate::{Directory, DirectoryError, Identity, IdentityError, IdentityProvider, NewAccount, SignUpMetadata};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub subdomain: String,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: Identity,
    pub account_id: AccountId,
    pub subdomain: Subdomain,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,

    #[error("please fill in all fields")]
    MissingFields,

    #[error(transparent)]
    InvalidSubdomain(#[from] SubdomainError),

    #[error("could not check subdomain availability")]
    AvailabilityCheck(#[source] DirectoryError),

    #[error("this subdomain is already in use")]
    SubdomainTaken,

    #[error("could not create user: {0}")]
    SignUp(#[source] IdentityError),

    #[error("could not create account: {0}")]
    AccountCreation(#[source] DirectoryError),
}

impl RegistrationRequest {
    /// Check the form and return the normalized subdomain.
    pub fn validate(&self) -> Result<Subdomain, RegistrationError> {
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::WeakPassword);
        }
        let required = [
            &self.email,
            &self.first_name,
            &self.last_name,
            &self.company_name,
            &self.subdomain,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(RegistrationError::MissingFields);
        }
        Ok(Subdomain::parse(&self.subdomain)?)
    }
}

/// Register a firm and its first accountant.
///
/// Nothing is created when validation or the availability check fails. A
/// failure of the final create step is reported as-is: the auth identity made
/// by sign-up is not rolled back here.
pub async fn register_accountant(
    identity: &dyn IdentityProvider,
    directory: &dyn Directory,
    request: &RegistrationRequest,
) -> Result<Registration, RegistrationError> {
    let subdomain = request.validate()?;

    let available = directory
        .is_subdomain_available(subdomain.as_str())
        .await
        .map_err(RegistrationError::AvailabilityCheck)?;
    if !available {
        return Err(RegistrationError::SubdomainTaken);
    }

    let email = request.email.trim();
    let metadata = SignUpMetadata {
        first_name: request.first_name.trim().to_string(),
        last_name: request.last_name.trim().to_string(),
        company_name: request.company_name.trim().to_string(),
        subdomain: subdomain.to_string(),
    };
    let user = identity
        .sign_up(email, &request.password, &metadata)
        .await
        .map_err(RegistrationError::SignUp)?;

    let new = NewAccount {
        user_id: user.id,
        email: email.to_string(),
        first_name: metadata.first_name,
        last_name: metadata.last_name,
        account_name: metadata.company_name,
        subdomain: subdomain.clone(),
    };
    let account_id = directory.create_account_and_user(&new).await.map_err(|e| {
        tracing::error!(
            user_id = %user.id,
            subdomain = %subdomain,
            error = %e,
            "account creation failed after sign-up; auth user left without a firm"
        );
        RegistrationError::AccountCreation(e)
    })?;

    tracing::info!(account_id = %account_id, subdomain = %subdomain, "firm registered");

    Ok(Registration {
        user,
        account_id,
        subdomain,
    })
}

/// Availability check for the registration form. Any failure reads as
/// "not available".
pub async fn check_subdomain_availability(directory: &dyn Directory, raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    match directory.is_subdomain_available(&normalized).await {
        Ok(available) => available,
        Err(e) => {
            tracing::warn!(subdomain = %normalized, error = %e, "subdomain availability check failed");
            false
        }
    }
}
