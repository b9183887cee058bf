use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use saldoo_core::UserId;

use crate::session::SessionJar;

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

/// User metadata attached to a new auth identity at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpMetadata {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub subdomain: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("a user with this email address is already registered")]
    AlreadyRegistered,

    /// The provider understood the request and refused it.
    #[error("identity provider rejected the request: {0}")]
    Rejected(String),

    /// Transport failure or provider-side error.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected identity provider response: {0}")]
    InvalidResponse(String),
}

/// Session-issuing identity provider (hosted auth service or an in-memory
/// stand-in).
///
/// Every call that can establish, rotate or end a session does so by staging
/// cookie operations on the request's [`SessionJar`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the authenticated identity for the session in `jar`.
    ///
    /// Side effect: when the access token is missing or stale but the refresh
    /// token is good, both tokens are rotated and staged onto `jar`. A dead
    /// refresh token stages removal of the session cookies and yields `None`.
    async fn current_identity(&self, jar: &mut SessionJar) -> Result<Option<Identity>, IdentityError>;

    async fn sign_in_with_password(
        &self,
        jar: &mut SessionJar,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<Identity, IdentityError>;

    /// End the session. Cookie removal is staged even if revocation fails.
    async fn sign_out(&self, jar: &mut SessionJar) -> Result<(), IdentityError>;
}
