//! `saldoo-auth`: identity, sessions and the firm directory boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the hosted
//! identity provider and data API live behind the [`IdentityProvider`] and
//! [`Directory`] traits, implemented in `saldoo-infra`.

pub mod directory;
pub mod identity;
pub mod profile;
pub mod registration;
pub mod roles;
pub mod session;

pub use directory::{Directory, DirectoryError, NewAccount};
pub use identity::{Identity, IdentityError, IdentityProvider, SignUpMetadata};
pub use profile::{Account, Branding, Profile};
pub use registration::{
    Registration, RegistrationError, RegistrationRequest, check_subdomain_availability,
    register_accountant,
};
pub use roles::Role;
pub use session::{CookieOp, SessionGrant, SessionJar};
