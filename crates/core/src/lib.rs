//! `saldoo-core`: domain foundation shared by every Saldoo crate.
//!
//! This crate contains **pure** primitives (no IO): identifiers, the domain
//! error model, the `Subdomain` value object and tenant resolution from a
//! request hostname.

pub mod error;
pub mod id;
pub mod subdomain;
pub mod tenant;
pub mod value_object;

pub use error::DomainError;
pub use id::{AccountId, CompanyId, UserId};
pub use subdomain::{Subdomain, SubdomainError};
pub use tenant::{TenantCandidate, has_tenant, resolve_tenant};
pub use value_object::ValueObject;
