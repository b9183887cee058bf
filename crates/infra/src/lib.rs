//! Infrastructure layer: backends for identity, the firm directory and
//! financial data.
//!
//! - [`hosted`]: the hosted auth service and data API over HTTP.
//! - [`in_memory`]: process-local stand-ins for tests and local development.

pub mod hosted;
pub mod in_memory;

pub use hosted::{HostedConfig, HostedDirectory, HostedIdentityProvider, HostedSetupError};
pub use in_memory::{DirectoryUser, InMemoryDirectory, InMemoryIdentityProvider, seed_demo};
