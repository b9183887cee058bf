//! In-memory backend for tests and local development.
//!
//! Same traits as the hosted backend, no network. State lives behind
//! `RwLock`s and disappears with the process.

pub mod directory;
pub mod identity;
pub mod seed;

pub use directory::{DirectoryUser, InMemoryDirectory};
pub use identity::InMemoryIdentityProvider;
pub use seed::{DemoSeed, seed_demo};
