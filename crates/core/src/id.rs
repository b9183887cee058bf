//! Identifiers of firms, users and client companies.
//!
//! All three are UUIDs. The hosted backend issues them and they travel as
//! plain strings in its JSON rows, so each id is serde-transparent and
//! parses from (and prints as) the hyphenated form. A user's id is the
//! identity provider's id for that user; the directory row and the auth
//! record share it.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// An accounting firm. Everything a request may see is scoped to one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

/// An accountant or entrepreneur.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

/// A client company (an SME whose books a firm keeps).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

macro_rules! uuid_id {
    ($t:ident) => {
        impl $t {
            /// Mint an id locally (UUIDv7). Only the in-memory backend and
            /// tests do this; hosted ids come in through `FromStr` or serde.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s.trim())
                    .map(Self)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {e}", stringify!($t))))
            }
        }
    };
}

uuid_id!(AccountId);
uuid_id!(UserId);
uuid_id!(CompanyId);

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTED: &str = "0192F3A4-7B1C-7D2E-8F90-A1B2C3D4E5F6";

    #[test]
    fn parse_rejects_garbage_with_type_name() {
        let err = "not-a-uuid".parse::<AccountId>().unwrap_err();
        let DomainError::InvalidId(msg) = err;
        assert!(msg.starts_with("AccountId"));
    }

    #[test]
    fn backend_ids_print_in_canonical_form() {
        let id: UserId = format!(" {HOSTED} ").parse().unwrap();
        assert_eq!(id.to_string(), HOSTED.to_lowercase());
        assert_eq!(id.to_string().parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn ids_read_from_backend_rows_as_strings() {
        let row = serde_json::json!({ "id": HOSTED.to_lowercase() });
        let id: CompanyId = serde_json::from_value(row["id"].clone()).unwrap();
        assert_eq!(serde_json::to_value(id).unwrap(), row["id"]);
    }
}
