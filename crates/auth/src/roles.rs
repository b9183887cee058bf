use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of a user within their firm.
///
/// Closed on purpose: every view that branches on the role matches on both
/// variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Staff of the accounting firm; sees the client list.
    Accountant,
    /// A client of the firm; sees their own KPIs.
    Entrepreneur,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Accountant => "accountant",
            Role::Entrepreneur => "entrepreneur",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accountant" => Ok(Role::Accountant),
            "entrepreneur" => Ok(Role::Entrepreneur),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Entrepreneur).unwrap(), "\"entrepreneur\"");
        let r: Role = serde_json::from_str("\"accountant\"").unwrap();
        assert_eq!(r, Role::Accountant);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert_eq!("admin".parse::<Role>(), Err(UnknownRole("admin".into())));
    }
}
