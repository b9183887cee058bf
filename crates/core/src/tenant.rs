//! Tenant resolution from the request hostname.
//!
//! A firm is addressed as `<subdomain>.<base_domain>`. Resolution is a pure,
//! total function: it never fails and never validates the label it finds.

use serde::{Deserialize, Serialize};

/// The label found in front of the base domain.
///
/// Unvalidated and case-preserving: `ACME.saldoo.be` yields `ACME`. Callers
/// that look the tenant up must lowercase it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantCandidate(String);

impl TenantCandidate {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Lowercased copy, suitable for directory lookups.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl core::fmt::Display for TenantCandidate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the tenant label of `hostname` under `base_domain`.
///
/// - Anything after the first `:` (a port) is ignored.
/// - Only an explicit `.<base_domain>` suffix is stripped; the bare base
///   domain and unrelated hosts (raw IPs, other domains) resolve to `None`.
/// - The suffix is compared ASCII case-insensitively, as host names are;
///   the label keeps the casing it had in `hostname`.
/// - Nested labels are returned as-is (`a.b.saldoo.be` → `a.b`).
pub fn resolve_tenant(hostname: &str, base_domain: &str) -> Option<TenantCandidate> {
    if base_domain.is_empty() {
        return None;
    }

    let host = match hostname.split_once(':') {
        Some((host, _port)) => host,
        None => hostname,
    };

    let split = host.len().checked_sub(base_domain.len())?;
    let suffix = host.get(split..)?;
    if !suffix.eq_ignore_ascii_case(base_domain) {
        return None;
    }
    let label = host.get(..split)?.strip_suffix('.')?;
    if label.is_empty() {
        return None;
    }

    Some(TenantCandidate(label.to_string()))
}

/// `true` when `hostname` carries a non-empty tenant label.
pub fn has_tenant(hostname: &str, base_domain: &str) -> bool {
    resolve_tenant(hostname, base_domain).is_some_and(|t| !t.as_str().is_empty())
}
