use saldoo_auth::Identity;
use saldoo_core::TenantCandidate;

/// Header carrying the resolved tenant label to handlers and back to the
/// client.
pub const TENANT_HEADER: &str = "x-subdomain";

/// Tenant context for a request.
///
/// `None` on the bare base domain and on hosts outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant: Option<TenantCandidate>,
}

impl TenantContext {
    pub fn new(tenant: Option<TenantCandidate>) -> Self {
        Self { tenant }
    }

    pub fn tenant(&self) -> Option<&TenantCandidate> {
        self.tenant.as_ref()
    }

    /// Lowercased label, ready for a directory lookup.
    pub fn lookup_key(&self) -> Option<String> {
        self.tenant.as_ref().map(TenantCandidate::normalized)
    }
}

/// Session context for a request: who the gate found, after any refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn new(identity: Option<Identity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}
