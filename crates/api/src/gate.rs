//! Per-request gate: session refresh, tenant resolution and route protection.
//!
//! The gate does not depend on Axum. It consumes the `Host`
//! value, the path and the request's [`SessionJar`], and answers with a
//! [`GateDecision`]. The middleware turns that into headers and redirects.
//!
//! Order of operations:
//! 1. ask the identity provider for the current identity (always, exactly once;
//!    this may rotate the session and stage cookies on the jar)
//! 2. resolve the tenant from the host
//! 3. classify the path and decide

use std::sync::Arc;

use saldoo_auth::{CookieOp, Identity, IdentityProvider, SessionJar};
use saldoo_core::{TenantCandidate, resolve_tenant};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires an authenticated identity.
    Protected,
    /// Sign-in pages; pointless for an authenticated user.
    AuthEntry,
    Public,
}

/// Ordered `(prefix, class)` pairs; the first matching prefix wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(String, RouteClass)>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(vec![
            (DASHBOARD_PATH.to_string(), RouteClass::Protected),
            (LOGIN_PATH.to_string(), RouteClass::AuthEntry),
        ])
    }
}

impl RouteTable {
    pub fn new(entries: Vec<(String, RouteClass)>) -> Self {
        Self { entries }
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        self.entries
            .iter()
            .find(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, class)| *class)
            .unwrap_or(RouteClass::Public)
    }
}

/// What to do with a request. Both outcomes carry the cookie operations the
/// identity provider staged; they must reach the client either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Continue {
        tenant: Option<TenantCandidate>,
        identity: Option<Identity>,
        cookies: Vec<CookieOp>,
    },
    Redirect {
        target: &'static str,
        tenant: Option<TenantCandidate>,
        cookies: Vec<CookieOp>,
    },
}

impl GateDecision {
    pub fn cookies(&self) -> &[CookieOp] {
        match self {
            GateDecision::Continue { cookies, .. } | GateDecision::Redirect { cookies, .. } => cookies,
        }
    }

    pub fn tenant(&self) -> Option<&TenantCandidate> {
        match self {
            GateDecision::Continue { tenant, .. } | GateDecision::Redirect { tenant, .. } => tenant.as_ref(),
        }
    }
}

#[derive(Clone)]
pub struct RequestGate {
    identity: Arc<dyn IdentityProvider>,
    base_domain: String,
    routes: RouteTable,
}

impl RequestGate {
    pub fn new(identity: Arc<dyn IdentityProvider>, base_domain: impl Into<String>) -> Self {
        Self {
            identity,
            base_domain: base_domain.into(),
            routes: RouteTable::default(),
        }
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Decide the fate of one request.
    ///
    /// Never fails: an identity provider error counts as "not signed in".
    /// `jar` is left holding the effective (possibly rotated) cookies.
    pub async fn decide(&self, host: Option<&str>, path: &str, jar: &mut SessionJar) -> GateDecision {
        let identity = match self.identity.current_identity(jar).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, path, "identity lookup failed; treating request as anonymous");
                None
            }
        };

        let tenant = host.and_then(|h| resolve_tenant(h, &self.base_domain));
        let cookies = jar.staged().to_vec();

        let redirect = match (self.routes.classify(path), identity.is_some()) {
            (RouteClass::Protected, false) => Some(LOGIN_PATH),
            (RouteClass::AuthEntry, true) => Some(DASHBOARD_PATH),
            _ => None,
        };

        match redirect {
            Some(target) => GateDecision::Redirect {
                target,
                tenant,
                cookies,
            },
            None => GateDecision::Continue {
                tenant,
                identity,
                cookies,
            },
        }
    }
}
