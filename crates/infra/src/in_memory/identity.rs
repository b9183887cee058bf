use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use saldoo_auth::{Identity, IdentityError, IdentityProvider, SessionGrant, SessionJar, SignUpMetadata};
use saldoo_core::UserId;

/// Default lifetime of an access token.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;

/// How long a redeemed refresh token keeps answering with the grant it was
/// exchanged for. Parallel requests that carry the same expired session all
/// land on one rotated session instead of the losers being signed out.
pub const DEFAULT_REFRESH_REUSE_SECS: i64 = 10;

#[derive(Debug, Clone)]
struct UserRecord {
    identity: Identity,
    password: String,
}

#[derive(Debug, Clone, Copy)]
struct AccessGrant {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Redeemed {
    user_id: UserId,
    successor: SessionGrant,
    redeemed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by lowercase email.
    users: HashMap<String, UserRecord>,
    access: HashMap<String, AccessGrant>,
    /// Refresh tokens are single-use: redeeming one moves it to `redeemed`.
    refresh: HashMap<String, UserId>,
    redeemed: HashMap<String, Redeemed>,
}

impl State {
    fn identity(&self, user_id: UserId) -> Option<Identity> {
        self.users
            .values()
            .find(|u| u.identity.id == user_id)
            .map(|u| u.identity.clone())
    }

    fn issue(&mut self, user_id: UserId, ttl: Duration) -> SessionGrant {
        let access_token = Uuid::now_v7().simple().to_string();
        let refresh_token = Uuid::now_v7().simple().to_string();
        self.access.insert(
            access_token.clone(),
            AccessGrant {
                user_id,
                expires_at: Utc::now() + ttl,
            },
        );
        self.refresh.insert(refresh_token.clone(), user_id);
        SessionGrant {
            access_token,
            refresh_token,
            expires_in: ttl,
        }
    }

    /// Exchange `token` for a session grant.
    ///
    /// A live token is rotated. A token redeemed less than `reuse` ago gets
    /// the grant it was already exchanged for, as long as that grant's own
    /// refresh token has not been revoked or rotated further.
    fn redeem(
        &mut self,
        token: &str,
        ttl: Duration,
        reuse: Duration,
        now: DateTime<Utc>,
    ) -> Option<(Identity, SessionGrant)> {
        self.redeemed.retain(|_, r| now - r.redeemed_at < reuse);

        if let Some(user_id) = self.refresh.remove(token) {
            let identity = self.identity(user_id)?;
            let grant = self.issue(user_id, ttl);
            self.redeemed.insert(
                token.to_string(),
                Redeemed {
                    user_id,
                    successor: grant.clone(),
                    redeemed_at: now,
                },
            );
            return Some((identity, grant));
        }

        let earlier = self.redeemed.get(token)?.clone();
        if !self.refresh.contains_key(&earlier.successor.refresh_token) {
            return None;
        }
        let identity = self.identity(earlier.user_id)?;
        Some((identity, earlier.successor))
    }
}

/// Identity provider stand-in with opaque, rotating tokens.
///
/// Passwords are kept in memory as given; this type never backs a
/// production deployment.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    state: RwLock<State>,
    access_ttl: Duration,
    refresh_reuse: Duration,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_reuse: Duration::seconds(DEFAULT_REFRESH_REUSE_SECS),
        }
    }

    /// Override the access-token lifetime (a non-positive value forces a
    /// refresh on every lookup).
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Override the reuse window of redeemed refresh tokens; zero makes
    /// every refresh token strictly single-use.
    pub fn with_refresh_reuse(mut self, window: Duration) -> Self {
        self.refresh_reuse = window;
        self
    }

    /// Register a user directly, bypassing sign-up. Returns `None` when the
    /// email is taken.
    pub fn add_user(&self, id: UserId, email: &str, password: &str) -> Option<Identity> {
        let mut state = self.state.write().ok()?;
        let key = email.to_lowercase();
        if state.users.contains_key(&key) {
            return None;
        }
        let identity = Identity {
            id,
            email: email.to_string(),
        };
        state.users.insert(
            key,
            UserRecord {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        Some(identity)
    }

    /// Number of live refresh tokens (test helper for rotation checks).
    pub fn live_refresh_tokens(&self) -> usize {
        self.state.read().map(|s| s.refresh.len()).unwrap_or(0)
    }

    fn poisoned() -> IdentityError {
        IdentityError::Unavailable("identity store lock poisoned".to_string())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_identity(&self, jar: &mut SessionJar) -> Result<Option<Identity>, IdentityError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        let now = Utc::now();

        let access = jar.access_token().map(str::to_string);
        if let Some(token) = &access {
            match state.access.get(token).copied() {
                Some(grant) if grant.expires_at > now => {
                    if let Some(identity) = state.identity(grant.user_id) {
                        return Ok(Some(identity));
                    }
                }
                Some(_) => {
                    state.access.remove(token);
                }
                None => {}
            }
        }

        let Some(refresh) = jar.refresh_token().map(str::to_string) else {
            if access.is_some() {
                jar.clear_session();
            }
            return Ok(None);
        };

        match state.redeem(&refresh, self.access_ttl, self.refresh_reuse, now) {
            Some((identity, grant)) => {
                jar.store_session(&grant);
                tracing::debug!(user_id = %identity.id, "session refreshed");
                Ok(Some(identity))
            }
            None => {
                jar.clear_session();
                Ok(None)
            }
        }
    }

    async fn sign_in_with_password(
        &self,
        jar: &mut SessionJar,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let mut state = self.state.write().map_err(|_| Self::poisoned())?;
        let identity = match state.users.get(&email.trim().to_lowercase()) {
            Some(user) if user.password == password => user.identity.clone(),
            _ => return Err(IdentityError::InvalidCredentials),
        };
        let grant = state.issue(identity.id, self.access_ttl);
        jar.store_session(&grant);
        Ok(identity)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _metadata: &SignUpMetadata,
    ) -> Result<Identity, IdentityError> {
        self.add_user(UserId::new(), email.trim(), password)
            .ok_or(IdentityError::AlreadyRegistered)
    }

    async fn sign_out(&self, jar: &mut SessionJar) -> Result<(), IdentityError> {
        if let Ok(mut state) = self.state.write() {
            if let Some(token) = jar.access_token() {
                state.access.remove(token);
            }
            if let Some(token) = jar.refresh_token() {
                state.refresh.remove(token);
                state.redeemed.remove(token);
            }
        }
        jar.clear_session();
        Ok(())
    }
}
