//! Identity provider backed by the hosted auth service (`/auth/v1`).

use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use saldoo_auth::{Identity, IdentityError, IdentityProvider, SessionGrant, SessionJar, SignUpMetadata};

use super::{Failure, HostedClient, HostedConfig, HostedSetupError};

#[derive(Debug, Deserialize)]
struct UserBody {
    id: saldoo_core::UserId,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for Identity {
    fn from(user: UserBody) -> Self {
        Identity {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: UserBody,
}

impl TokenBody {
    fn into_parts(self) -> (SessionGrant, Identity) {
        let grant = SessionGrant {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: Duration::seconds(self.expires_in),
        };
        (grant, self.user.into())
    }
}

/// Sign-up answers with the bare user, or with a full session when email
/// confirmation is disabled.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session { user: UserBody },
    User(UserBody),
}

fn transport(e: reqwest::Error) -> IdentityError {
    IdentityError::Unavailable(e.to_string())
}

fn invalid(e: reqwest::Error) -> IdentityError {
    IdentityError::InvalidResponse(e.to_string())
}

pub struct HostedIdentityProvider {
    client: HostedClient,
}

impl HostedIdentityProvider {
    pub fn new(config: &HostedConfig) -> Result<Self, HostedSetupError> {
        Ok(Self {
            client: HostedClient::new(config)?,
        })
    }

    /// `Ok(None)` when the provider rejects the token itself.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<Identity>, IdentityError> {
        let response = self
            .client
            .as_user(self.client.get("auth/v1/user"), Some(access_token))
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            s if s.is_success() => Ok(Some(response.json::<UserBody>().await.map_err(invalid)?.into())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Err(IdentityError::Unavailable(Failure::read(response).await.to_string())),
        }
    }

    /// Redeem the refresh token. `Ok(None)` means the token is dead.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<(SessionGrant, Identity)>, IdentityError> {
        let response = self
            .client
            .as_user(self.client.post("auth/v1/token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            s if s.is_success() => {
                let body = response.json::<TokenBody>().await.map_err(invalid)?;
                Ok(Some(body.into_parts()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let failure = Failure::read(response).await;
                tracing::debug!(error = %failure, "refresh token rejected");
                Ok(None)
            }
            _ => Err(IdentityError::Unavailable(Failure::read(response).await.to_string())),
        }
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn current_identity(&self, jar: &mut SessionJar) -> Result<Option<Identity>, IdentityError> {
        let access = jar.access_token().map(str::to_string);
        if let Some(token) = &access {
            if let Some(identity) = self.fetch_user(token).await? {
                return Ok(Some(identity));
            }
        }

        let Some(refresh_token) = jar.refresh_token().map(str::to_string) else {
            if access.is_some() {
                jar.clear_session();
            }
            return Ok(None);
        };

        match self.refresh(&refresh_token).await? {
            Some((grant, identity)) => {
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
        let response = self
            .client
            .as_user(self.client.post("auth/v1/token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email.trim(), "password": password }))
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            s if s.is_success() => {
                let (grant, identity) = response.json::<TokenBody>().await.map_err(invalid)?.into_parts();
                jar.store_session(&grant);
                Ok(identity)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Err(IdentityError::InvalidCredentials),
            _ => {
                let failure = Failure::read(response).await;
                if failure.is_server_error() {
                    Err(IdentityError::Unavailable(failure.to_string()))
                } else {
                    Err(IdentityError::Rejected(failure.message))
                }
            }
        }
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .as_user(self.client.post("auth/v1/signup"), None)
            .json(&json!({ "email": email, "password": password, "data": metadata }))
            .send()
            .await
            .map_err(transport)?;

        if response.status().is_success() {
            return match response.json::<SignUpBody>().await.map_err(invalid)? {
                SignUpBody::Session { user } | SignUpBody::User(user) => Ok(user.into()),
            };
        }

        let failure = Failure::read(response).await;
        if failure.is_server_error() {
            Err(IdentityError::Unavailable(failure.to_string()))
        } else if failure.message.to_lowercase().contains("already") {
            Err(IdentityError::AlreadyRegistered)
        } else {
            Err(IdentityError::Rejected(failure.message))
        }
    }

    async fn sign_out(&self, jar: &mut SessionJar) -> Result<(), IdentityError> {
        if let Some(token) = jar.access_token().map(str::to_string) {
            match self
                .client
                .as_user(self.client.post("auth/v1/logout"), Some(&token))
                .send()
                .await
            {
                Ok(response) if !response.status().is_success() => {
                    let failure = Failure::read(response).await;
                    tracing::debug!(error = %failure, "logout not acknowledged");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "logout call failed; clearing cookies anyway"),
            }
        }
        jar.clear_session();
        Ok(())
    }
}
