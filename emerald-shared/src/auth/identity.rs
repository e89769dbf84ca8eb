//! Identity provider client
//!
//! Accounts, passwords and sessions live in the hosted identity provider
//! (a GoTrue-compatible REST API under `{SUPABASE_URL}/auth/v1`). The portal
//! proxies the few flows it needs:
//!
//! | Flow | Provider call |
//! |---|---|
//! | sign up | `POST /signup` |
//! | password sign-in | `POST /token?grant_type=password` |
//! | sign out | `POST /logout` (user bearer) |
//! | password reset mail | `POST /recover` |
//! | current user | `GET /user` (user bearer) |
//! | Google sign-in | browser redirect to `/authorize?provider=google` |
//!
//! Provider errors keep the provider's status code and message.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::{display_name, AuthUser, UserMetadata};
use super::role::resolve_role;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for identity provider calls
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider answered with an error status
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid identity provider URL: {0}")]
    InvalidUrl(String),
}

/// Account as returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub user_metadata: UserMetadata,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

impl ProviderUser {
    pub fn into_auth_user(self, admin_email: &str) -> AuthUser {
        AuthUser {
            id: self.id,
            role: resolve_role(self.email.as_deref(), admin_email),
            name: display_name(&self.user_metadata, self.email.as_deref()),
            email: self.email,
            avatar_url: self.user_metadata.avatar_url,
            created_at: self.created_at,
        }
    }
}

/// Tokens handed out on sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Seconds until the access token expires
    pub expires_in: i64,

    pub user: ProviderUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,

    /// Where the confirmation link sends the user
    pub redirect_to: String,
}

/// Result of a sign-up
///
/// With email confirmation enabled the provider returns the account and no
/// session.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: ProviderUser,
    pub session: Option<Session>,
}

impl SignUpOutcome {
    pub fn email_confirmation_required(&self) -> bool {
        self.session.is_none() && self.user.email_confirmed_at.is_none()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(ProviderUser),
}

/// Flows delegated to the identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError>;

    /// Revokes the session behind `access_token`
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str, redirect_to: &str)
        -> Result<(), IdentityError>;

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, IdentityError>;

    /// URL the browser is sent to for third-party sign-in
    fn oauth_authorize_url(&self, provider: &str, redirect_to: &str)
        -> Result<String, IdentityError>;
}

/// [`IdentityProvider`] over the provider's REST API
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HttpIdentityProvider {
    /// `base_url` is the project URL, e.g. `https://abc.supabase.co`
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/auth/v1", base_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn post(&self, path: &str, bearer: Option<&str>) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    /// Turns a non-success response into [`IdentityError::Provider`]
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = provider_error_message(status, &body);
        warn!(status = status.as_u16(), %message, "Identity provider rejected request");

        Err(IdentityError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, request: SignUpRequest) -> Result<SignUpOutcome, IdentityError> {
        let response = self
            .post("signup", None)
            .query(&[("redirect_to", request.redirect_to.as_str())])
            .json(&json!({
                "email": request.email,
                "password": request.password,
                "data": { "full_name": request.full_name },
            }))
            .send()
            .await?;

        let outcome = match Self::check(response).await?.json::<SignUpResponse>().await? {
            SignUpResponse::Session(session) => SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            },
            SignUpResponse::User(user) => SignUpOutcome {
                user,
                session: None,
            },
        };

        debug!(
            user_id = %outcome.user.id,
            confirmation_required = outcome.email_confirmation_required(),
            "Account registered"
        );
        Ok(outcome)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let response = self
            .post("token", None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<Session>().await?)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self.post("logout", Some(access_token)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), IdentityError> {
        let response = self
            .post("recover", None)
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<ProviderUser>().await?)
    }

    fn oauth_authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
    ) -> Result<String, IdentityError> {
        Url::parse_with_params(
            &self.endpoint("authorize"),
            &[("provider", provider), ("redirect_to", redirect_to)],
        )
        .map(String::from)
        .map_err(|e| IdentityError::InvalidUrl(e.to_string()))
    }
}

/// Human-readable message from a provider error body
///
/// The provider is not consistent about the field name (`msg`,
/// `error_description`, `message` or `error`).
pub fn provider_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("Identity provider returned {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::role::Role;

    #[test]
    fn test_error_message_fields() {
        let status = StatusCode::BAD_REQUEST;

        assert_eq!(
            provider_error_message(
                status,
                r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
            ),
            "Invalid login credentials"
        );
        assert_eq!(
            provider_error_message(status, r#"{"code":422,"msg":"User already registered"}"#),
            "User already registered"
        );
        assert_eq!(
            provider_error_message(status, r#"{"message":"Email rate limit exceeded"}"#),
            "Email rate limit exceeded"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            provider_error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "Identity provider returned 502 Bad Gateway"
        );
        assert_eq!(
            provider_error_message(StatusCode::BAD_REQUEST, r#"{"msg":""}"#),
            "Identity provider returned 400 Bad Request"
        );
    }

    #[test]
    fn test_authorize_url() {
        let provider = HttpIdentityProvider::new("https://abc.supabase.co/", "anon").unwrap();
        let url = provider
            .oauth_authorize_url("google", "https://emeraldtech.id/auth/callback")
            .unwrap();

        assert_eq!(
            url,
            "https://abc.supabase.co/auth/v1/authorize?provider=google&redirect_to=https%3A%2F%2Femeraldtech.id%2Fauth%2Fcallback"
        );
    }

    #[test]
    fn test_sign_up_response_variants() {
        let user_only = r#"{
            "id": "6f1d3a54-5c1e-4c4c-9d0c-2f0a4c8e7b11",
            "email": "budi@toko.id",
            "user_metadata": { "full_name": "Budi Santoso" },
            "created_at": "2026-03-17T08:00:00Z",
            "email_confirmed_at": null
        }"#;
        match serde_json::from_str::<SignUpResponse>(user_only).unwrap() {
            SignUpResponse::User(user) => assert_eq!(user.email.as_deref(), Some("budi@toko.id")),
            SignUpResponse::Session(_) => panic!("expected bare user"),
        }

        let with_session = format!(
            r#"{{"access_token":"a","refresh_token":"r","token_type":"bearer","expires_in":3600,"user":{}}}"#,
            user_only
        );
        assert!(matches!(
            serde_json::from_str::<SignUpResponse>(&with_session).unwrap(),
            SignUpResponse::Session(_)
        ));
    }

    #[test]
    fn test_provider_user_to_auth_user() {
        let user: ProviderUser = serde_json::from_str(
            r#"{"id":"6f1d3a54-5c1e-4c4c-9d0c-2f0a4c8e7b11","email":"admin@emeraldtech.com"}"#,
        )
        .unwrap();

        let auth_user = user.into_auth_user("admin@emeraldtech.com");
        assert_eq!(auth_user.role, Role::Admin);
        assert_eq!(auth_user.name, "admin");
        assert!(auth_user.created_at.is_none());
    }
}
