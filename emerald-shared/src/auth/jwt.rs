//! Access token verification
//!
//! The identity provider issues HS256 access tokens signed with the
//! project's JWT secret and addressed to the `authenticated` audience. The
//! API verifies them locally; no round trip to the provider is needed.
//!
//! Verification yields an [`AuthUser`] whose role has already been
//! resolved against the configured admin address.
//!
//! # Example
//!
//! ```
//! use emerald_shared::auth::jwt::{create_access_token, verify_access_token, AccessClaims};
//! use emerald_shared::auth::role::Role;
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = "super-secret-jwt-token-with-at-least-32-characters";
//! let claims = AccessClaims::new(Uuid::new_v4(), "admin@emeraldtech.com");
//! let token = create_access_token(&claims, secret)?;
//!
//! let user = verify_access_token(&token, secret, "admin@emeraldtech.com")?;
//! assert_eq!(user.role, Role::Admin);
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{resolve_role, Role};

/// Audience the provider puts on tokens of signed-in users
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Name shown when neither metadata nor email provide one
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Profile fields the provider stores next to the account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Claims of a provider access token
///
/// Unknown claims (`role`, `session_id`, `app_metadata`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID
    pub sub: Uuid,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub aud: String,
    pub iat: i64,
    pub exp: i64,

    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AccessClaims {
    /// One-hour token for `email`, as the provider would issue it
    pub fn new(user_id: Uuid, email: &str) -> Self {
        Self::with_expiration(user_id, email, Duration::hours(1))
    }

    pub fn with_expiration(user_id: Uuid, email: &str, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email: Some(email.to_string()),
            aud: AUTHENTICATED_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            user_metadata: UserMetadata::default(),
        }
    }

    pub fn with_full_name(mut self, full_name: &str) -> Self {
        self.user_metadata.full_name = Some(full_name.to_string());
        self
    }
}

/// Verified identity carried through a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,

    /// Account creation time; only known when read from the provider
    pub created_at: Option<DateTime<Utc>>,
}

impl AuthUser {
    /// Builds the identity from verified claims, resolving the role
    pub fn from_claims(claims: AccessClaims, admin_email: &str) -> Self {
        let role = resolve_role(claims.email.as_deref(), admin_email);
        let name = display_name(&claims.user_metadata, claims.email.as_deref());

        Self {
            id: claims.sub,
            email: claims.email,
            name,
            role,
            avatar_url: claims.user_metadata.avatar_url,
            created_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// `full_name` metadata, else the local part of the email, else `"User"`
pub fn display_name(metadata: &UserMetadata, email: Option<&str>) -> String {
    if let Some(name) = metadata.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }

    email
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_string()
}

/// Signs claims with HS256
///
/// The API never issues tokens itself; this exists for tooling and tests.
pub fn create_access_token(claims: &AccessClaims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Checks signature, expiry and audience, returning the claims
pub fn decode_access_token(token: &str, secret: &str) -> Result<AccessClaims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
    validation.validate_exp = true;

    decode::<AccessClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
}

/// Verifies a token and resolves the caller's identity
pub fn verify_access_token(
    token: &str,
    secret: &str,
    admin_email: &str,
) -> Result<AuthUser, JwtError> {
    decode_access_token(token, secret).map(|claims| AuthUser::from_claims(claims, admin_email))
}
