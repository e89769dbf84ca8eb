//! Authentication endpoints
//!
//! Accounts live with the identity provider; these handlers forward the
//! portal's auth flows to it and translate the results into the portal's
//! user shape ([`AuthUser`], with the role already resolved).
//!
//! # Endpoints
//!
//! - `POST /api/auth/signup` - register with email, password and full name
//! - `POST /api/auth/login` - password sign-in, returns session tokens
//! - `POST /api/auth/logout` - revoke the caller's session
//! - `POST /api/auth/forgot-password` - send a password-reset email
//! - `GET /api/auth/google` - Google OAuth authorize URL
//! - `GET /api/auth/session` - the caller, or `null` when signed out
//! - `GET /api/auth/guard?requiredRole=` - page access decision

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiQuery, OptionalUser},
    middleware::auth::bearer_token,
    routes::{created, ok, DataResponse},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use emerald_shared::auth::{
    guard::{AccessGuard, GuardDecision, SessionState},
    identity::{Session, SignUpRequest},
    jwt::AuthUser,
    role::Role,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// OAuth provider used by the "Sign in with Google" button
const GOOGLE_PROVIDER: &str = "google";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Full name must be 1-100 characters"))]
    pub full_name: String,
}

/// Signup response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user: AuthUser,

    /// True when the account must be confirmed from the emailed link first
    pub email_confirmation_required: bool,

    /// Present when the provider signs the user in right away
    pub session: Option<SessionTokens>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Tokens of a provider session
#[derive(Debug, Serialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,

    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: SessionTokens,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthorizeUrlResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct GuardQuery {
    #[serde(rename = "requiredRole")]
    pub required_role: Option<String>,
}

impl SessionTokens {
    fn split(session: Session, admin_email: &str) -> (Self, AuthUser) {
        let user = session.user.into_auth_user(admin_email);
        let tokens = SessionTokens {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
        };
        (tokens, user)
    }
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "email": "budi@tokoretail.co.id",
///   "password": "rahasia123",
///   "fullName": "Budi Santoso"
/// }
/// ```
///
/// The confirmation link points back at `{SITE_URL}/auth/callback`.
///
/// # Errors
///
/// - `400 Bad Request`: invalid email, password shorter than 6 characters,
///   missing full name
/// - provider status (e.g. `422`): account already exists, weak password
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<SignupResponse>>)> {
    req.validate()?;

    let outcome = state
        .identity
        .sign_up(SignUpRequest {
            email: req.email.trim().to_string(),
            password: req.password,
            full_name: req.full_name.trim().to_string(),
            redirect_to: format!("{}/auth/callback", state.config.api.site_url),
        })
        .await?;

    let email_confirmation_required = outcome.email_confirmation_required();
    let admin_email = state.config.admin_email.as_str();
    let session = outcome
        .session
        .map(|session| SessionTokens::split(session, admin_email).0);
    let user = outcome.user.into_auth_user(admin_email);

    info!(user_id = %user.id, email_confirmation_required, "Account registered");

    Ok(created(SignupResponse {
        user,
        email_confirmation_required,
        session,
    }))
}

/// Sign in with email and password
///
/// # Errors
///
/// - `400 Bad Request`: invalid email, empty password
/// - provider status (`400`): wrong credentials, unconfirmed email
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<DataResponse<LoginResponse>>> {
    req.validate()?;

    let session = state
        .identity
        .sign_in_with_password(req.email.trim(), &req.password)
        .await?;
    let (tokens, user) = SessionTokens::split(session, &state.config.admin_email);

    info!(user_id = %user.id, role = %user.role, "User logged in");
    Ok(ok(LoginResponse { tokens, user }))
}

/// Revoke the caller's session at the provider
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> ApiResult<Json<DataResponse<MessageResponse>>> {
    let token = bearer_token(&headers)?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    state.identity.sign_out(token).await?;

    info!(user_id = %user.id, "User logged out");
    Ok(ok(MessageResponse {
        message: "Signed out",
    }))
}

/// The caller's account as the identity provider currently holds it
///
/// Unlike `GET /api/auth/session`, which only decodes the token, this asks
/// the provider, so a revoked session or a renamed account shows up here.
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token, or the provider rejects it
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DataResponse<AuthUser>>> {
    let token = bearer_token(&headers)?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    let user = state
        .identity
        .get_user(token)
        .await?
        .into_auth_user(&state.config.admin_email);

    Ok(ok(user))
}

/// Email a password-reset link pointing at `{SITE_URL}/auth/reset-password`
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<Json<DataResponse<MessageResponse>>> {
    req.validate()?;

    let redirect_to = format!("{}/auth/reset-password", state.config.api.site_url);
    state
        .identity
        .send_password_reset(req.email.trim(), &redirect_to)
        .await?;

    Ok(ok(MessageResponse {
        message: "Password reset email sent",
    }))
}

/// Authorize URL of the Google sign-in flow
///
/// The browser is sent there; the provider redirects back to
/// `{SITE_URL}/auth/callback`.
pub async fn google(State(state): State<AppState>) -> ApiResult<Json<DataResponse<AuthorizeUrlResponse>>> {
    let redirect_to = format!("{}/auth/callback", state.config.api.site_url);
    let url = state
        .identity
        .oauth_authorize_url(GOOGLE_PROVIDER, &redirect_to)?;

    Ok(ok(AuthorizeUrlResponse { url }))
}

/// The signed-in user, `null` when there is no valid token
pub async fn session(OptionalUser(user): OptionalUser) -> Json<DataResponse<Option<AuthUser>>> {
    ok(user)
}

/// Access decision for a page
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/guard?requiredRole=admin
/// Authorization: Bearer <token>      (optional)
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "data": { "decision": "redirect", "location": "/dashboard" } }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown role
pub async fn guard(
    OptionalUser(user): OptionalUser,
    ApiQuery(query): ApiQuery<GuardQuery>,
) -> ApiResult<Json<DataResponse<GuardDecision>>> {
    let required_role = query
        .required_role
        .as_deref()
        .filter(|role| !role.is_empty())
        .map(str::parse::<Role>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let session = SessionState::from_user(user.as_ref());
    Ok(ok(AccessGuard::new(required_role).decide(&session)))
}
