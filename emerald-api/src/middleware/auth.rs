//! Bearer-token authentication
//!
//! `require_auth` verifies the `Authorization: Bearer <token>` header against
//! the identity provider's JWT secret and stores the resulting
//! [`AuthUser`] in the request extensions. `require_admin` runs after it and
//! rejects non-admin callers.
//!
//! ```text
//! no header / not Bearer / bad token ──► 401
//! valid token, role ≠ admin (admin routes) ──► 403
//! ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use emerald_shared::auth::jwt::{verify_access_token, AuthUser};
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Token from an `Authorization: Bearer` header, if one is present
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))
}

/// Verifies the bearer token of a request, if any
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Option<AuthUser>, ApiError> {
    let Some(token) = bearer_token(headers)? else {
        return Ok(None);
    };

    let user = verify_access_token(
        token,
        &state.config.identity.jwt_secret,
        &state.config.admin_email,
    )?;

    debug!(user_id = %user.id, role = %user.role, "Request authenticated");
    Ok(Some(user))
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers())?
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn require_admin(
    Extension(user): Extension<AuthUser>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.is_admin() {
        debug!(user_id = %user.id, "Admin route refused");
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&HeaderMap::new()).unwrap(), None);
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), Some("abc.def"));
        assert!(bearer_token(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
    }
}
