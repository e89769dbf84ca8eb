//! Request extractors
//!
//! Wrappers around axum's extractors whose rejections render as
//! [`ApiError`] (the portal's `{ "success": false, "error": ... }` body)
//! instead of axum's plain-text defaults.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use emerald_shared::auth::jwt::AuthUser;
use tracing::debug;

use crate::{app::AppState, error::ApiError, middleware::auth::authenticate};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Caller identity when a valid bearer token is sent, `None` otherwise
///
/// Never rejects: an invalid or expired token counts as signed out.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authenticate(state, &parts.headers) {
            Ok(user) => Ok(OptionalUser(user)),
            Err(e) => {
                debug!(error = %e, "Ignoring invalid session token");
                Ok(OptionalUser(None))
            }
        }
    }
}
