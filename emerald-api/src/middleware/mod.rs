//! Middleware for the API server
//!
//! - `auth`: bearer-token authentication and admin gate
//! - `security`: security response headers

pub mod auth;
pub mod security;
