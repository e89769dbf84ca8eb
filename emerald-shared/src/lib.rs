//! # Emerald Shared Library
//!
//! Domain types and business logic behind the Emerald Tech customer portal,
//! used by the API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and their queries
//! - `db`: connection pool and migrations
//! - `auth`: token verification, roles, page guard, identity provider client
//! - `pricing`: module catalog and project estimates
//! - `billing`: invoice totals and numbering
//! - `slug`: URL slugs for projects, modules and portfolio entries

pub mod auth;
pub mod billing;
pub mod db;
pub mod models;
pub mod pricing;
pub mod slug;

/// Current version of the Emerald shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
