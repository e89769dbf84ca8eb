//! Authentication and access control
//!
//! - [`jwt`]: verification of identity-provider access tokens
//! - [`role`]: admin/customer role resolution
//! - [`guard`]: page access decisions
//! - [`identity`]: client for the hosted identity provider

pub mod guard;
pub mod identity;
pub mod jwt;
pub mod role;
