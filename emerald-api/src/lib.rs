//! # Emerald API Server Library
//!
//! HTTP surface of the Emerald Tech customer portal.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: configuration from the environment
//! - `error`: error handling and HTTP response mapping
//! - `extract`: request extractors with portal-shaped rejections
//! - `middleware`: authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
