//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with health checks
//! - `migrations`: embedded schema migrations
//!
//! Table models and their queries are in [`crate::models`].

pub mod migrations;
pub mod pool;
