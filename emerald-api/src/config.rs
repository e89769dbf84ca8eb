//! Configuration for the API server
//!
//! Loaded from environment variables (a `.env` file is honoured in
//! development).
//!
//! # Environment Variables
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `API_HOST` | `0.0.0.0` | |
//! | `API_PORT` | `8080` | |
//! | `CORS_ORIGINS` | `*` | comma separated |
//! | `PRODUCTION` | `false` | enables HSTS |
//! | `SITE_URL` | `http://localhost:3000` | public site, used for auth redirects |
//! | `DATABASE_URL` | required | |
//! | `DATABASE_MAX_CONNECTIONS` | `10` | |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECONDS` | `30` | |
//! | `SUPABASE_URL` | required | identity provider project URL |
//! | `SUPABASE_ANON_KEY` | required | |
//! | `SUPABASE_JWT_SECRET` | required | at least 32 characters |
//! | `ADMIN_EMAIL` | empty | address that gets the admin role |
//!
//! # Example
//!
//! ```no_run
//! use emerald_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use emerald_shared::db::pool::DatabaseConfig;
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,

    /// Email address of the portal administrator
    pub admin_email: String,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    pub production: bool,

    /// Public URL of the marketing site, without trailing slash
    pub site_url: String,
}

/// Identity provider configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    pub url: String,
    pub anon_key: String,

    /// HS256 secret the provider signs access tokens with
    pub jwt_secret: String,
}

impl Config {
    /// Loads configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let jwt_secret = required("SUPABASE_JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("SUPABASE_JWT_SECRET must be at least 32 characters long");
        }

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database = DatabaseConfig {
            url: required("DATABASE_URL")?,
            max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            acquire_timeout_seconds: parse_or(&var, "DATABASE_ACQUIRE_TIMEOUT_SECONDS", 30)?,
            ..Default::default()
        };

        Ok(Self {
            api: ApiConfig {
                host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&var, "API_PORT", 8080)?,
                cors_origins,
                production: parse_or(&var, "PRODUCTION", false)?,
                site_url: var("SITE_URL")
                    .unwrap_or_else(|| "http://localhost:3000".to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },
            database,
            identity: IdentityConfig {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
                jwt_secret,
            },
            admin_email: var("ADMIN_EMAIL").unwrap_or_default(),
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", key, raw)),
        None => Ok(default),
    }
}
