//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use emerald_api::{app::{build_router, AppState}, config::Config};
//! use emerald_shared::db::pool::create_pool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(config.database.clone()).await?;
//! let state = AppState::from_config(pool, config)?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, build_router(state)).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{
        auth::{require_admin, require_auth},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use emerald_shared::auth::identity::{HttpIdentityProvider, IdentityProvider};
use sqlx::PgPool;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            identity,
        }
    }

    /// State backed by the HTTP identity provider client
    pub fn from_config(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let identity =
            HttpIdentityProvider::new(&config.identity.url, &config.identity.anon_key)?;
        Ok(Self::new(db, config, Arc::new(identity)))
    }
}

/// Builds the complete router
///
/// ```text
/// /health                          GET
/// /api
/// ├── /projects                    GET (userId), POST
/// ├── /projects/:id                GET; PATCH, DELETE (owner or admin)
/// ├── /modules                     GET (projectId), POST
/// ├── /invoices                    GET (userId, status), POST
/// ├── /invoices/:id                GET
/// ├── /portfolio                   GET, POST (admin)
/// ├── /portfolio/:id               DELETE (admin)
/// ├── /estimate                    POST
/// ├── /estimate/modules            GET
/// ├── /dashboard/stats             GET (userId)
/// ├── /dashboard/activity          GET (userId, limit)
/// └── /auth
///     ├── /signup                  POST
///     ├── /login                   POST
///     ├── /logout                  POST (bearer)
///     ├── /me                      GET (bearer)
///     ├── /forgot-password         POST
///     ├── /google                  GET
///     ├── /session                 GET
///     └── /guard                   GET (requiredRole)
/// ```
///
/// Middleware, outermost first: security headers, CORS, panic catcher,
/// request tracing.
pub fn build_router(state: AppState) -> Router {
    let project_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route("/projects/:id", get(routes::projects::get_project))
        .route("/modules", get(routes::modules::list_modules).post(routes::modules::create_module));

    let owner_routes = Router::new()
        .route(
            "/projects/:id",
            patch(routes::projects::update_project).delete(routes::projects::delete_project),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let invoice_routes = Router::new()
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route("/invoices/:id", get(routes::invoices::get_invoice));

    let public_routes = Router::new()
        .route("/portfolio", get(routes::portfolio::list_portfolio))
        .route("/estimate", post(routes::estimate::estimate))
        .route("/estimate/modules", get(routes::estimate::list_catalog))
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route("/dashboard/activity", get(routes::dashboard::activity));

    // Layers added later run first: authenticate, then check the role
    let admin_routes = Router::new()
        .route("/portfolio", post(routes::portfolio::create_portfolio))
        .route("/portfolio/:id", delete(routes::portfolio::delete_portfolio))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/google", get(routes::auth::google))
        .route("/session", get(routes::auth::session))
        .route("/guard", get(routes::auth::guard))
        .merge(
            Router::new()
                .route("/logout", post(routes::auth::logout))
                .route("/me", get(routes::auth::me))
                .route_layer(from_fn_with_state(state.clone(), require_auth)),
        );

    let api_routes = Router::new()
        .merge(project_routes)
        .merge(owner_routes)
        .merge(invoice_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .nest("/auth", auth_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    ApiError::InternalError("Internal server error".to_string()).into_response()
}
