//! # Emerald API Server
//!
//! Backend of the Emerald Tech customer portal: projects, modules,
//! invoices, the public portfolio, the price estimator and the auth flows
//! delegated to the identity provider.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/emerald cargo run -p emerald-api
//! ```
//!
//! Set `LOG_FORMAT=json` for JSON log lines.

use emerald_api::{
    app::{build_router, AppState},
    config::Config,
};
use emerald_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool},
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Emerald API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    if config.admin_email.is_empty() {
        warn!("ADMIN_EMAIL is not set; no account will have the admin role");
    }

    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    let addr = config.bind_address();
    let state = AppState::from_config(pool.clone(), config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "emerald_api=debug,emerald_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections...");
}
