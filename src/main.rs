//! campus-events server entry point.
//!
//! Loads configuration, opens the store, and serves the REST API until
//! Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use campus_events::api;
use campus_events::app_state::AppState;
use campus_events::auth::JwtIdentityResolver;
use campus_events::config::{AppConfig, LogFormat};
use campus_events::persistence::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, ?config, "starting campus-events");

    let store = open_store(&config).await?;
    let identity = Arc::new(JwtIdentityResolver::new(
        &config.jwt_secret,
        config.jwt_audience.as_deref(),
    ));
    let app_state = AppState::new(Arc::clone(&store), identity);

    let app = Router::new()
        .merge(api::build_router())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    if !config.persistence_enabled {
        tracing::warn!("persistence disabled; data lives in memory and is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(config)
        .await
        .context("failed to connect to PostgreSQL")?;
    if config.run_migrations {
        store.migrate().await.context("failed to run migrations")?;
        tracing::info!("migrations applied");
    }
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
