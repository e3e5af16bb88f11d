//! user-connection-service server entry point.
//!
//! Loads configuration, opens the store (running migrations), and serves
//! the REST API until Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use user_connection_service::api;
use user_connection_service::app_state::AppState;
use user_connection_service::config::{LogFormat, ServiceConfig};
use user_connection_service::persistence::{
    ConnectionStore, InMemoryConnectionStore, PostgresConnectionStore,
};
use user_connection_service::service::ConnectionService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting user-connection-service");

    // Build persistence layer
    let store = open_store(&config).await?;

    // Build application state
    let app_state = AppState {
        connection_service: Arc::new(ConnectionService::new(store)),
    };

    // Start server
    let app = api::build_app(app_state);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn open_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn ConnectionStore>> {
    if config.uses_in_memory_store() {
        tracing::warn!("using in-memory store; data is lost on exit");
        return Ok(Arc::new(InMemoryConnectionStore::new()));
    }

    let store = PostgresConnectionStore::connect(config)
        .await
        .context("connecting to database")?;
    if config.run_migrations {
        store.migrate().await.context("applying migrations")?;
    }
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
