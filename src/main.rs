//! Server binary: reads config from the environment, prepares the database, serves the API.

use locadora_api::{app, apply_migrations, ensure_database_exists, store, AppConfig, AppState, MemoryStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("locadora_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let state = if config.uses_memory_store() {
        tracing::warn!("DATABASE_URL=memory: data lives in this process only");
        AppState::in_memory(MemoryStore::new())
    } else {
        if config.auto_migrate {
            ensure_database_exists(&config.database_url).await?;
        }
        let pool = store::connect(&config.database_url, config.max_connections).await?;
        if config.auto_migrate {
            apply_migrations(&pool).await?;
        }
        AppState::postgres(pool)
    };

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API de Locadora listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
