mod api;
mod interceptor;
mod middleware;

use std::sync::Arc;

use storefront_catalog::CatalogClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(storefront_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = CatalogClient::new(
        &config.api_url,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        api_url = %config.api_url,
        fixtures_dir = %config.fixtures_dir.display(),
        "starting storefront server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let app = build_app(AppState { config, client });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
