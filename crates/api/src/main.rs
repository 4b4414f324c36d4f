use std::sync::Arc;

use anyhow::Context;

use catalog_api::app::{build_app, AppServices};
use catalog_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr;

    let services = Arc::new(AppServices::in_memory(config));
    let app = build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(services))
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C, closing every real-time stream so in-flight SSE bodies end.
async fn shutdown_signal(services: Arc<AppServices>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    services.shutdown();
}
