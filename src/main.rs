use anyhow::Context;
use dotenvy::dotenv;
use estore::logging::init_tracing;
use estore::metrics::{init_metrics, metrics_app};
use estore::router::init_router;
use estore::state::init_app_state;
use estore_config::{MetricsConfig, ServerConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;
    let metrics_config = MetricsConfig::from_env().context("Invalid metrics configuration")?;

    if let Some(handle) = init_metrics(metrics_config.enabled)? {
        let addr = format!("0.0.0.0:{}", metrics_config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;
        info!(%addr, "Metrics server listening");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let state = init_app_state().await?;
    let app = init_router(state);

    let addr = server_config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server running");
    info!("Scalar UI available at http://{addr}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
