use clap::Parser;
use page_coordinator::config::Config;
use page_coordinator::service::Coordinator;
use page_coordinator::service::handlers::router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting {} coordinator", config.project_name);
    tracing::info!(
        "Pages file: {}, results: {}",
        config.pages_file.display(),
        config.result_dir.display()
    );

    // 1. Shared state (fatal if the completion record cannot be loaded):
    let address = config.address;
    let coordinator = Coordinator::open(config).await?;

    // 2. Background tasks:
    coordinator.start();

    // 3. HTTP Router:
    let app = router(coordinator.clone());

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("HTTP server listening on {}", address);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 5. Drain and persist:
    coordinator.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
