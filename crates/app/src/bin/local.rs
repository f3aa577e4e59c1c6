// Gateway - authentication gate in front of the echo downstream

use std::net::SocketAddr;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use gateway_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging is configured from Config, so load errors go to stderr
    let config = Config::from_env().map_err(|e| {
        eprintln!("[{}] gateway cannot start: {}", e.error_code(), e);
        e
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .pretty()
        .init();

    info!(
        algorithm = %config.jwt_algorithm,
        reject_status = config.reject_status,
        forward_authorization = config.forward_authorization,
        timeout_secs = config.request_timeout_secs,
        "Gateway configuration loaded"
    );

    let gateway = gateway_app::create_app(&config, gateway_app::echo_downstream())
        .inspect_err(|e| error!(error = %e, "Refusing to start gateway"))?
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening; /health is open, every other path is gated");

    axum::serve(listener, gateway)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    info!(signal, "Draining in-flight requests");
}
