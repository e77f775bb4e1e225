use std::net::SocketAddr;

use anyhow::Context;
use connections_backend::config::ServerConfig;
use connections_backend::{app, init_tracing, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info,tower_http=debug");

    let config = ServerConfig::from_env();
    let state = AppState::new(&config);
    if tokio::fs::metadata(state.store().path()).await.is_err() {
        warn!(
            path = %state.store().path().display(),
            "puzzle store not found; reads and writes will fail until it exists"
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, data_dir = %config.data_dir.display(), "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "could not install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
