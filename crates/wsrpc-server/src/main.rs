//! wsrpc server
//!
//! - WebSocket endpoint at `server.path` (default `/ws`)
//! - Demo commands: `sum`, `negate`
//! - Optional `tick` push to every session
//! - Graceful shutdown on Ctrl+C

use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use wsrpc_core::error::{Result, WsRpcError};
use wsrpc_server::{app_state, config, router, services};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "wsrpc-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "wsrpc.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;
    let tick_every = cfg.server.tick_interval_ms;

    let shutdown = CancellationToken::new();
    let state = app_state::AppState::new(cfg, shutdown.clone())?;

    if tick_every > 0 {
        tokio::spawn(services::clock::run(
            state.sessions(),
            Duration::from_millis(tick_every),
            shutdown.child_token(),
        ));
    }

    let app = router::build_router(state);

    tracing::info!(%listen, "wsrpc-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| WsRpcError::Transport(format!("bind {listen}: {e}")))?;

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
            signal.cancel();
        })
        .await
        .map_err(|e| WsRpcError::Internal(format!("server failed: {e}")))?;

    Ok(())
}
