//! Shared application state for the wsrpc server.
//!
//! Built once at startup: the command palette is compiled here and is
//! read-only afterwards. Startup errors (bad config, duplicate command names)
//! are returned instead of panicking.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use wsrpc_core::error::Result;

use crate::config::ServerConfig;
use crate::dispatch::{Handler, Palette};
use crate::services::{arith, ArithCommand, ArithService};
use crate::sessions::Sessions;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    palette: Arc<Palette<ArithCommand>>,
    handler: Arc<dyn Handler<ArithCommand>>,
    sessions: Arc<Sessions>,
}

struct AppStateInner {
    cfg: ServerConfig,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(cfg: ServerConfig, shutdown: CancellationToken) -> Result<Self> {
        let palette = arith::palette()?;
        tracing::info!(commands = ?palette.names(), "palette ready");

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, shutdown }),
            palette: Arc::new(palette),
            handler: Arc::new(ArithService::new()),
            sessions: Arc::new(Sessions::new()),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    /// Root token; cancelled on shutdown.
    pub fn shutdown(&self) -> &CancellationToken {
        &self.inner.shutdown
    }

    pub fn palette(&self) -> Arc<Palette<ArithCommand>> {
        Arc::clone(&self.palette)
    }

    pub fn handler(&self) -> Arc<dyn Handler<ArithCommand>> {
        Arc::clone(&self.handler)
    }

    pub fn sessions(&self) -> Arc<Sessions> {
        Arc::clone(&self.sessions)
    }
}
