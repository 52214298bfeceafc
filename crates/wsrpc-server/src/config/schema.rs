use std::net::SocketAddr;

use serde::Deserialize;
use wsrpc_core::error::{Result, WsRpcError};

use crate::connection::ConnLimits;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WsRpcError::UnsupportedVersion);
        }

        self.server.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route serving the websocket upgrade.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Clock push interval; 0 disables it.
    #[serde(default)]
    pub tick_interval_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            path: default_path(),
            max_frame_bytes: default_max_frame_bytes(),
            tick_interval_ms: 0,
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.path.starts_with('/') {
            return Err(WsRpcError::Config("server.path must start with '/'".into()));
        }
        if self.path == "/healthz" {
            return Err(WsRpcError::Config("server.path must not be /healthz".into()));
        }
        if !(64..=16 * 1024 * 1024).contains(&self.max_frame_bytes) {
            return Err(WsRpcError::Config(
                "server.max_frame_bytes must be between 64 and 16777216".into(),
            ));
        }
        if self.tick_interval_ms != 0 && !(100..=3_600_000).contains(&self.tick_interval_ms) {
            return Err(WsRpcError::Config(
                "server.tick_interval_ms must be 0 or between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| WsRpcError::Config(format!("server.listen must be a valid SocketAddr: {e}")))
    }

    pub fn limits(&self) -> ConnLimits {
        ConnLimits {
            max_frame_bytes: self.max_frame_bytes,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_path() -> String {
    "/ws".into()
}
fn default_max_frame_bytes() -> usize {
    64 * 1024
}
