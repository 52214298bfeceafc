//! Per-connection resolution engine.
//!
//! `decode_one` = read one envelope + `resolve`. Resolution outcomes:
//! - unknown name: reply `{"ok":false,"error":"unknown command"}` to the same
//!   id, then return `UnknownCommand` (the connection stays usable);
//! - payload does not fit the registered request type: return `Decode`, no
//!   reply is sent (the caller decides whether to notify the peer);
//! - otherwise: the typed command.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use wsrpc_core::error::{Result, WsRpcError};
use wsrpc_core::protocol::Envelope;

use super::command::RawCommand;
use super::palette::Palette;
use super::pump::Pump;
use crate::connection::Connection;

pub const UNKNOWN_COMMAND: &str = "unknown command";

pub struct Decoder<C> {
    conn: Arc<Connection>,
    palette: Arc<Palette<C>>,
}

impl<C> Clone for Decoder<C> {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            palette: Arc::clone(&self.palette),
        }
    }
}

impl<C> Decoder<C> {
    pub fn new(conn: Arc<Connection>, palette: Arc<Palette<C>>) -> Self {
        Self { conn, palette }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    pub fn palette(&self) -> &Palette<C> {
        &self.palette
    }

    /// Read and resolve one command. Safe to call from several tasks; reads
    /// are serialized by the connection.
    pub async fn decode_one(&self) -> Result<C> {
        let envelope: Envelope = self.conn.recv_raw().await?;
        self.resolve(envelope).await
    }

    /// Resolve an already-read envelope against the palette.
    pub async fn resolve(&self, envelope: Envelope) -> Result<C> {
        let raw = RawCommand::from_envelope(envelope, self.conn.outbound());

        let Some(prototype) = self.palette.resolve(raw.name()) else {
            tracing::warn!(id = %raw.id(), command = %raw.name(), "unknown command");
            raw.err(UNKNOWN_COMMAND).await?;
            return Err(WsRpcError::UnknownCommand(raw.name().to_string()));
        };

        prototype.upgrade(raw)
    }
}

impl<C: Send + 'static> Decoder<C> {
    /// Run the decode loop on a background task. The pump gets a child of
    /// `token`, so cancelling the pump never cancels the parent.
    pub fn pump(&self, token: &CancellationToken) -> Pump<C> {
        Pump::spawn(self.clone(), token.child_token())
    }
}
