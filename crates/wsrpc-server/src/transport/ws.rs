//! WebSocket transport (axum).
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS; a failed upgrade gets the HTTP error helper body
//! - Adapt axum's socket halves to `FrameSource` / `FrameSink`
//! - Register the session, run the decode loop, unregister on exit
//! - Tracing span per session

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tracing::Instrument;

use wsrpc_core::error::{Result, WsRpcError};
use wsrpc_core::protocol::Frame;

use crate::app_state::AppState;
use crate::connection::Connection;
use crate::dispatch::Decoder;
use crate::http::write_http_error;
use crate::session;

use super::{FrameSink, FrameSource};

pub struct WsSource {
    inner: SplitStream<WebSocket>,
}

pub struct WsSink {
    inner: SplitSink<WebSocket, Message>,
}

/// Split an upgraded socket into frame halves.
pub fn split(socket: WebSocket) -> (WsSource, WsSink) {
    let (tx, rx) = socket.split();
    (WsSource { inner: rx }, WsSink { inner: tx })
}

fn from_ws(msg: Message) -> Frame {
    match msg {
        Message::Text(s) => Frame::Text(s),
        Message::Binary(b) => Frame::Binary(Bytes::from(b)),
        Message::Ping(v) => Frame::Ping(Bytes::from(v)),
        Message::Pong(v) => Frame::Pong(Bytes::from(v)),
        Message::Close(_) => Frame::Close,
    }
}

fn to_ws(frame: Frame) -> Message {
    match frame {
        Frame::Text(s) => Message::Text(s),
        Frame::Binary(b) => Message::Binary(b.to_vec()),
        Frame::Ping(b) => Message::Ping(b.to_vec()),
        Frame::Pong(b) => Message::Pong(b.to_vec()),
        Frame::Close => Message::Close(None),
    }
}

#[async_trait]
impl FrameSource for WsSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>> {
        match self.inner.next().await {
            None => Ok(None),
            Some(Ok(msg)) => Ok(Some(from_ws(msg))),
            Some(Err(e)) => Err(WsRpcError::Transport(format!("ws recv: {e}"))),
        }
    }
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_frame(&mut self, frame: Frame) -> Result<()> {
        self.inner
            .send(to_ws(frame))
            .await
            .map_err(|e| WsRpcError::Transport(format!("ws send: {e}")))
    }

    async fn close(&mut self) -> Result<()> {
        self.inner
            .close()
            .await
            .map_err(|e| WsRpcError::Transport(format!("ws close: {e}")))
    }
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(
    State(app): State<AppState>,
    ws: std::result::Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "websocket upgrade rejected");
            return write_http_error(rejection.status(), "failed to upgrade connection");
        }
    };
    // bound what the websocket layer buffers, not just what we decode
    let max = app.cfg().server.max_frame_bytes;
    ws.max_message_size(max)
        .max_frame_size(max)
        .on_upgrade(move |socket| run_session(app, socket))
}

// --------------------
// Session
// --------------------
async fn run_session(app: AppState, socket: WebSocket) {
    let (source, sink) = split(socket);
    let conn = Arc::new(Connection::new(source, sink, app.cfg().server.limits()));
    let sessions = app.sessions();
    let session = sessions.insert(conn.outbound());

    let span = tracing::info_span!("session", session);
    async move {
        tracing::info!("session started");

        let decoder = Decoder::new(conn, app.palette());
        let terminal = session::serve(decoder, app.handler(), app.shutdown().child_token()).await;
        sessions.remove(session);

        match terminal {
            WsRpcError::EndOfStream => tracing::info!("session closed by peer"),
            e => tracing::warn!(code = e.code().as_str(), error = %e, "session ended"),
        }
    }
    .instrument(span)
    .await
}
