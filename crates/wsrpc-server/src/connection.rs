//! Connection: one duplex frame stream with independent read and write locks.
//!
//! - Reads: one frame at a time under the read lock, decoded straight into the
//!   caller's target type. Control frames are skipped; a close frame or the end
//!   of the stream becomes `EndOfStream`.
//! - Writes: values are encoded to JSON outside the lock, then written and
//!   flushed as a single text frame under the write lock, so concurrent sends
//!   never interleave.
//!
//! The write half lives in [`Outbound`], a cheap clonable handle. Commands and
//! the session registry hold an `Outbound`, never the connection itself.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use wsrpc_core::error::{Result, WsRpcError};
use wsrpc_core::protocol::{Frame, PushMessage, Pushed};

use crate::transport::{FrameSink, FrameSource};

/// Per-connection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnLimits {
    /// Largest accepted data frame, in bytes.
    pub max_frame_bytes: usize,
}

impl Default for ConnLimits {
    fn default() -> Self {
        Self {
            max_frame_bytes: 64 * 1024,
        }
    }
}

pub struct Connection {
    source: Mutex<Box<dyn FrameSource>>,
    outbound: Outbound,
    limits: ConnLimits,
}

impl Connection {
    pub fn new(
        source: impl FrameSource + 'static,
        sink: impl FrameSink + 'static,
        limits: ConnLimits,
    ) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            outbound: Outbound::new(sink),
            limits,
        }
    }

    pub fn limits(&self) -> ConnLimits {
        self.limits
    }

    /// Clonable write handle sharing this connection's write lock.
    pub fn outbound(&self) -> Outbound {
        self.outbound.clone()
    }

    /// Read exactly one data frame and decode it into `T`.
    ///
    /// Only one read is in flight at a time. Cancel-safe as long as the
    /// underlying source is.
    pub async fn recv_raw<T: DeserializeOwned>(&self) -> Result<T> {
        let mut source = self.source.lock().await;
        loop {
            let frame = source
                .next_frame()
                .await?
                .ok_or(WsRpcError::EndOfStream)?;

            let len = frame.payload_len();
            let data: &[u8] = match &frame {
                Frame::Text(s) => s.as_bytes(),
                Frame::Binary(b) => &b[..],
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close => {
                    tracing::debug!("close frame received");
                    return Err(WsRpcError::EndOfStream);
                }
            };

            if len > self.limits.max_frame_bytes {
                return Err(WsRpcError::FrameTooLarge {
                    len,
                    max: self.limits.max_frame_bytes,
                });
            }

            return serde_json::from_slice(data)
                .map_err(|e| WsRpcError::InvalidEnvelope(format!("json decode: {e}")));
        }
    }

    /// Push an unsolicited message. Safe to call concurrently with replies.
    pub async fn send_message<M: PushMessage>(&self, message: &M) -> Result<()> {
        self.outbound.send_message(message).await
    }

    /// Close the write half. Idempotent; readers observe end-of-stream once
    /// the peer acknowledges.
    pub async fn close(&self) -> Result<()> {
        self.outbound.close().await
    }
}

/// Write half of a connection.
///
/// Outside this crate only pushes go through here; replies are written by
/// `Command::ok`/`Command::err`, which copy the id and command name.
///
/// ```compile_fail
/// async fn forge(out: wsrpc_server::Outbound) {
///     let _ = out.send_raw(&serde_json::json!({"id": "x", "ok": true})).await;
/// }
/// ```
#[derive(Clone)]
pub struct Outbound {
    sink: Arc<Mutex<Option<Box<dyn FrameSink>>>>,
}

impl Outbound {
    fn new(sink: impl FrameSink + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Some(Box::new(sink)))),
        }
    }

    /// Encode `value` and write it as one frame.
    pub(crate) async fn send_raw<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let text =
            serde_json::to_string(value).map_err(|e| WsRpcError::Encode(format!("json encode: {e}")))?;

        let mut guard = self.sink.lock().await;
        let sink = guard
            .as_mut()
            .ok_or_else(|| WsRpcError::Transport("connection closed".into()))?;
        tracing::trace!(len = text.len(), "frame out");
        sink.send_frame(Frame::Text(text)).await
    }

    pub async fn send_message<M: PushMessage>(&self, message: &M) -> Result<()> {
        self.send_raw(&Pushed::new(message)).await
    }

    pub async fn close(&self) -> Result<()> {
        let mut guard = self.sink.lock().await;
        match guard.take() {
            Some(mut sink) => {
                tracing::debug!("closing connection");
                sink.close().await
            }
            None => Ok(()),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.sink.lock().await.is_none()
    }
}
